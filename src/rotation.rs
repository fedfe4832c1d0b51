//! Timer-driven rotation of the displayed symbol.
//!
//! [`SymbolRotator`] is the plain state machine: an index cycling over the
//! configured symbols plus the presentation counter that decides which
//! volume figure is shown. [`RotationHandle`] shares it between the
//! rotation timer (the only writer of the cursor) and the presentation tick.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::TickerError;

/// Which volume figure a frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// Volume in the base asset.
    Base,
    /// Volume in the quote asset.
    Quote,
}

impl VolumeKind {
    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VolumeKind::Base => "B",
            VolumeKind::Quote => "Q",
        }
    }
}

/// Cyclic cursor over an ordered, non-empty list of symbols.
#[derive(Debug, Clone)]
pub struct SymbolRotator {
    symbols: Vec<String>,
    cursor: usize,
    ctr: u64,
    toggle_rate: u64,
}

impl SymbolRotator {
    /// Creates a rotator positioned at the first symbol.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Config`] if `symbols` is empty or
    /// `toggle_rate` is zero.
    pub fn new(symbols: Vec<String>, toggle_rate: u64) -> crate::Result<Self> {
        if symbols.is_empty() {
            return Err(TickerError::Config("no symbols to rotate".to_string()));
        }
        if toggle_rate == 0 {
            return Err(TickerError::Config(
                "toggle rate must be a positive number of seconds".to_string(),
            ));
        }

        Ok(Self {
            symbols,
            cursor: 0,
            ctr: 0,
            toggle_rate,
        })
    }

    /// The symbol currently selected for display.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.symbols[self.cursor]
    }

    /// Moves to the next symbol (wrapping) and resets the presentation counter.
    pub fn tick(&mut self) -> &str {
        self.cursor = (self.cursor + 1) % self.symbols.len();
        self.ctr = 0;
        self.current()
    }

    /// Picks the volume for the next rendered frame and advances the counter.
    ///
    /// The quote volume is shown for the first half of a rotation period,
    /// the base volume for the second half.
    pub fn next_volume(&mut self) -> VolumeKind {
        let kind = if self.ctr * 2 >= self.toggle_rate {
            VolumeKind::Base
        } else {
            VolumeKind::Quote
        };

        if self.ctr == self.toggle_rate {
            self.ctr = 0;
        }
        self.ctr += 1;

        kind
    }

    /// Presentation counter.
    #[must_use]
    pub fn counter(&self) -> u64 {
        self.ctr
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// Shared handle to a [`SymbolRotator`].
#[derive(Debug, Clone)]
pub struct RotationHandle {
    inner: Arc<Mutex<SymbolRotator>>,
}

impl RotationHandle {
    #[must_use]
    pub fn new(rotator: SymbolRotator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rotator)),
        }
    }

    /// Advances the rotation and returns the newly current symbol.
    pub fn tick(&self) -> String {
        let symbol = self.lock().tick().to_string();
        info!(symbol = %symbol, "Switched to symbol");
        symbol
    }

    /// Returns the current symbol.
    #[must_use]
    pub fn current(&self) -> String {
        self.lock().current().to_string()
    }

    /// See [`SymbolRotator::next_volume`].
    pub fn next_volume(&self) -> VolumeKind {
        self.lock().next_volume()
    }

    #[must_use]
    pub fn counter(&self) -> u64 {
        self.lock().counter()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SymbolRotator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotator(symbols: &[&str], toggle_rate: u64) -> SymbolRotator {
        SymbolRotator::new(symbols.iter().map(|s| s.to_string()).collect(), toggle_rate).unwrap()
    }

    #[test]
    fn rejects_empty_symbols() {
        let err = SymbolRotator::new(Vec::new(), 3).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn rejects_zero_toggle_rate() {
        assert!(SymbolRotator::new(vec!["BTC-USDT".into()], 0).is_err());
    }

    #[test]
    fn starts_at_first_symbol() {
        assert_eq!(rotator(&["A", "B", "C"], 3).current(), "A");
    }

    #[test]
    fn tick_preserves_order_and_wraps() {
        let mut r = rotator(&["A", "B", "C"], 3);
        let seen: Vec<String> = (0..6).map(|_| r.tick().to_string()).collect();
        assert_eq!(seen, vec!["B", "C", "A", "B", "C", "A"]);
    }

    #[test]
    fn single_symbol_always_current() {
        let mut r = rotator(&["A"], 1);
        for _ in 0..5 {
            assert_eq!(r.tick(), "A");
        }
    }

    #[test]
    fn volume_alternates_within_period() {
        let mut r = rotator(&["A", "B"], 4);
        let kinds: Vec<VolumeKind> = (0..4).map(|_| r.next_volume()).collect();
        assert_eq!(
            kinds,
            vec![
                VolumeKind::Quote,
                VolumeKind::Quote,
                VolumeKind::Base,
                VolumeKind::Base
            ]
        );
    }

    #[test]
    fn counter_wraps_at_toggle_rate() {
        let mut r = rotator(&["A"], 2);
        // ctr: 0 -> 1 -> 2 -> (wrap) 1
        assert_eq!(r.next_volume(), VolumeKind::Quote);
        assert_eq!(r.next_volume(), VolumeKind::Base);
        assert_eq!(r.counter(), 2);
        assert_eq!(r.next_volume(), VolumeKind::Base);
        assert_eq!(r.counter(), 1);
    }

    #[test]
    fn tick_resets_counter() {
        let mut r = rotator(&["A", "B"], 3);
        r.next_volume();
        r.next_volume();
        r.tick();
        assert_eq!(r.counter(), 0);
        assert_eq!(r.next_volume(), VolumeKind::Quote);
    }

    #[test]
    fn handle_shares_state() {
        let handle = RotationHandle::new(rotator(&["BTC-USDT", "ETH-USDT"], 2));
        let reader = handle.clone();
        assert_eq!(handle.tick(), "ETH-USDT");
        assert_eq!(reader.current(), "ETH-USDT");
    }
}
