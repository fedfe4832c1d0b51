//! Presentation side of the ticker: what gets drawn every second.
//!
//! The core only hands a read-only [`TickerView`] to a [`Presenter`]; the
//! console and full-screen terminal presenters are interchangeable and
//! chosen at startup.

pub mod console;
pub mod terminal;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::Result;
use crate::models::TickerSnapshot;
use crate::rotation::{RotationHandle, VolumeKind};
use crate::store::TickerStore;

pub use console::ConsolePresenter;
pub use terminal::TerminalPresenter;

/// Suffixes for thousands, millions and billions.
const VOLUME_SUFFIXES: [&str; 4] = ["", "K", "M", "B"];

/// Decimal places kept by [`compact_volume`].
const VOLUME_PRECISION: u32 = 3;

/// Everything a presenter needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerView {
    pub symbol: String,
    pub price: Decimal,
    pub change_percent: Decimal,
    pub volume_kind: VolumeKind,
    pub displayed_volume: Decimal,
}

impl TickerView {
    #[must_use]
    pub fn new(snapshot: &TickerSnapshot, volume_kind: VolumeKind) -> Self {
        let displayed_volume = match volume_kind {
            VolumeKind::Base => snapshot.base_volume,
            VolumeKind::Quote => snapshot.quote_volume,
        };

        Self {
            symbol: snapshot.symbol.clone(),
            price: snapshot.price,
            change_percent: snapshot.change_percent,
            volume_kind,
            displayed_volume,
        }
    }

    /// Volume with its kind label, e.g. `Q:500K`.
    #[must_use]
    pub fn volume_text(&self) -> String {
        format!(
            "{}:{}",
            self.volume_kind.label(),
            compact_volume(self.displayed_volume)
        )
    }

    /// Percent change with an explicit sign, e.g. `+1.2345`.
    #[must_use]
    pub fn signed_change(&self) -> String {
        if self.change_percent.is_sign_negative() {
            self.change_percent.to_string()
        } else {
            format!("+{}", self.change_percent)
        }
    }
}

/// Output target for ticker frames.
pub trait Presenter {
    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`](crate::TickerError::Io) if the output
    /// cannot be written.
    fn render(&mut self, view: &TickerView) -> Result<()>;

    /// Releases the output (e.g. restores the terminal). Called once on exit.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`](crate::TickerError::Io) if cleanup fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Redraw step run once per presentation interval.
pub struct PresentationTick {
    store: TickerStore,
    rotation: RotationHandle,
    presenter: Box<dyn Presenter + Send>,
}

impl PresentationTick {
    #[must_use]
    pub fn new(
        store: TickerStore,
        rotation: RotationHandle,
        presenter: Box<dyn Presenter + Send>,
    ) -> Self {
        Self {
            store,
            rotation,
            presenter,
        }
    }

    /// Renders the current symbol if the store has data for it.
    ///
    /// Returns `Ok(false)` without touching the presenter (or the
    /// presentation counter) when no snapshot has arrived yet.
    ///
    /// # Errors
    ///
    /// Propagates presenter errors.
    pub fn tick(&mut self) -> Result<bool> {
        let symbol = self.rotation.current();
        let Some(snapshot) = self.store.get(&symbol) else {
            return Ok(false);
        };

        let view = TickerView::new(&snapshot, self.rotation.next_volume());
        self.presenter.render(&view)?;
        Ok(true)
    }

    /// See [`Presenter::finish`].
    ///
    /// # Errors
    ///
    /// Propagates presenter errors.
    pub fn finish(&mut self) -> Result<()> {
        self.presenter.finish()
    }
}

/// Formats a volume with a K/M/B suffix and at most three decimals.
///
/// `500000` becomes `500K`, `1234567` becomes `1.235M`. Amounts beyond the
/// billions stay in `B`.
#[must_use]
pub fn compact_volume(value: Decimal) -> String {
    let thousand = Decimal::from(1000);
    let mut scaled = value;
    let mut idx = 0;

    while scaled.abs() >= thousand && idx < VOLUME_SUFFIXES.len() - 1 {
        scaled /= thousand;
        idx += 1;
    }

    let rounded = scaled
        .round_dp_with_strategy(VOLUME_PRECISION, RoundingStrategy::MidpointNearestEven)
        .normalize();
    format!("{rounded}{}", VOLUME_SUFFIXES[idx])
}
