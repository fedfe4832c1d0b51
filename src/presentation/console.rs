//! Plain-text presenter that redraws a few lines on the console.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::{Presenter, TickerView};
use crate::Result;
use crate::error::TickerError;

/// Writes each frame as text after clearing the screen.
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl ConsolePresenter<Stdout> {
    /// Creates a presenter on stdout and clears the screen once.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`] if stdout cannot be written.
    pub fn stdout() -> Result<Self> {
        let mut presenter = Self::new(io::stdout());
        presenter.clear()?;
        Ok(presenter)
    }
}

impl<W: Write> ConsolePresenter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Clears the screen and homes the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`] if the output cannot be written.
    pub fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0)).map_err(io_error)?;
        self.out.flush().map_err(io_error)
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render(&mut self, view: &TickerView) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0)).map_err(io_error)?;
        write!(
            self.out,
            "Symbol: {}\nPrice: {}\nChange: {}%\nVolume: {}\n",
            view.symbol,
            view.price,
            view.change_percent,
            view.volume_text()
        )
        .map_err(io_error)?;
        self.out.flush().map_err(io_error)
    }
}

fn io_error(e: io::Error) -> TickerError {
    TickerError::Io(e.to_string())
}
