//! Full-screen terminal presenter built on Ratatui.
//!
//! Draws a centred panel with the current ticker. While it owns the
//! terminal, raw mode swallows `Ctrl-C`, so [`spawn_quit_listener`] turns
//! `q`, `Esc` and `Ctrl-C` key presses into a shutdown request.

use std::io::{self, IsTerminal, Stdout};
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{Presenter, TickerView};
use crate::Result;
use crate::error::TickerError;
use crate::feed::stop_requested;

/// Type alias for the real terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

const PANEL_WIDTH: u16 = 40;
const PANEL_HEIGHT: u16 = 6;

/// Presenter drawing into a Ratatui terminal.
pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
    owns_tty: bool,
}

impl TerminalPresenter<CrosstermBackend<Stdout>> {
    /// Takes over the terminal: raw mode plus the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Io`] if stdout is not a TTY or terminal
    /// initialization fails.
    pub fn setup() -> Result<Self> {
        Ok(Self {
            terminal: setup_terminal()?,
            owns_tty: true,
        })
    }
}

impl<B: Backend> TerminalPresenter<B> {
    /// Wraps an existing terminal without touching TTY modes.
    #[must_use]
    pub fn with_terminal(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            owns_tty: false,
        }
    }

    #[must_use]
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Presenter for TerminalPresenter<B> {
    fn render(&mut self, view: &TickerView) -> Result<()> {
        self.terminal
            .draw(|frame| draw_ticker(frame, view))
            .map_err(|e| TickerError::Io(format!("failed to draw frame: {e}")))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.owns_tty {
            return Ok(());
        }
        self.owns_tty = false;

        disable_raw_mode().map_err(|e| TickerError::Io(e.to_string()))?;
        execute!(io::stdout(), LeaveAlternateScreen).map_err(|e| TickerError::Io(e.to_string()))?;
        self.terminal
            .show_cursor()
            .map_err(|e| TickerError::Io(e.to_string()))?;
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalPresenter<B> {
    fn drop(&mut self) {
        if self.owns_tty {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Renders one ticker panel centred in the frame.
pub fn draw_ticker(frame: &mut Frame, view: &TickerView) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(PANEL_HEIGHT),
        Constraint::Fill(1),
    ])
    .areas(frame.area());
    let [_, area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(PANEL_WIDTH),
        Constraint::Fill(1),
    ])
    .areas(row);

    let change_color = if view.change_percent.is_sign_negative() {
        Color::Red
    } else {
        Color::Green
    };
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled(
            view.symbol.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Price  ", label),
            Span::styled(view.price.to_string(), Style::default().fg(change_color)),
        ]),
        Line::from(vec![
            Span::styled("Change ", label),
            Span::styled(
                format!("{}%", view.signed_change()),
                Style::default().fg(change_color),
            ),
        ]),
        Line::from(vec![
            Span::styled("Volume ", label),
            Span::styled(view.volume_text(), Style::default().fg(Color::Cyan)),
        ]),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Ticker "));
    frame.render_widget(panel, area);
}

/// Spawns a task that requests shutdown on `q`, `Esc` or `Ctrl-C`.
///
/// The task ends on a quit key, on a terminal event error, or once
/// `stop` observes shutdown from elsewhere.
pub fn spawn_quit_listener(
    shutdown: Arc<watch::Sender<bool>>,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            let event = tokio::select! {
                event = events.next() => event,
                () = stop_requested(&mut stop) => break,
            };
            match event {
                Some(Ok(Event::Key(key))) if is_quit_key(&key) => {
                    info!("Quit requested from keyboard");
                    let _ = shutdown.send(true);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Terminal event error: {e}");
                    break;
                }
                None => break,
            }
        }
    })
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Initializes the terminal for full-screen rendering.
fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(TickerError::Io(
            "terminal UI requires an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(|e| TickerError::Io(format!("failed to enable raw mode: {e}")))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        TickerError::Io(format!("failed to enter alternate screen: {e}"))
    })?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        TickerError::Io(format!("failed to create terminal: {e}"))
    })
}
