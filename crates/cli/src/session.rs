use std::io::{BufRead, Write};

use crypto_tracker_core::commands::{Command, HELP};
use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::holding::format_quantity;
use crypto_tracker_core::CryptoTracker;
use tracing::{debug, warn};

/// Whether the prompt keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session over a loaded tracker.
pub struct Session<'a, W: Write> {
    tracker: &'a mut CryptoTracker,
    out: W,
    /// Set after a `quit` was refused because of unsaved changes.
    quit_armed: bool,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(tracker: &'a mut CryptoTracker, out: W) -> Self {
        Self {
            tracker,
            out,
            quit_armed: false,
        }
    }

    /// Read commands until `quit`/`exit` or end of input. Command errors
    /// are printed and the session continues; only I/O on the terminal
    /// itself ends it early.
    pub async fn run<R: BufRead>(&mut self, input: R) -> std::io::Result<()> {
        self.prompt()?;
        for line in input.lines() {
            let line = line?;
            match self.handle_line(&line).await {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    debug!(error = %e, "command failed");
                    writeln!(self.out, "Error: {e}")?;
                }
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// Parse and execute one line.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow, CoreError> {
        match Command::parse(line)? {
            Some(command) => self.dispatch(command).await,
            None => Ok(Flow::Continue),
        }
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<Flow, CoreError> {
        if command != Command::Quit {
            self.quit_armed = false;
        }

        match command {
            Command::Buy { token, quantity } => {
                let held = self.tracker.buy(&token, quantity)?;
                writeln!(self.out, "{token}: now holding {}", format_quantity(held))?;
            }
            Command::Sell { token, quantity, force } => {
                let held = self.tracker.sell(&token, quantity, force)?;
                writeln!(self.out, "{token}: now holding {}", format_quantity(held))?;
            }
            Command::Add { query, quantity } => {
                let outcome = self.tracker.add_token(&query, quantity).await;
                writeln!(self.out, "{outcome}")?;
            }
            Command::Remove { token } => {
                let removed = self.tracker.remove_token(&token)?;
                writeln!(self.out, "Removed {}", removed.name)?;
            }
            Command::Show => self.show()?,
            Command::Refresh => self.refresh().await?,
            Command::Get { query } => {
                let quote = self.tracker.get_quote(&query).await?;
                writeln!(self.out, "{quote}")?;
            }
            Command::Save => {
                self.tracker.save()?;
                writeln!(self.out, "Saved to {}", display_path(&self.tracker.config().portfolio_path))?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {
                if self.tracker.has_unsaved_changes() && !self.quit_armed {
                    self.quit_armed = true;
                    warn!("quit requested with unsaved changes");
                    writeln!(
                        self.out,
                        "You have unsaved changes. Type 'save' first, or 'quit' again to discard them."
                    )?;
                } else {
                    return Ok(Flow::Quit);
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Refresh then print, as done at startup.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let report = self.tracker.refresh().await;
        writeln!(
            self.out,
            "Refreshed {} of {} holdings",
            report.updated.len(),
            report.updated.len() + report.failed.len()
        )?;
        if !report.is_complete() {
            writeln!(self.out, "Kept previous prices for:")?;
            for (name, reason) in &report.failed {
                writeln!(self.out, "  {name}: {reason}")?;
            }
        }
        self.show()
    }

    pub fn show(&mut self) -> Result<(), CoreError> {
        if self.tracker.holdings().is_empty() {
            writeln!(self.out, "Portfolio is empty")?;
        }
        for holding in self.tracker.holdings() {
            writeln!(self.out, "{holding}")?;
        }
        writeln!(
            self.out,
            "Total: ${:.2} ({:+.2}%)",
            self.tracker.total_value(),
            self.tracker.daily_change_percent()
        )?;
        if let Some(at) = self.tracker.last_refreshed() {
            writeln!(self.out, "Prices as of {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}

/// Absolute form of `path` for display, falling back to the path as given.
pub fn display_path(path: &str) -> String {
    std::env::current_dir()
        .map(|dir| dir.join(path).display().to_string())
        .unwrap_or_else(|_| path.to_string())
}
