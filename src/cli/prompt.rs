use anyhow::{Context, Result};
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};

use crate::core::console::Console;
use crate::fixers::FixScope;

pub const FIX_ALL_ISSUES: char = 'f';
pub const FIX_ERRORS: char = 'e';
pub const FIX_WARNINGS: char = 'w';
pub const EXIT: char = '\r';
const CTRL_C: char = '\u{3}';

/// Lines printed by [`print_usage`], cleared again before fixing.
const USAGE_LINES: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChoice {
    Fix(FixScope),
    Exit,
}

/// Map a keystroke to a choice. Unknown keys are ignored.
pub fn choice_for(key: char) -> Option<KeyChoice> {
    match key {
        FIX_ALL_ISSUES => Some(KeyChoice::Fix(FixScope::AllIssues)),
        FIX_ERRORS => Some(KeyChoice::Fix(FixScope::ErrorsOnly)),
        FIX_WARNINGS => Some(KeyChoice::Fix(FixScope::WarningsOnly)),
        EXIT | CTRL_C => Some(KeyChoice::Exit),
        _ => None,
    }
}

/// Pull keys until one of them means something.
pub fn wait_for_choice(mut next_key: impl FnMut() -> Result<char>) -> Result<KeyChoice> {
    loop {
        let key = next_key()?;
        match choice_for(key) {
            Some(choice) => return Ok(choice),
            None => tracing::debug!(?key, "ignoring key"),
        }
    }
}

pub fn print_usage(console: &dyn Console) {
    let option = |text: String| console.line(&format!(" \u{203A} {}", text));
    console.blank();
    console.line(&format!("{}", "Usage".bold()));
    option(format!("{} {} {}", "Press".dimmed(), FIX_ALL_ISSUES, "to fix all issues.".dimmed()));
    option(format!("{} {} {}", "Press".dimmed(), FIX_ERRORS, "to fix errors.".dimmed()));
    option(format!("{} {} {}", "Press".dimmed(), FIX_WARNINGS, "to fix warnings.".dimmed()));
    option(format!("{} Enter {}", "Press".dimmed(), "to exit.".dimmed()));
}

/// Remove the usage block from the screen.
pub fn clear_usage() -> Result<()> {
    execute!(
        std::io::stdout(),
        cursor::MoveToPreviousLine(USAGE_LINES),
        terminal::Clear(terminal::ClearType::FromCursorDown)
    )
    .context("failed to clear the fix options")
}

/// Raw-mode terminal input, restored when dropped.
pub struct InteractiveSession {
    _private: (),
}

impl InteractiveSession {
    pub fn acquire() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self { _private: () })
    }

    /// Block until the next key press and return it as a character.
    pub fn read_key(&self) -> Result<char> {
        loop {
            let Event::Key(key) = event::read().context("failed to read key")? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(CTRL_C)
                }
                KeyCode::Enter => return Ok(EXIT),
                KeyCode::Char(c) => return Ok(c),
                _ => continue,
            }
        }
    }
}

impl Drop for InteractiveSession {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Show the usage block and wait for a choice on the terminal.
pub async fn prompt(console: &dyn Console) -> Result<KeyChoice> {
    print_usage(console);
    tokio::task::spawn_blocking(|| {
        let session = InteractiveSession::acquire()?;
        wait_for_choice(|| session.read_key())
    })
    .await
    .context("key reader panicked")?
}
