use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use ratatui::DefaultTerminal;

/// Raw mode and the alternate screen for as long as the guard lives.
///
/// `ratatui::try_init` also installs a panic hook that restores the terminal
/// before the panic message is printed.
pub struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        let terminal = ratatui::try_init().context("failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl Deref for TerminalGuard {
    type Target = DefaultTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}
