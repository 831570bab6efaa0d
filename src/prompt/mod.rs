// ===========================================================================
// prompt - Interactive User Input
// ===========================================================================

use std::io::IsTerminal;

use dialoguer::Confirm;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("user cancelled")]
    Cancelled,

    #[error("confirmation needed but stdin is not a terminal (pass --yes)")]
    NotInteractive,
}

/// Ask for confirmation, defaulting to no
pub fn confirm(message: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(Error::NotInteractive);
    }

    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|_| Error::Cancelled)
}
