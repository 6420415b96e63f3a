//! Terminal rendering shared by the page commands.

use storedash_client::DeleteConflict;
use storedash_sync::{LoadState, Notice, SyncError};

/// Prints notices in arrival order: successes to stdout, errors to stderr.
pub(crate) fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice {
            Notice::Success(message) => println!("ok: {message}"),
            Notice::Error(message) => eprintln!("error: {message}"),
        }
    }
}

pub(crate) fn print_conflict(conflict: &DeleteConflict) {
    eprintln!("{}", conflict.title());
    eprintln!("  {}", conflict.explanation());
}

/// Fails when the page's initial fetch did not succeed.
pub(crate) fn ensure_loaded(state: &LoadState) -> anyhow::Result<()> {
    match state {
        LoadState::Failed { message } => {
            anyhow::bail!("{message}; run the command again to retry")
        }
        _ => Ok(()),
    }
}

/// Converts an action result after its notices have been printed.
///
/// Errors already shown to the user as a notice or a conflict dialog become
/// a short summary rather than repeating the message.
pub(crate) fn finish<T>(result: Result<T, SyncError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Some(conflict) = err.conflict() {
                print_conflict(conflict);
                anyhow::bail!("delete blocked");
            }
            match err {
                SyncError::Validation(_)
                | SyncError::Api(_)
                | SyncError::Busy { .. }
                | SyncError::Frozen(_) => {
                    anyhow::bail!("action failed")
                }
                other => Err(other.into()),
            }
        }
    }
}

/// Asks for `--yes` before a destructive action.
pub(crate) fn confirmed(yes: bool, what: &str) -> bool {
    if !yes {
        println!("about to delete {what}; re-run with --yes to confirm");
    }
    yes
}

/// Truncates to `max` characters, appending `...` when cut.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
