use owo_colors::OwoColorize;

use crate::commands::Session;
use crate::display::format_delete_outcome;
use crate::error::{HistoryError, Result};

/// Delete one or more detection records.
///
/// A single id goes through the single-delete path; several ids go through
/// the batch path, where per-item failures are reported as a qualified
/// success rather than an error.
pub async fn cmd_delete(session: &Session, ids: &[String], yes: bool) -> Result<()> {
    if ids.is_empty() {
        return Err(HistoryError::NothingSelected);
    }
    if !yes {
        return Err(HistoryError::Config(format!(
            "refusing to delete {} record(s) without --yes",
            ids.len()
        )));
    }

    let outcome = if let [id] = ids {
        session.batch.delete_single(id).await?
    } else {
        session.batch.delete_selected(ids).await?
    };

    println!("{}", format_delete_outcome(&outcome));
    if outcome.fail_count > 0 {
        println!(
            "{}",
            "Some records could not be deleted; they may already be gone.".dimmed()
        );
    }
    Ok(())
}
