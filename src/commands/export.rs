use std::fs;
use std::path::PathBuf;

use crate::commands::Session;
use crate::error::Result;

/// Export detection records as an archive and write it to disk.
///
/// The write is a side effect outside the coordinator's state machine;
/// receiving the archive bytes is the completion acknowledgment.
pub async fn cmd_export(session: &Session, ids: &[String], output: Option<PathBuf>) -> Result<()> {
    let archive = session.batch.export_selected(ids).await?;

    let path = output.unwrap_or_else(|| PathBuf::from(&archive.filename));
    fs::write(&path, &archive.bytes)?;

    println!(
        "Exported {} record(s) to {} ({} bytes)",
        ids.len(),
        path.display(),
        archive.bytes.len()
    );
    Ok(())
}
