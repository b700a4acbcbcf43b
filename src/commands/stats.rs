use crate::commands::Session;
use crate::display::format_stats;
use crate::error::Result;

/// Fetch and print aggregate detection statistics.
pub async fn cmd_stats(session: &Session, output_json: bool) -> Result<()> {
    let stats = session.controller.refresh_stats().await?;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_stats(&stats));
    }
    Ok(())
}
