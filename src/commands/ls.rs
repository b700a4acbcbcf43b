use serde_json::json;

use crate::commands::Session;
use crate::display::{page_footer, record_table};
use crate::error::Result;
use crate::query::QueryPatch;

/// List detection records with the given filters applied.
pub async fn cmd_ls(session: &Session, patch: QueryPatch, page: u32, output_json: bool) -> Result<()> {
    session.controller.set_filter(patch).await?;
    if page > 1 {
        // Explicit page request: dispatch even past the last-known page
        // count, the server is authoritative
        session.controller.fetch(page, None).await?;
    }

    let view = session.controller.view();

    if output_json {
        let payload = json!({
            "records": view.records,
            "page": view.page,
            "query": view.query,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if view.records.is_empty() {
        println!("No detection records match the current filters.");
        return Ok(());
    }

    println!("{}", record_table(&view.records));
    println!("{}", page_footer(&view.page));
    Ok(())
}

/// Show the defect-type filter options the server currently knows about.
pub async fn cmd_defect_types(session: &Session, output_json: bool) -> Result<()> {
    let options = session.controller.available_defect_types().await;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for option in options {
        if option.count > 0 {
            println!("{:18} {} ({})", option.value, option.label, option.count);
        } else {
            println!("{:18} {}", option.value, option.label);
        }
    }
    Ok(())
}
