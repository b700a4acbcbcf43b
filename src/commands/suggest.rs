use crate::commands::Session;
use crate::error::Result;
use crate::suggest::MIN_INPUT_LEN;

/// One-shot suggestion lookup for a partial search input.
pub async fn cmd_suggest(session: &Session, text: &str, output_json: bool) -> Result<()> {
    let suggestions = session.suggester.lookup(text).await?;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        if text.chars().count() < MIN_INPUT_LEN {
            println!("Type at least {MIN_INPUT_LEN} characters to get suggestions.");
        } else {
            println!("No suggestions for '{text}'.");
        }
        return Ok(());
    }

    for suggestion in suggestions {
        println!("{:6} {}", suggestion.kind.to_string(), suggestion.label);
    }
    Ok(())
}
