use std::env;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

fn config_path() -> PathBuf {
    match env::var("BOARDLENS_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => Config::default_path(),
    }
}

/// Print the active configuration as YAML, token redacted.
pub fn cmd_config_show(config: &Config) -> Result<()> {
    let mut display = config.clone();
    if let Some(auth) = &mut display.auth {
        auth.token = "[REDACTED]".to_string();
    }
    print!("{}", serde_yaml_ng::to_string(&display)?);
    Ok(())
}

/// Set one config value and persist it.
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let path = config_path();
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set_value(key, value)?;
    config.save_to(&path)?;
    println!("Set {key} in {}", path.display());
    Ok(())
}
