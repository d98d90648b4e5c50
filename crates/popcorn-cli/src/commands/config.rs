use super::context::Context;
use super::prompts;
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::{resolve_api_key, API_KEY_ENV};
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Path => show_paths(output),
        crate::ConfigCommands::SetApiKey { key } => set_api_key(key, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let config = &ctx.config;
    let env_key = std::env::var(API_KEY_ENV).ok();
    let api_key = resolve_api_key(env_key.as_deref(), &ctx.credentials, config).ok();
    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };

    output.json(&json!({
        "config_file": ctx.paths.config_file(),
        "catalog": {
            "base_url": config.catalog.base_url,
            "api_key": api_key_display,
            "timeout_secs": config.catalog.timeout_secs,
        },
        "storage": {
            "watched_key": config.storage.watched_key,
        },
        "ui": {
            "default_title": config.ui.default_title,
            "min_query_len": config.ui.min_query_len,
        },
    }));

    let mut table = new_table(vec!["Setting", "Value"]);
    table.add_row(vec!["Config file".to_string(), ctx.paths.config_file().display().to_string()]);
    table.add_row(vec!["Catalog URL".to_string(), config.catalog.base_url.clone()]);
    table.add_row(vec!["API key".to_string(), api_key_display]);
    table.add_row(vec!["Timeout".to_string(), format!("{}s", config.catalog.timeout_secs)]);
    table.add_row(vec!["Watched list key".to_string(), config.storage.watched_key.clone()]);
    table.add_row(vec!["Default title".to_string(), config.ui.default_title.clone()]);
    table.add_row(vec!["Minimum query length".to_string(), config.ui.min_query_len.to_string()]);
    output.table(&table);
    Ok(())
}

fn show_paths(output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let paths = &ctx.paths;

    output.json(&json!({
        "config_file": paths.config_file(),
        "credentials_file": paths.credentials_file(),
        "store_dir": paths.store_dir(),
        "log_file": paths.log_file(),
    }));

    let mut table = new_table(vec!["Path", "Location"]);
    table.add_row(vec!["Config file".to_string(), paths.config_file().display().to_string()]);
    table.add_row(vec!["Credentials".to_string(), paths.credentials_file().display().to_string()]);
    table.add_row(vec!["Stored values".to_string(), paths.store_dir().display().to_string()]);
    table.add_row(vec!["Log file".to_string(), paths.log_file().display().to_string()]);
    output.table(&table);
    Ok(())
}

fn set_api_key(key: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = Context::load()?;
    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("OMDb API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        output.error("API key cannot be empty");
        return Err(eyre!("API key cannot be empty"));
    }

    ctx.paths.ensure_directories()
        .map_err(|e| eyre!("Failed to create {}: {}", ctx.paths.config_dir().display(), e))?;
    ctx.credentials.set_omdb_api_key(key);
    ctx.credentials.save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", ctx.credentials.path().display(), e))?;
    tracing::info!("Stored OMDb API key in {}", ctx.credentials.path().display());
    output.success(format!("API key saved to {}", ctx.credentials.path().display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("1a2b3c4d"), "1a***4d");
    }
}
