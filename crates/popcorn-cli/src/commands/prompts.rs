use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};
use popcorn_models::MAX_USER_RATING;

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Pick one of `items`. `None` when the user pressed Esc or q.
pub fn prompt_select(prompt: &str, items: &[String], default: usize) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len().saturating_sub(1)))
        .interact_opt()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read selection: {}", e))
}

/// Star rating picker, preselecting `current` when set.
pub fn prompt_rating(current: u8) -> Result<Option<u8>> {
    let items: Vec<String> = (1..=MAX_USER_RATING)
        .map(|stars| format!("{:>2} {}", stars, "★".repeat(stars as usize)))
        .collect();
    let default = current.saturating_sub(1) as usize;
    Ok(prompt_select("Your rating", &items, default)?.map(|index| index as u8 + 1))
}
