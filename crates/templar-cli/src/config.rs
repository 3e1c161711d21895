use std::path::Path;

use templar_generate::{LocaleKey, MockOptions};

use crate::CliError;

/// Loads engine options from an optional TOML file and applies flag
/// overrides on top.
pub fn resolve_options(
    config: Option<&Path>,
    seed: Option<u64>,
    locale: Option<LocaleKey>,
) -> Result<MockOptions, CliError> {
    let mut options = match config {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            MockOptions::from_toml_str(&content)?
        }
        None => MockOptions::default(),
    };

    if seed.is_some() {
        options.seed = seed;
    }
    if let Some(locale) = locale {
        options.locale = locale;
    }
    Ok(options)
}
