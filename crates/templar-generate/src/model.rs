use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::random::LocaleKey;

/// Options for the template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockOptions {
    /// Seed for the random source; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Locale used by the word, name and address placeholders.
    pub locale: LocaleKey,
}

impl MockOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, GenerationError> {
        toml::from_str(text).map_err(|err| GenerationError::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::MockOptions;
    use crate::random::LocaleKey;

    #[test]
    fn parses_toml() {
        let options = MockOptions::from_toml_str("seed = 42\nlocale = \"pt_BR\"\n").expect("options");
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.locale, LocaleKey::PtBr);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let options = MockOptions::from_toml_str("").expect("options");
        assert_eq!(options, MockOptions::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(MockOptions::from_toml_str("speed = 1").is_err());
    }
}
