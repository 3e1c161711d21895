use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale used for localized word lists (names, cities, lorem words).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocaleKey {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
    #[serde(rename = "zh_CN")]
    ZhCn,
}

impl LocaleKey {
    pub const ALL: &'static [LocaleKey] = &[LocaleKey::EnUs, LocaleKey::PtBr, LocaleKey::ZhCn];

    /// Accepts `en_US` as well as `en-US` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.replace('-', "_").as_str() {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            "zh_CN" => Some(Self::ZhCn),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
            Self::ZhCn => "zh_CN",
        }
    }
}

impl FromStr for LocaleKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("unsupported locale '{value}'"))
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::LocaleKey;

    #[test]
    fn parses_both_separators() {
        assert_eq!(LocaleKey::parse("pt_BR"), Some(LocaleKey::PtBr));
        assert_eq!(LocaleKey::parse("zh-CN"), Some(LocaleKey::ZhCn));
        assert_eq!(LocaleKey::parse("xx_XX"), None);
        assert_eq!("en_US".parse::<LocaleKey>(), Ok(LocaleKey::EnUs));
    }
}
