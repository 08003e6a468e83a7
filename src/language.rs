use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the translator can target. One is selected globally for every unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    Russian,
    Italian,
    French,
    Spanish,
    German,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 5] = [
        TargetLanguage::Russian,
        TargetLanguage::Italian,
        TargetLanguage::French,
        TargetLanguage::Spanish,
        TargetLanguage::German,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Russian => "Russian",
            TargetLanguage::Italian => "Italian",
            TargetLanguage::French => "French",
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::German => "German",
        }
    }

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::Russian => "ru",
            TargetLanguage::Italian => "it",
            TargetLanguage::French => "fr",
            TargetLanguage::Spanish => "es",
            TargetLanguage::German => "de",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = TargetLanguage::ALL.iter().map(|l| l.name()).collect();
        write!(
            f,
            "unknown language '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for TargetLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TargetLanguage::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted) || l.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLanguage(wanted.to_string()))
    }
}
