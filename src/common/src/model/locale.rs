use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_LOCALES: &str = include_str!("../../data/locales.json");

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    Es,
    En,
}

impl Language {
    // Selector order
    pub const ALL: [Language; 3] = [Language::De, Language::Es, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code {0:?}")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.code() == code)
            .ok_or_else(|| ParseLanguageError(s.to_owned()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocaleStrings {
    pub title: String,
    pub choose_option: String,
    pub scores: String,
    pub your_score: String,
    pub computer_score: String,
}

impl LocaleStrings {
    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("title", self.title.as_str()),
            ("choose_option", self.choose_option.as_str()),
            ("scores", self.scores.as_str()),
            ("your_score", self.your_score.as_str()),
            ("computer_score", self.computer_score.as_str()),
        ]
    }
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to parse locale table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("locale table has an entry for unsupported code {0:?}")]
    UnknownLanguage(String),
    #[error("locale table has no entry for {0}")]
    MissingLanguage(Language),
    #[error("locale {language} has an empty {field}")]
    EmptyField {
        language: Language,
        field: &'static str,
    },
}

/// Display strings per selectable language. Only obtainable through
/// [`LocaleTable::from_json`], which rejects incomplete tables.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    entries: HashMap<Language, LocaleStrings>,
}

impl LocaleTable {
    pub fn embedded() -> Result<Self, LocaleError> {
        Self::from_json(EMBEDDED_LOCALES)
    }

    pub fn from_json(text: &str) -> Result<Self, LocaleError> {
        let raw: HashMap<String, LocaleStrings> = serde_json::from_str(text)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (code, strings) in raw {
            let language = code
                .parse::<Language>()
                .map_err(|_| LocaleError::UnknownLanguage(code))?;
            entries.insert(language, strings);
        }
        let table = LocaleTable { entries };
        table.validate()?;
        Ok(table)
    }

    /// Every selectable language has a complete entry.
    pub fn validate(&self) -> Result<(), LocaleError> {
        for language in Language::ALL {
            let strings = self
                .entries
                .get(&language)
                .ok_or(LocaleError::MissingLanguage(language))?;
            if let Some((field, _)) = strings
                .fields()
                .into_iter()
                .find(|(_, value)| value.trim().is_empty())
            {
                return Err(LocaleError::EmptyField { language, field });
            }
        }
        Ok(())
    }

    pub fn get(&self, language: Language) -> &LocaleStrings {
        // Construction went through validate()
        &self.entries[&language]
    }
}
