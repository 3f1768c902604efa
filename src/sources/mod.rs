pub mod conjugation;
pub mod examples;

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    http::UrlTemplate,
    VerbDeckError,
};

/// Target language of translations and example sentences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn examples_url(&self) -> &'static str {
        match self {
            Language::En => "https://context.reverso.net/übersetzung/deutsch-englisch/XXXXXX",
            Language::Fr => "https://context.reverso.net/übersetzung/deutsch-franzosisch/XXXXXX",
        }
    }

    /// Default deck template file name for this language.
    pub fn deck_template_name(&self) -> String {
        format!("deck_{}_sample.json", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// URL templates of the two sources queried for every word.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub conjugation: UrlTemplate,
    pub examples: UrlTemplate,
}

impl SourceSet {
    pub fn new(conjugation: &str, examples: &str) -> Result<Self, VerbDeckError> {
        Ok(Self { conjugation: UrlTemplate::new(conjugation)?, examples: UrlTemplate::new(examples)? })
    }

    pub fn for_language(language: Language) -> Result<Self, VerbDeckError> {
        Self::new(conjugation::CONJUGATION_URL, language.examples_url())
    }
}
