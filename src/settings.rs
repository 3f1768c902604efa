use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::VerbDeckError,
    deck::NOTE_MODEL_UUID,
    persistence,
    sources::{
        conjugation::CONJUGATION_URL,
        Language,
        SourceSet,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";
const DECK_TEMPLATE_DIR: &str = "decks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub conjugation_url: String,
    pub examples_url: Option<String>, // Overrides the language's default source
    pub word_limit: Option<usize>,
    pub deck_template: Option<PathBuf>,
    pub results_path: PathBuf,
    pub deck_path: PathBuf,
    pub note_model_uuid: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            conjugation_url: CONJUGATION_URL.to_string(),
            examples_url: None,
            word_limit: None,
            deck_template: None,
            results_path: PathBuf::from("verbsdata.json"),
            deck_path: PathBuf::from("deck.json"),
            note_model_uuid: NOTE_MODEL_UUID.to_string(),
        }
    }
}

impl Settings {
    /// Reads `path` when given (it must exist), otherwise the per-user
    /// settings file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, VerbDeckError> {
        match path {
            Some(path) if !path.exists() => Err(VerbDeckError::Custom(format!(
                "Settings file not found: {}",
                path.display()
            ))),
            Some(path) => persistence::load_json(path),
            None => Ok(persistence::load_json_or_default(&persistence::get_data_file_path(
                SETTINGS_FILE,
            ))),
        }
    }

    pub fn sources(&self) -> Result<SourceSet, VerbDeckError> {
        let examples = self.examples_url.as_deref().unwrap_or(self.language.examples_url());
        SourceSet::new(&self.conjugation_url, examples)
    }

    pub fn deck_template_path(&self) -> PathBuf {
        self.deck_template
            .clone()
            .unwrap_or_else(|| Path::new(DECK_TEMPLATE_DIR).join(self.language.deck_template_name()))
    }
}
