use serde::Serialize;
use uuid::Uuid;

/// Delimiter used to join verb forms and translations into one field.
pub const FORM_SEPARATOR: &str = "/";

/// A downloaded page body tagged with the word it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub word: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConjugationRecord {
    pub verb: String,   // Spelling as corrected by the conjugation source
    pub forms: String,  // "fährt/fuhr/gefahren sein"
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExampleFields {
    pub translations: Vec<String>,
    pub source_sentences: Vec<String>, // Aligned by index with target_sentences
    pub target_sentences: Vec<String>,
}

impl ExampleFields {
    /// Sentence pairs, stopping at the shorter of the two lists.
    pub fn sentence_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.source_sentences
            .iter()
            .zip(self.target_sentences.iter())
            .map(|(src, trg)| (src.as_str(), trg.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleRecord {
    pub headword: String,
    #[serde(flatten)]
    pub fields: ExampleFields,
}

/// What the two sources produced for a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordContent {
    Both {
        #[serde(flatten)]
        conjugation: ConjugationRecord,
        #[serde(flatten)]
        examples: ExampleFields,
    },
    ConjugationOnly(ConjugationRecord),
    ExamplesOnly(ExampleRecord),
}

impl RecordContent {
    /// Combines the two optional extractions; `None` when both failed.
    pub fn from_parts(
        conjugation: Option<ConjugationRecord>,
        examples: Option<ExampleRecord>,
    ) -> Option<Self> {
        match (conjugation, examples) {
            (Some(conjugation), Some(examples)) => {
                Some(RecordContent::Both { conjugation, examples: examples.fields })
            }
            (Some(conjugation), None) => Some(RecordContent::ConjugationOnly(conjugation)),
            (None, Some(examples)) => Some(RecordContent::ExamplesOnly(examples)),
            (None, None) => None,
        }
    }

    /// The name shown in progress output.
    pub fn display_name(&self) -> &str {
        match self {
            RecordContent::Both { conjugation, .. } => &conjugation.verb,
            RecordContent::ConjugationOnly(conjugation) => &conjugation.verb,
            RecordContent::ExamplesOnly(examples) => &examples.headword,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub id: Uuid,
    #[serde(skip)]
    pub word: String, // Input word this record was fetched for
    #[serde(flatten)]
    pub content: RecordContent,
}

impl MergedRecord {
    pub fn new(word: impl Into<String>, content: RecordContent) -> Self {
        Self { id: Uuid::new_v4(), word: word.into(), content }
    }
}
