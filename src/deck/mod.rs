//! Flashcard deck output.
//!
//! A deck template (CrowdAnki JSON) is loaded once; every merged record
//! that carries a verb, its translations and its forms becomes one note
//! appended to the template's `notes` array.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::core::{
    utils,
    MergedRecord,
    RecordContent,
    VerbDeckError,
    FORM_SEPARATOR,
};

/// Note model the field order below is written for.
pub const NOTE_MODEL_UUID: &str = "f77f193d-598b-11ea-ba0f-1867b089b138";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckNote {
    #[serde(rename = "__type__")]
    pub kind: &'static str,
    pub data: String,
    pub fields: Vec<String>,
    pub flags: u32,
    pub guid: String,
    #[serde(rename = "newlyAdded")]
    pub newly_added: bool,
    pub note_model_uuid: String,
    pub tags: Vec<String>,
}

impl DeckNote {
    pub fn new(fields: Vec<String>, guid: String, note_model_uuid: &str) -> Self {
        Self {
            kind: "Note",
            data: String::new(),
            fields,
            flags: 0,
            guid,
            newly_added: true,
            note_model_uuid: note_model_uuid.to_string(),
            tags: Vec::new(),
        }
    }

    /// Builds the note for a record, or `None` when the record lacks the
    /// verb, translations or forms.
    pub fn from_record(record: &MergedRecord, note_model_uuid: &str) -> Option<Self> {
        note_fields(record).map(|fields| Self::new(fields, new_guid(), note_model_uuid))
    }
}

/// 32 lowercase hex characters.
pub fn new_guid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Verb, translations, forms, then each sentence pair in turn.
pub fn note_fields(record: &MergedRecord) -> Option<Vec<String>> {
    let RecordContent::Both { conjugation, examples } = &record.content else {
        return None;
    };

    let mut fields = vec![
        conjugation.verb.clone(),
        examples.translations.join(FORM_SEPARATOR),
        conjugation.forms.clone(),
    ];
    for (source, target) in examples.sentence_pairs() {
        fields.push(source.to_string());
        fields.push(target.to_string());
    }
    Some(fields)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SerializeReport {
    pub added: usize,
    pub dropped: usize,
}

/// A loaded deck document.
#[derive(Debug, Clone)]
pub struct Deck {
    document: Value,
    note_model_uuid: String,
}

impl Deck {
    pub fn from_value(document: Value, note_model_uuid: &str) -> Result<Self, VerbDeckError> {
        if !document.is_object() {
            return Err(VerbDeckError::InvalidDeck(format!(
                "expected object, found {}",
                json_type(&document)
            )));
        }
        Ok(Self { document, note_model_uuid: note_model_uuid.to_string() })
    }

    pub fn load(path: &Path, note_model_uuid: &str) -> Result<Self, VerbDeckError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_value(serde_json::from_str(&json)?, note_model_uuid)
    }

    pub fn save(&self, path: &Path) -> Result<(), VerbDeckError> {
        utils::write_json(path, &self.document)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn notes(&self) -> &[Value] {
        self.document.get("notes").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends one note per complete record, in record order.
    pub fn append_records(
        &mut self,
        records: &[MergedRecord],
    ) -> Result<SerializeReport, VerbDeckError> {
        let mut report = SerializeReport::default();
        let mut notes = Vec::with_capacity(records.len());

        for record in records {
            match DeckNote::from_record(record, &self.note_model_uuid) {
                Some(note) => notes.push(serde_json::to_value(note)?),
                None => {
                    warn!(
                        "'{}' is missing a verb, translations or forms. Not added to the deck.",
                        record.content.display_name()
                    );
                    report.dropped += 1;
                }
            }
        }
        report.added = notes.len();

        let object = self
            .document
            .as_object_mut()
            .ok_or_else(|| VerbDeckError::InvalidDeck("deck is not an object".to_string()))?;
        match object.entry("notes").or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(existing) => existing.extend(notes),
            other => *other = Value::Array(notes),
        }

        Ok(report)
    }
}
