use tracing::warn;

use crate::{
    core::{
        utils::normalize_ws,
        ExampleFields,
        ExampleRecord,
    },
    markup::{
        Document,
        Element,
    },
};

const TITLE_CLASS: &str = "title-content";
const TRANSLATIONS_ID: &str = "translations-content";
const SOURCE_SENTENCE_CLASSES: [&str; 2] = ["src", "ltr"];
const TARGET_SENTENCE_CLASSES: [&str; 2] = ["trg", "ltr"];

/// Entries kept per list (translations and sentence pairs).
pub const MAX_ENTRIES: usize = 2;

/// The quoted word in a title like `Übersetzung für "gehen" im Englisch`.
fn quoted_headword(title: &str) -> Option<String> {
    title.split('"').nth(1).map(|word| word.trim().to_string())
}

fn texts<'a>(elements: impl Iterator<Item = Element<'a>>) -> Vec<String> {
    elements.take(MAX_ENTRIES).map(|el| normalize_ws(&el.text())).collect()
}

/// Headword, translations and aligned example sentences.
///
/// A page missing its title or translation block is logged and skipped.
pub fn parse_examples(body: &str) -> Option<ExampleRecord> {
    let doc = Document::parse(body);
    let root = doc.root();

    let headword = root.find_class(TITLE_CLASS).and_then(|title| quoted_headword(&title.text()));
    let Some(headword) = headword else {
        warn!("Example page has no recognisable headword. Skipped.");
        return None;
    };

    let Some(block) = root.find_id(TRANSLATIONS_ID) else {
        warn!("The word '{headword}' can not be found. Skipped.");
        return None;
    };

    let mut translations = texts(block.find_tag("a"));
    if translations.is_empty() {
        translations = texts(block.descendants());
    }

    let source_sentences = texts(root.find_all(|el| el.has_classes(&SOURCE_SENTENCE_CLASSES)));
    let target_sentences = texts(root.find_all(|el| el.has_classes(&TARGET_SENTENCE_CLASSES)));

    Some(ExampleRecord {
        headword,
        fields: ExampleFields { translations, source_sentences, target_sentences },
    })
}
