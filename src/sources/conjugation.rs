//! Verb forms from conjugation pages.
//!
//! A page yields the corrected spelling of the verb plus one form from each
//! of three tense sections: third person singular present, third person
//! singular past, and the perfect infinitive with its auxiliary.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    core::{
        utils::normalize_ws,
        ConjugationRecord,
        FORM_SEPARATOR,
    },
    markup::{
        Document,
        Element,
    },
};

pub const CONJUGATION_URL: &str =
    "https://konjugator.reverso.net/konjugation-deutsch-verb-XXXXXX.html";

/// Tense sections kept from a conjugation page, matched on `mobile-title`.
pub const SECTIONS: [&str; 3] = ["Indikativ Präsens", "Indikativ Präteritum", "Infinitiv Perfekt"];

const ERROR_CLASS: &str = "errorv";
const UNKNOWN_WORD_CLASS: &str = "unknown-word-warning";
const CORRECTED_WORD_CLASS: &str = "targetted-word-wrap";

fn third_person_label() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| Regex::new("er/sie/es").expect("static pattern"))
}

/// `None` for error pages, unknown words and pages without a verb heading.
pub fn parse_conjugation(body: &str) -> Option<ConjugationRecord> {
    let doc = Document::parse(body);
    let root = doc.root();

    if root.find_class(ERROR_CLASS).is_some() || root.find_class(UNKNOWN_WORD_CLASS).is_some() {
        return None;
    }

    let verb = root.find_class(CORRECTED_WORD_CLASS)?.text().trim().to_string();

    let forms: Vec<String> = root
        .find_all(|el| el.attr("mobile-title").is_some_and(|title| SECTIONS.contains(&title)))
        .map(|section| section_form(&section))
        .collect();

    Some(ConjugationRecord { verb, forms: forms.join(FORM_SEPARATOR) })
}

/// The third person singular form, or the list fallback when a section
/// has no such row.
fn section_form(section: &Element<'_>) -> String {
    section
        .find_text_parent(third_person_label())
        .and_then(|label| label.next_sibling_text())
        .map(|form| form.trim().to_string())
        .unwrap_or_else(|| {
            let items: Vec<String> =
                section.find_tag("li").map(|li| normalize_ws(&li.text())).collect();
            merge_list_forms(&items)
        })
}

/// Collapses list-style forms into one string.
///
/// Two items sharing their first word keep it once ("gefahren sein, haben");
/// two items sharing their second word keep that once ("überholt, übergeholt
/// haben"). The first-word check wins when both apply. Anything else is
/// joined with the separator.
pub fn merge_list_forms(items: &[String]) -> String {
    if let [single] = items {
        return single.clone();
    }

    if let [first, second] = items {
        let first: Vec<&str> = first.split_whitespace().collect();
        let second: Vec<&str> = second.split_whitespace().collect();

        if let ([a0, a1, ..], [b0, b1, ..]) = (first.as_slice(), second.as_slice()) {
            if a0 == b0 {
                return format!("{a0} {a1}, {b1}");
            }
            if a1 == b1 {
                return format!("{a0}, {b0} {b1}");
            }
        }
    }

    items.join(FORM_SEPARATOR)
}
