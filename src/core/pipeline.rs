use tracing::info;

use super::{
    http::fetch_batch,
    FetchedPage,
    MergedRecord,
    RecordContent,
    VerbDeckError,
};
use crate::sources::{
    conjugation::parse_conjugation,
    examples::parse_examples,
    SourceSet,
};

/// Fetches both sources for `words`, one full batch after the other, and
/// merges the pages word by word.
pub async fn collect_records(
    words: &[String],
    sources: &SourceSet,
) -> Result<Vec<MergedRecord>, VerbDeckError> {
    let conjugation_pages = fetch_batch(&sources.conjugation, words).await?;
    info!("Fetched {} conjugation pages", conjugation_pages.len());

    let example_pages = fetch_batch(&sources.examples, words).await?;
    info!("Fetched {} example pages", example_pages.len());

    assemble(words, &conjugation_pages, &example_pages)
}

/// Merges the two batches by position. Words with nothing usable from
/// either source are left out.
pub fn assemble(
    words: &[String],
    conjugation_pages: &[FetchedPage],
    example_pages: &[FetchedPage],
) -> Result<Vec<MergedRecord>, VerbDeckError> {
    if conjugation_pages.len() != words.len() || example_pages.len() != words.len() {
        let index = words.len().min(conjugation_pages.len()).min(example_pages.len());
        return Err(VerbDeckError::BatchMismatch { index });
    }

    let total = words.len();
    let mut records = Vec::with_capacity(total);

    for (index, ((word, conjugation), examples)) in
        words.iter().zip(conjugation_pages).zip(example_pages).enumerate()
    {
        if &conjugation.word != word || &examples.word != word {
            return Err(VerbDeckError::BatchMismatch { index });
        }

        let content = RecordContent::from_parts(
            parse_conjugation(&conjugation.body),
            parse_examples(&examples.body),
        );
        let Some(content) = content else {
            continue;
        };

        info!("{}", progress_line(&content, total - index));
        records.push(MergedRecord::new(word.clone(), content));
    }

    Ok(records)
}

/// Progress message for a merged word. `remaining` counts from the word's
/// position in the whole batch, skipped words included.
pub fn progress_line(content: &RecordContent, remaining: usize) -> String {
    match content {
        RecordContent::Both { conjugation, .. } => format!(
            "Verb '{}' and its example are done, doing next one. {remaining} words remaining.",
            conjugation.verb
        ),
        RecordContent::ConjugationOnly(conjugation) => format!(
            "Verb '{}' is done, doing next one. {remaining} words remaining.",
            conjugation.verb
        ),
        RecordContent::ExamplesOnly(examples) => format!(
            "Word '{}' and its example are done, doing next one. {remaining} words remaining.",
            examples.headword
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        io,
        sync::{
            Arc,
            Mutex,
        },
    };

    use super::*;
    use crate::core::ConjugationRecord;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut guard = self.0.lock().map_err(|e| io::Error::other(e.to_string()))?;
            guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    const FAHREN: &str = include_str!("../../tests/fixtures/conjugation_fahren.html");
    const UNKNOWN: &str = include_str!("../../tests/fixtures/conjugation_unknown.html");
    const GEHEN_CONJUGATION: &str = r#"<span class="targetted-word-wrap">gehen</span>
        <div mobile-title="Indikativ Präsens"><i>er/sie/es</i><i>geht</i></div>"#;
    const GEHEN_EXAMPLES: &str = include_str!("../../tests/fixtures/examples_gehen.html");
    const NOT_FOUND: &str = include_str!("../../tests/fixtures/examples_not_found.html");

    fn pages(words: &[&str], bodies: &[&str]) -> Vec<FetchedPage> {
        words
            .iter()
            .zip(bodies)
            .map(|(word, body)| FetchedPage { word: word.to_string(), body: body.to_string() })
            .collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_word_failing_both_sources_is_skipped() {
        let list = ["gehen", "xyz123"];
        let records = assemble(
            &words(&list),
            &pages(&list, &[GEHEN_CONJUGATION, UNKNOWN]),
            &pages(&list, &[GEHEN_EXAMPLES, NOT_FOUND]),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "gehen");
        match &records[0].content {
            RecordContent::Both { conjugation, examples } => {
                assert_eq!(conjugation.verb, "gehen");
                assert_eq!(conjugation.forms, "geht");
                assert_eq!(examples.translations, vec!["go", "walk"]);
            }
            other => panic!("Expected Both, got {:?}", other),
        }
    }

    #[test]
    fn test_single_source_records_are_kept_as_is() {
        let list = ["fahren", "gehen"];
        let records = assemble(
            &words(&list),
            &pages(&list, &[FAHREN, UNKNOWN]),
            &pages(&list, &[NOT_FOUND, GEHEN_EXAMPLES]),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert!(matches!(&records[0].content, RecordContent::ConjugationOnly(c) if c.verb == "fahren"));
        assert!(matches!(&records[1].content, RecordContent::ExamplesOnly(e) if e.headword == "gehen"));
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let list = ["fahren", "gehen", "fahren"];
        let records = assemble(
            &words(&list),
            &pages(&list, &[FAHREN, GEHEN_CONJUGATION, FAHREN]),
            &pages(&list, &[NOT_FOUND, GEHEN_EXAMPLES, NOT_FOUND]),
        )
        .unwrap();

        let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_misaligned_batches_are_rejected() {
        let list = ["gehen", "fahren"];
        let swapped = ["fahren", "gehen"];
        let result = assemble(
            &words(&list),
            &pages(&list, &[GEHEN_CONJUGATION, FAHREN]),
            &pages(&swapped, &[FAHREN, GEHEN_EXAMPLES]),
        );
        assert!(matches!(result, Err(VerbDeckError::BatchMismatch { index: 0 })));

        let short = assemble(&words(&list), &pages(&list, &[GEHEN_CONJUGATION]), &[]);
        assert!(matches!(short, Err(VerbDeckError::BatchMismatch { .. })));
    }

    #[test]
    fn test_progress_line_per_content_kind() {
        let conjugation = ConjugationRecord { verb: "fahren".to_string(), forms: String::new() };
        assert_eq!(
            progress_line(&RecordContent::ConjugationOnly(conjugation), 3),
            "Verb 'fahren' is done, doing next one. 3 words remaining."
        );

        let examples = parse_examples(GEHEN_EXAMPLES).unwrap();
        assert_eq!(
            progress_line(&RecordContent::ExamplesOnly(examples), 1),
            "Word 'gehen' and its example are done, doing next one. 1 words remaining."
        );
    }

    #[test]
    fn test_remaining_count_ignores_skipped_words() {
        let list = ["xyz123", "gehen"];
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let records = tracing::subscriber::with_default(subscriber, || {
            assemble(
                &words(&list),
                &pages(&list, &[UNKNOWN, GEHEN_CONJUGATION]),
                &pages(&list, &[NOT_FOUND, GEHEN_EXAMPLES]),
            )
        })
        .unwrap();

        assert_eq!(records.len(), 1);
        let output = logs.contents();
        assert!(output.contains(
            "Verb 'gehen' and its example are done, doing next one. 1 words remaining."
        ));
        assert!(!output.contains("2 words remaining"));
    }

    #[test]
    fn test_empty_word_list() {
        assert!(assemble(&[], &[], &[]).unwrap().is_empty());
    }
}
