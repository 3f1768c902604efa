use std::{
    fs,
    io::Write,
    path::Path,
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::warn;

use super::VerbDeckError;

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads one word per line, keeping the first `limit` lines when given.
pub fn read_word_list(path: &Path, limit: Option<usize>) -> Result<Vec<String>, VerbDeckError> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_word_list(&contents, limit))
}

/// Characters that would change the requested URL rather than name a word.
const URL_BREAKING_CHARS: [char; 4] = ['/', '?', '#', '%'];

/// Trimmed, non-blank lines. Lines that cannot be placed in a URL are
/// logged and left out.
pub fn parse_word_list(contents: &str, limit: Option<usize>) -> Vec<String> {
    contents
        .lines()
        .take(limit.unwrap_or(usize::MAX))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let usable = !line.contains(URL_BREAKING_CHARS);
            if !usable {
                warn!("'{line}' contains a character not allowed in a URL. Skipped.");
            }
            usable
        })
        .map(str::to_string)
        .collect()
}

/// JSON with a four space indent; non-ASCII text is written as is.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, VerbDeckError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| VerbDeckError::Custom(e.to_string()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), VerbDeckError> {
    let json = to_json_string(value)?;
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
