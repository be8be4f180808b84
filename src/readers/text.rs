use crate::error::Result;
use std::path::Path;

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Decode logger bytes as UTF-8, dropping anything that is not valid text.
///
/// A leading BOM is removed. Malformed sequences are discarded rather than
/// kept as replacement characters, so a noisy byte inside a timestamp does
/// not leave a stray glyph behind. `\r\n` and lone `\r` line endings come
/// back as `\n`.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    let text = if had_errors {
        text.chars().filter(|c| *c != REPLACEMENT_CHAR).collect()
    } else {
        text.into_owned()
    };
    normalize_line_endings(text)
}

fn normalize_line_endings(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}
