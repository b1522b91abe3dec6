//! Lyrics storage encoding
//!
//! Songs keep their lyrics in a single text column. Two shapes live in that
//! column side by side:
//!
//! - **structured**: a JSON document holding the ordered verse list. New
//!   writes use the versioned envelope `{"version":1,"verses":[...]}`. Older
//!   rows carry the untagged `{"verses":[...]}` object or a bare JSON array.
//! - **raw text**: newline-delimited lyrics as they were pasted in, possibly
//!   with escaped `\n` sequences. These are segmented on read.
//!
//! [`decode`] never fails. Whatever is stored, readers get a best-effort
//! [`SongText`] back, so a corrupt row cannot take down the lyrics endpoint.
//!
//! ```
//! use core_library::lyrics;
//! use core_library::models::SongText;
//!
//! let text = SongText::new(vec!["first".into(), "".into(), "third".into()]);
//! let stored = lyrics::encode(&text).unwrap();
//! assert_eq!(lyrics::decode(Some(&stored)), text);
//!
//! let legacy = lyrics::decode(Some("line1\nline2\n\nline3"));
//! assert_eq!(legacy.verses, vec!["line1", "line2", "line3"]);
//! ```

use crate::error::Result;
use crate::models::SongText;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Envelope version written by [`encode`].
pub const ENCODING_VERSION: u32 = 1;

const PARAGRAPH_BREAK: &str = "\n\n";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    verses: &'a [String],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLyrics {
    Envelope {
        #[serde(default)]
        version: Option<u32>,
        verses: Vec<String>,
    },
    Bare(Vec<String>),
}

/// Encode verses for storage.
///
/// Order and exact verse text (including empty verses) are preserved.
pub fn encode(text: &SongText) -> Result<String> {
    let encoded = serde_json::to_string(&EnvelopeRef {
        version: ENCODING_VERSION,
        verses: &text.verses,
    })?;
    Ok(encoded)
}

/// Decode a stored lyrics column.
///
/// Missing or blank input yields an empty verse list. Structured encodings
/// are returned exactly as stored; anything else goes through [`segment`].
pub fn decode(stored: Option<&str>) -> SongText {
    let Some(stored) = stored else {
        return SongText::default();
    };

    if stored.trim().is_empty() {
        return SongText::default();
    }

    match serde_json::from_str::<StoredLyrics>(stored) {
        Ok(StoredLyrics::Envelope { version, verses }) => {
            if version.is_some_and(|v| v > ENCODING_VERSION) {
                debug!(?version, "Decoding lyrics written by a newer encoder");
            }
            SongText::new(verses)
        }
        Ok(StoredLyrics::Bare(verses)) => SongText::new(verses),
        Err(_) => {
            debug!(len = stored.len(), "Lyrics are not structured, segmenting raw text");
            segment(stored)
        }
    }
}

/// Split raw lyrics text into verses.
///
/// Double newlines (real or escaped as `\\n\\n`) separate paragraphs. Each
/// paragraph is trimmed and split into lines, each line is trimmed, and
/// every non-empty line becomes a verse, in reading order.
///
/// Every escaped newline is unescaped, not only doubled ones: a literal
/// `\\n` or `\\r\\n` inside stored text also ends a verse.
pub fn segment(raw: &str) -> SongText {
    let unescaped = raw
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\r\n", "\n");

    let verses = unescaped
        .split(PARAGRAPH_BREAK)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .flat_map(|paragraph| paragraph.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    SongText::new(verses)
}
