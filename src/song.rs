//! Song text with its header.
//!
//! ```text
//! What A Day            <- title
//! J. Doe, R. Roe        <- authors
//! key: D                <- optional
//!
//! [D]Body starts [G]here
//! ```

use log::warn;

use crate::key::Key;

const KEY_HEADER: &str = "key:";

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub title: String,
    pub authors: String,
    /// Key declared in the header, if any
    pub key: Option<Key>,
    /// Every raw line, header included
    pub lines: Vec<String>,
    /// Number of leading lines that make up the header
    pub skip: usize,
}

impl Song {
    /// Split raw song text into header fields and lines.
    ///
    /// Blank lines before the title are part of the header. A `key:` line
    /// that does not name a key is logged and ignored.
    ///
    /// # Example
    /// ```
    /// use chordsheet::Song;
    ///
    /// let song = Song::parse("\nMy Song\nMe\nkey: Am\n\n[Am]la");
    /// assert_eq!(song.title, "My Song");
    /// assert_eq!(song.key.unwrap().to_string(), "Am");
    /// assert_eq!(song.skip, 4);
    /// ```
    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        let mut idx = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .unwrap_or(lines.len());

        let next_line = |idx: &mut usize| -> String {
            let line = lines.get(*idx).map(|l| l.trim().to_string()).unwrap_or_default();
            *idx = (*idx + 1).min(lines.len());
            line
        };
        let title = next_line(&mut idx);
        let authors = next_line(&mut idx);

        let mut key = None;
        if let Some(value) = lines.get(idx).and_then(|line| key_header_value(line)) {
            match value.parse::<Key>() {
                Ok(k) => key = Some(k),
                Err(e) => warn!("Ignoring key header in '{}': {}", title, e),
            }
            idx += 1;
        }

        Self {
            title,
            authors,
            key,
            lines,
            skip: idx,
        }
    }

    /// The lines after the header.
    pub fn body(&self) -> &[String] {
        &self.lines[self.skip..]
    }
}

/// The value of a `key: X` header line, matched case-insensitively.
fn key_header_value(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let prefix = trimmed.get(..KEY_HEADER.len())?;
    if prefix.eq_ignore_ascii_case(KEY_HEADER) {
        trimmed.get(KEY_HEADER.len()..).map(str::trim)
    } else {
        None
    }
}
