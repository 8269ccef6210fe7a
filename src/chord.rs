//! # Chord Tokenizer
//!
//! Recognizes inline chord annotations like `[F#m7]`, `[G/B]` or `[C7(9)]`
//! in lyric text.
//!
//! ## Pattern
//! ```text
//! [  A-G  (# | b)?  [+A-Za-z0-9-]*  ( "(" digit ")" )?  ( "/" A-G (# | b)* )?  ]
//!    root accidental  quality          extension            bass
//! ```
//!
//! Anything else in brackets (`[Verse]`, an unclosed `[G`) is not a chord and
//! stays literal text. [`stray_brackets`] reports those spots so the caller
//! can surface them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::key::Note;

static CHORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[A-G][#b]?[+A-Za-z0-9-]*(\([0-9]\))?(/[A-G][#b]*)?\]")
        .expect("chord pattern is a valid regex")
});

/// A chord annotation as it appears in the text, brackets included.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordToken<'a> {
    pub text: &'a str,
    pub root: Note,
    /// Everything between the root and the bass slash, copied verbatim
    pub quality: &'a str,
    pub bass: Option<Note>,
}

impl<'a> ChordToken<'a> {
    /// Parse a bracketed chord such as `"[Am7/G]"`.
    ///
    /// Only the first accidental of a bass note is kept.
    pub fn parse(text: &'a str) -> Option<Self> {
        let inner = text.strip_prefix('[')?.strip_suffix(']')?;
        let (root, rest) = Note::parse_prefix(inner)?;
        let (quality, bass) = match rest.find('/') {
            Some(slash) => {
                let (bass, _) = Note::parse_prefix(&rest[slash + 1..])?;
                (&rest[..slash], Some(bass))
            }
            None => (rest, None),
        };
        Some(Self {
            text,
            root,
            quality,
            bass,
        })
    }

    /// The chord text without brackets.
    pub fn inner(&self) -> &'a str {
        &self.text[1..self.text.len() - 1]
    }
}

/// A piece of a source line: lyric text or a chord (without brackets).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    Lyric(&'a str),
    Chord(&'a str),
}

/// Every chord token in the line, in order, brackets included.
///
/// # Example
/// ```
/// use chordsheet::chord::find_chords;
///
/// assert_eq!(find_chords("I see [D]trees of [F#m]green"), vec!["[D]", "[F#m]"]);
/// assert!(find_chords("no chords [here").is_empty());
/// ```
pub fn find_chords(line: &str) -> Vec<&str> {
    CHORD_PATTERN.find_iter(line).map(|m| m.as_str()).collect()
}

/// Every chord token in the line, parsed.
pub fn tokenize(line: &str) -> Vec<ChordToken<'_>> {
    CHORD_PATTERN
        .find_iter(line)
        .filter_map(|m| ChordToken::parse(m.as_str()))
        .collect()
}

/// The line with every chord token removed.
pub fn strip_chords(line: &str) -> String {
    CHORD_PATTERN.replace_all(line, "").into_owned()
}

/// Rewrite every chord token in the line through `rewrite`.
pub fn replace_chords<F>(line: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    CHORD_PATTERN
        .replace_all(line, |caps: &regex::Captures| rewrite(&caps[0]))
        .into_owned()
}

/// Split a line into lyric and chord segments, in source order.
///
/// Empty lyric runs between adjacent chords are omitted.
///
/// # Example
/// ```
/// use chordsheet::chord::{segments, Segment};
///
/// assert_eq!(
///     segments("la [G]la[C]"),
///     vec![Segment::Lyric("la "), Segment::Chord("G"), Segment::Lyric("la"), Segment::Chord("C")]
/// );
/// ```
pub fn segments(line: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;
    for m in CHORD_PATTERN.find_iter(line) {
        if m.start() > pos {
            out.push(Segment::Lyric(&line[pos..m.start()]));
        }
        out.push(Segment::Chord(&line[m.start() + 1..m.end() - 1]));
        pos = m.end();
    }
    if pos < line.len() {
        out.push(Segment::Lyric(&line[pos..]));
    }
    out
}

/// Positions of `[` characters that do not open a chord.
///
/// Returns `(column, fragment)` pairs: the 1-based character column and the
/// bracketed text up to the next `]` (or the end of the line).
pub fn stray_brackets(line: &str) -> Vec<(usize, String)> {
    let chords: Vec<(usize, usize)> = CHORD_PATTERN
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();

    line.char_indices()
        .enumerate()
        .filter(|(_, (byte, c))| {
            *c == '[' && !chords.iter().any(|(start, end)| byte >= start && byte < end)
        })
        .map(|(column, (byte, _))| {
            let rest = &line[byte..];
            let fragment = match rest.find(']') {
                Some(close) => &rest[..=close],
                None => rest,
            };
            (column + 1, fragment.to_string())
        })
        .collect()
}
