//! # Line Layout Engine
//!
//! Turns one annotated source line into a chord line and a lyric line for
//! monospace display.
//!
//! ## Example
//! ```text
//! source:  I see [C]trees of [Em]green
//!
//! chord:         C        Em
//! text:    I see trees of green
//! ```
//!
//! Each chord starts at the column where its bracket stood once all earlier
//! chord tokens are removed. Two stages do the work: [`segments`] splits the
//! line into lyric and chord pieces, then `Columns` accumulates both output
//! lines and pads them.
//!
//! ## Padding Rules
//! - The chord line is padded with spaces up to the chord's column.
//! - A chord that would touch the previous one gets one forced space. Every
//!   forced space shifts later chord columns one to the right.
//! - When the two lines have different widths at a chord and the character
//!   after the chord is neither a space nor another chord, the shorter line
//!   is padded to the longer one, so the lyric is split to make room.

use serde::Serialize;

use crate::chord::{segments, strip_chords, Segment};

/// Kind of an output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Lyric text (an empty one is a blank row)
    Text,
    /// Chord names aligned over the following text row
    Chord,
    /// Section marker such as `Chorus:` or `Coda:`
    Struct,
}

/// One output row, ready for fixed-width rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedLine {
    pub kind: LineKind,
    pub content: String,
}

impl TypedLine {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Text,
            content: content.into(),
        }
    }

    pub fn chord(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Chord,
            content: content.into(),
        }
    }

    pub fn structure(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Struct,
            content: content.into(),
        }
    }

    pub fn blank() -> Self {
        Self::text("")
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Text && self.content.is_empty()
    }
}

/// Lay out one source line.
///
/// With chords hidden, every chord token is removed and a single text row
/// comes back. With chords shown, a chord row is emitted first when the line
/// has any chords, then the text row. The text row is always present, even
/// empty, so blank lines keep their spacing.
///
/// # Example
/// ```
/// use chordsheet::{layout_line, TypedLine};
///
/// assert_eq!(
///     layout_line("[G]Hello [C]world", true),
///     vec![TypedLine::chord("G     C"), TypedLine::text("Hello world")]
/// );
/// assert_eq!(layout_line("[G]Hello [C]world", false), vec![TypedLine::text("Hello world")]);
/// ```
pub fn layout_line(line: &str, chords_visible: bool) -> Vec<TypedLine> {
    if !chords_visible {
        return vec![TypedLine::text(strip_chords(line))];
    }

    let pieces = segments(line);
    let mut columns = Columns::default();
    for (i, piece) in pieces.iter().enumerate() {
        match *piece {
            Segment::Lyric(text) => columns.push_lyric(text),
            Segment::Chord(name) => {
                let next = match pieces.get(i + 1) {
                    Some(Segment::Lyric(text)) => text.chars().next(),
                    Some(Segment::Chord(_)) => Some('['),
                    None => None,
                };
                columns.push_chord(name, next);
            }
        }
    }
    columns.finish()
}

#[derive(Debug, Default)]
struct Columns {
    text: String,
    chords: String,
    /// Source lyric characters seen so far, before any padding
    lyric_chars: usize,
    /// Spaces forced between touching chords
    forced_spaces: usize,
}

impl Columns {
    fn push_lyric(&mut self, text: &str) {
        self.text.push_str(text);
        self.lyric_chars += text.chars().count();
    }

    fn push_chord(&mut self, name: &str, next: Option<char>) {
        pad_to(&mut self.chords, self.lyric_chars + self.forced_spaces);

        if !self.chords.is_empty() && !self.chords.ends_with(' ') {
            self.chords.push(' ');
            self.forced_spaces += 1;
        }

        let chord_width = width(&self.chords);
        let text_width = width(&self.text);
        if chord_width != text_width && next != Some(' ') && next != Some('[') {
            if text_width < chord_width {
                pad_to(&mut self.text, chord_width);
            } else {
                pad_to(&mut self.chords, text_width);
            }
        }

        self.chords.push_str(name);
    }

    fn finish(self) -> Vec<TypedLine> {
        let mut out = Vec::with_capacity(2);
        if !self.chords.is_empty() {
            out.push(TypedLine::chord(self.chords));
        }
        out.push(TypedLine::text(self.text));
        out
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Right-pad with spaces to `target` characters; never truncates.
fn pad_to(s: &mut String, target: usize) {
    let current = width(s);
    if current < target {
        s.extend(std::iter::repeat(' ').take(target - current));
    }
}
