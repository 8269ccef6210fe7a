//! # Structural Formatter
//!
//! Walks the body of a song once, classifies each line and hands lyric lines
//! to the layout engine.
//!
//! ## Line Classes
//! - **Blank** (empty; a line of spaces is lyric text): laid out as-is.
//!   Closes a chorus that was opened by a literal `Chorus:` line.
//! - **Comment** (`#` first): dropped.
//! - **Chorus start** (`{soc}` or `chorus:`): emits an indented `Chorus:`
//!   struct row, preceded by a blank row when the last row was not blank.
//! - **Chorus end** (`{eoc}`): emits nothing, but a blank row follows when the
//!   next source line has text.
//! - **Coda** (`coda...`): emits a `Coda:` struct row.
//! - **Lyric**: indented while inside a chorus, then laid out.
//!
//! Chords are expected to be transposed already; see [`crate::render`].

use crate::layout::{layout_line, TypedLine};
use crate::options::FormatOptions;

const MANUAL_CHORUS_MARKER: &str = "chorus:";
const CODA_MARKER: &str = "coda";

/// Format the body of a song.
///
/// The first `skip` lines (title, authors, key header) and the blank lines
/// right after them are discarded.
///
/// # Example
/// ```
/// use chordsheet::{format_body, FormatOptions, TypedLine};
///
/// let song = ["Title", "Author", "", "Chorus:", "[G]la la", "", "verse"];
/// let out = format_body(&song, 2, false, &FormatOptions::default());
/// assert_eq!(
///     out,
///     vec![
///         TypedLine::structure("     Chorus:"),
///         TypedLine::text("     la la"),
///         TypedLine::blank(),
///         TypedLine::text("verse"),
///     ]
/// );
/// ```
pub fn format_body<S: AsRef<str>>(
    lines: &[S],
    skip: usize,
    chords_visible: bool,
    options: &FormatOptions,
) -> Vec<TypedLine> {
    let body: Vec<&str> = lines
        .iter()
        .map(AsRef::as_ref)
        .skip(skip)
        .skip_while(|line| is_blank(line))
        .collect();

    let mut formatter = Formatter::new(options, chords_visible);
    for (i, line) in body.iter().enumerate() {
        formatter.line(line, body.get(i + 1).copied());
    }
    formatter.finish()
}

/// Only an empty line is blank; a line of spaces is lyric text.
fn is_blank(line: &str) -> bool {
    line.is_empty()
}

struct Formatter<'o> {
    options: &'o FormatOptions,
    chords_visible: bool,
    in_chorus: bool,
    /// Chorus opened by a literal `Chorus:` line rather than a marker
    manual_chorus: bool,
    out: Vec<TypedLine>,
}

impl<'o> Formatter<'o> {
    fn new(options: &'o FormatOptions, chords_visible: bool) -> Self {
        Self {
            options,
            chords_visible,
            in_chorus: false,
            manual_chorus: false,
            out: Vec::new(),
        }
    }

    fn line(&mut self, line: &str, next: Option<&str>) {
        if is_blank(line) {
            self.emit(line);
            if self.manual_chorus {
                self.in_chorus = false;
                self.manual_chorus = false;
            }
            return;
        }

        if line.starts_with('#') {
            return;
        }

        let lowered = line.to_lowercase();
        let manual = lowered.starts_with(MANUAL_CHORUS_MARKER);
        if manual || self.options.opens_chorus(&lowered) {
            self.in_chorus = true;
            if manual {
                self.manual_chorus = true;
            }
            if self.out.last().is_some_and(|last| !last.is_blank()) {
                self.out.push(TypedLine::blank());
            }
            self.out.push(TypedLine::structure(format!(
                "{}{}",
                self.options.indent, self.options.chorus_label
            )));
            return;
        }

        if self.options.closes_chorus(&lowered) {
            self.in_chorus = false;
            if next.is_some_and(|n| !is_blank(n)) {
                self.out.push(TypedLine::blank());
            }
            return;
        }

        if lowered.starts_with(CODA_MARKER) {
            self.out.push(TypedLine::structure(self.options.coda_label.clone()));
            return;
        }

        if self.in_chorus {
            let indented = format!("{}{}", self.options.indent, line);
            self.emit(&indented);
        } else {
            self.emit(line);
        }
    }

    fn emit(&mut self, line: &str) {
        self.out.extend(layout_line(line, self.chords_visible));
    }

    fn finish(self) -> Vec<TypedLine> {
        self.out
    }
}
