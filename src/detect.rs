//! Key detection from chord content.
//!
//! The last chord of a song is taken to be its tonic. Songs that modulate or
//! end away from home get the wrong answer; no harmonic analysis is attempted.

use log::{debug, warn};

use crate::chord::{find_chords, ChordToken};
use crate::error::ChordError;
use crate::key::Key;

/// Find the key of a song from its last chord.
///
/// Scans from the last line backwards and keeps only the root, its
/// accidental, and an `m` when the chord is minor. Returns `None` when the
/// song has no chords.
///
/// # Example
/// ```
/// use chordsheet::find_key_in_song;
///
/// let song = ["[G]Some [Em]words", "[C]and an [D7+]end"];
/// assert_eq!(find_key_in_song(&song).unwrap().to_string(), "D");
/// ```
pub fn find_key_in_song<S: AsRef<str>>(lines: &[S]) -> Option<Key> {
    let last = lines
        .iter()
        .rev()
        .find_map(|line| find_chords(line.as_ref()).last().copied())?;

    let token = ChordToken::parse(last)?;
    let first = token.inner().chars().next()?;
    if first.to_ascii_uppercase() > 'G' {
        warn!("Invalid chord notation: {}", token.inner());
        return None;
    }

    let minor = is_minor_quality(token.quality);
    let key = Key::new(token.root, minor);
    debug!("Detected key {} from last chord {}", key, last);
    Some(key)
}

/// Like [`find_key_in_song`], but reports a chordless song as an error.
pub fn detect_source_key<S: AsRef<str>>(lines: &[S]) -> Result<Key, ChordError> {
    find_key_in_song(lines).ok_or(ChordError::NoChordsFound)
}

/// `m7`, `min`, `m` are minor; `maj7` and `M7` are not.
fn is_minor_quality(quality: &str) -> bool {
    quality.starts_with('m') && !quality.starts_with("maj")
}
