use std::collections::BTreeMap;

use log::{debug, warn};

use crate::chord::{replace_chords, tokenize, ChordToken};
use crate::detect::find_key_in_song;
use crate::error::ChordError;
use crate::key::{Key, KeySignature, Note};

/// Original chord text to transposed chord text, brackets included.
///
/// Built once per transposition pass and applied to every occurrence of a
/// token regardless of where it appears. An empty map is the identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordRewriteMap {
    rewrites: BTreeMap<String, String>,
}

impl ChordRewriteMap {
    pub fn identity() -> Self {
        Self::default()
    }

    /// True when applying the map changes nothing.
    pub fn is_identity(&self) -> bool {
        self.rewrites.iter().all(|(from, to)| from == to)
    }

    pub fn get(&self, chord: &str) -> Option<&str> {
        self.rewrites.get(chord).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }

    /// Rewrite the chords of one line. Chords missing from the map are kept.
    pub fn apply(&self, line: &str) -> String {
        if self.rewrites.is_empty() {
            return line.to_string();
        }
        replace_chords(line, |chord| self.get(chord).unwrap_or(chord).to_string())
    }

    /// Rewrite every line into a new vector.
    pub fn apply_all<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines.iter().map(|line| self.apply(line.as_ref())).collect()
    }
}

/// Transposition from a source key towards a target key
#[derive(Debug, Clone)]
pub struct Transposer {
    realized: Key,
    delta: u8,
    signature: KeySignature,
    warning: Option<ChordError>,
}

impl Transposer {
    /// Set up a transposition.
    ///
    /// The target is realized first (mode copied from `from`, awkward
    /// spellings swapped). If the realized key is not on the circle of fifths,
    /// chords are spelled with the natural convention and the resolution
    /// error is kept as a warning.
    pub fn new(from: Key, target: &Key) -> Self {
        let delta = (target.tonic.pitch_class() + 12 - from.tonic.pitch_class()) % 12;
        let realized = Key::realize(&from, target);
        let (signature, warning) = match realized.signature() {
            Ok(signature) => (signature, None),
            Err(e) => {
                warn!("{}; spelling chords as in C", e);
                (KeySignature::NATURAL, Some(e))
            }
        };
        debug!(
            "Transposing {} -> {} (realized {}, +{} semitones, accidentals '{}')",
            from,
            target,
            realized,
            delta,
            signature.accidental_letters()
        );
        Self {
            realized,
            delta,
            signature,
            warning,
        }
    }

    pub fn realized_key(&self) -> Key {
        self.realized
    }

    /// Semitones up, in `0..12`
    pub fn delta(&self) -> u8 {
        self.delta
    }

    pub fn signature(&self) -> KeySignature {
        self.signature
    }

    pub fn warning(&self) -> Option<&ChordError> {
        self.warning.as_ref()
    }

    pub fn transpose_note(&self, note: Note) -> Note {
        Note::spell((note.pitch_class() + self.delta) % 12, &self.signature)
    }

    /// Transpose one chord token. Root and bass move; the quality is copied.
    ///
    /// # Example
    /// ```
    /// use chordsheet::chord::ChordToken;
    /// use chordsheet::{Key, Transposer};
    ///
    /// let from: Key = "D".parse().unwrap();
    /// let to: Key = "C".parse().unwrap();
    /// let t = Transposer::new(from, &to);
    ///
    /// let chord = ChordToken::parse("[F#m7/C#]").unwrap();
    /// assert_eq!(t.transpose_chord(&chord), "[Em7/B]");
    /// ```
    pub fn transpose_chord(&self, chord: &ChordToken) -> String {
        if self.delta == 0 {
            return chord.text.to_string();
        }
        let root = self.transpose_note(chord.root);
        match chord.bass {
            Some(bass) => format!("[{}{}/{}]", root, chord.quality, self.transpose_note(bass)),
            None => format!("[{}{}]", root, chord.quality),
        }
    }

    /// Rewrite map for every distinct chord in the song.
    pub fn rewrite_map<S: AsRef<str>>(&self, lines: &[S]) -> ChordRewriteMap {
        if self.delta == 0 {
            return ChordRewriteMap::identity();
        }

        let mut rewrites = BTreeMap::new();
        for line in lines {
            for chord in tokenize(line.as_ref()) {
                if !rewrites.contains_key(chord.text) {
                    rewrites.insert(chord.text.to_string(), self.transpose_chord(&chord));
                }
            }
        }
        debug!("Rewrote {} distinct chords", rewrites.len());
        ChordRewriteMap { rewrites }
    }
}

/// Build the rewrite map that moves a song into `target`.
///
/// The source key is detected from the last chord. Returns `None` when the
/// song has no chords, and the identity map when the song is already in the
/// target key.
///
/// # Example
/// ```
/// use chordsheet::{transpose, Key};
///
/// let song = ["I see [D]trees of [F#m]green", "[D]"];
/// let map = transpose(&song, &"C".parse::<Key>().unwrap()).unwrap();
/// assert_eq!(map.get("[D]"), Some("[C]"));
/// assert_eq!(map.get("[F#m]"), Some("[Em]"));
/// ```
pub fn transpose<S: AsRef<str>>(lines: &[S], target: &Key) -> Option<ChordRewriteMap> {
    let Some(from) = find_key_in_song(lines) else {
        debug!("Song has no chords");
        return None;
    };
    Some(Transposer::new(from, target).rewrite_map(lines))
}
