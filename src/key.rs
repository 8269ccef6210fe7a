//! # Key Model
//!
//! Pitch-class arithmetic and the circle-of-fifths tables used to spell
//! transposed chords.
//!
//! ## Reference Table
//! Letters are ordered from A, each with a fixed chromatic offset:
//!
//! ```text
//! A=0  B=2  C=3  D=5  E=7  F=8  G=10
//! ```
//!
//! `#` adds one semitone and `b` subtracts one. All arithmetic is modulo 12,
//! so `Ab` is pitch class 11 and `Cb` is pitch class 2.
//!
//! ## Key Signatures
//! Every key resolves to a [`KeySignature`]: a [`Side`] (sharp, flat or
//! natural) and a count of accidentals in `0..=7`. The count selects a prefix
//! of the order in which accidentals are added: `FCGDAEB` for sharps,
//! `BEADGCF` for flats. C and Am are the only natural keys.
//!
//! ## Realized Keys
//! Transposing into some tonics gives a key nobody writes in (G# major,
//! Cb major, E#m, ...). [`Key::realize`] swaps those for their enharmonic
//! equivalent through a fixed table before the signature is looked up.

use std::fmt;
use std::str::FromStr;

use crate::error::ChordError;

/// Natural note names A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// All letters in reference order, starting from A.
    pub const ALL: [Letter; 7] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
    ];

    pub fn from_char(c: char) -> Option<Letter> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
        }
    }

    /// Chromatic offset from A
    pub fn offset(self) -> u8 {
        match self {
            Letter::A => 0,
            Letter::B => 2,
            Letter::C => 3,
            Letter::D => 5,
            Letter::E => 7,
            Letter::F => 8,
            Letter::G => 10,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The next letter up, wrapping G to A.
    pub fn next(self) -> Letter {
        Letter::ALL[(self.index() + 1) % 7]
    }

    /// The next letter down, wrapping A to G.
    pub fn prev(self) -> Letter {
        Letter::ALL[(self.index() + 6) % 7]
    }
}

/// Accidental attached to a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp, // #
    Flat,  // b
}

impl Accidental {
    pub fn from_char(c: char) -> Option<Accidental> {
        match c {
            '#' => Some(Accidental::Sharp),
            'b' => Some(Accidental::Flat),
            _ => None,
        }
    }

    /// Semitone shift applied to the letter
    pub fn shift(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// A spelled note: letter plus at most one accidental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl Note {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    /// Pitch class in `0..12`, counted from A.
    pub fn pitch_class(self) -> u8 {
        (self.letter.offset() as i8 + self.accidental.shift()).rem_euclid(12) as u8
    }

    /// Parse a leading note name (`A`-`G` plus an optional `#`/`b`).
    ///
    /// Returns the note and whatever follows it.
    ///
    /// # Example
    /// ```
    /// use chordsheet::key::{Accidental, Letter, Note};
    ///
    /// let (note, rest) = Note::parse_prefix("F#m7").unwrap();
    /// assert_eq!(note, Note::new(Letter::F, Accidental::Sharp));
    /// assert_eq!(rest, "m7");
    /// ```
    pub fn parse_prefix(s: &str) -> Option<(Note, &str)> {
        let letter = Letter::from_char(s.chars().next()?)?;
        let rest = &s[1..];
        match rest.chars().next().and_then(Accidental::from_char) {
            Some(accidental) => Some((Note::new(letter, accidental), &rest[1..])),
            None => Some((Note::natural(letter), rest)),
        }
    }

    /// Spell a pitch class as a note name inside the given key signature.
    ///
    /// A pitch class that lands on a natural letter is always spelled with
    /// that bare letter. In-between tones take the accidental of the key's
    /// side when the neighbouring letter carries one in the signature, and
    /// the opposite accidental otherwise. Natural keys prefer flats, except
    /// for pitch classes 4 and 9 (C# and F#).
    ///
    /// # Examples
    /// ```
    /// use chordsheet::key::{Key, Note};
    ///
    /// let d_major = "D".parse::<Key>().unwrap().signature().unwrap();
    /// assert_eq!(Note::spell(9, &d_major).to_string(), "F#");
    ///
    /// let f_major = "F".parse::<Key>().unwrap().signature().unwrap();
    /// assert_eq!(Note::spell(1, &f_major).to_string(), "Bb");
    /// ```
    pub fn spell(pitch_class: u8, signature: &KeySignature) -> Note {
        let pitch_class = pitch_class % 12;

        // The only tone above G
        if pitch_class == 11 {
            return match signature.side {
                Side::Sharp => Note::new(Letter::G, Accidental::Sharp),
                Side::Flat | Side::Natural => Note::new(Letter::A, Accidental::Flat),
            };
        }

        let upper_idx = Letter::ALL
            .iter()
            .position(|l| l.offset() >= pitch_class)
            .unwrap_or(Letter::ALL.len() - 1);
        let upper = Letter::ALL[upper_idx];
        if upper.offset() == pitch_class {
            return Note::natural(upper);
        }
        // pitch class 0 is A, so a missing letter always has one below it
        let lower = Letter::ALL[upper_idx - 1];

        match signature.side {
            Side::Sharp => {
                if signature.has_accidental(lower) {
                    Note::new(lower, Accidental::Sharp)
                } else {
                    Note::new(upper, Accidental::Flat)
                }
            }
            Side::Flat => {
                if signature.has_accidental(upper) {
                    Note::new(upper, Accidental::Flat)
                } else {
                    Note::new(lower, Accidental::Sharp)
                }
            }
            Side::Natural => {
                if pitch_class == 4 || pitch_class == 9 {
                    Note::new(lower, Accidental::Sharp)
                } else {
                    Note::new(upper, Accidental::Flat)
                }
            }
        }
    }

    /// One semitone up, spelled the way the key selector does it.
    fn step_up(self) -> Note {
        match self.accidental {
            Accidental::Natural => match self.letter {
                Letter::E => Note::natural(Letter::F),
                Letter::B => Note::natural(Letter::C),
                letter => Note::new(letter, Accidental::Sharp),
            },
            Accidental::Sharp => Note::natural(self.letter.next()),
            Accidental::Flat => Note::natural(self.letter),
        }
    }

    /// One semitone down, spelled the way the key selector does it.
    fn step_down(self) -> Note {
        match self.accidental {
            Accidental::Natural => match self.letter {
                Letter::F => Note::natural(Letter::E),
                Letter::C => Note::natural(Letter::B),
                letter => Note::new(letter, Accidental::Flat),
            },
            Accidental::Flat => Note::natural(self.letter.prev()),
            Accidental::Sharp => Note::natural(self.letter),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

/// Which accidental family a key's diatonic scale uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Natural,
    Sharp,
    Flat,
}

const SHARP_ORDER: &str = "FCGDAEB";
const FLAT_ORDER: &str = "BEADGCF";

/// Side of the circle of fifths plus the number of accidentals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignature {
    pub side: Side,
    pub accidentals: u8,
}

impl KeySignature {
    /// C major / A minor
    pub const NATURAL: KeySignature = KeySignature {
        side: Side::Natural,
        accidentals: 0,
    };

    /// Letters carrying an accidental, in the order they are added.
    ///
    /// # Example
    /// ```
    /// use chordsheet::key::{KeySignature, Side};
    ///
    /// let e_flat = KeySignature { side: Side::Flat, accidentals: 3 };
    /// assert_eq!(e_flat.accidental_letters(), "BEA");
    /// ```
    pub fn accidental_letters(&self) -> &'static str {
        let count = usize::from(self.accidentals.min(7));
        match self.side {
            Side::Sharp => &SHARP_ORDER[..count],
            Side::Flat => &FLAT_ORDER[..count],
            Side::Natural => "",
        }
    }

    pub fn has_accidental(&self, letter: Letter) -> bool {
        self.accidental_letters().contains(letter.as_char())
    }
}

/// A key: tonic note plus major/minor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub tonic: Note,
    pub minor: bool,
}

const fn major(letter: Letter, accidental: Accidental) -> Key {
    Key {
        tonic: Note::new(letter, accidental),
        minor: false,
    }
}

const fn minor(letter: Letter, accidental: Accidental) -> Key {
    Key {
        tonic: Note::new(letter, accidental),
        minor: true,
    }
}

use Accidental::{Flat, Natural, Sharp};
use Letter::{A, B, C, D, E, F, G};

const SHARP_MAJOR_KEYS: [Key; 7] = [
    major(G, Natural),
    major(D, Natural),
    major(A, Natural),
    major(E, Natural),
    major(B, Natural),
    major(F, Sharp),
    major(C, Sharp),
];

const SHARP_MINOR_KEYS: [Key; 7] = [
    minor(E, Natural),
    minor(B, Natural),
    minor(F, Sharp),
    minor(C, Sharp),
    minor(G, Sharp),
    minor(D, Sharp),
    minor(A, Sharp),
];

const FLAT_MAJOR_KEYS: [Key; 7] = [
    major(F, Natural),
    major(B, Flat),
    major(E, Flat),
    major(A, Flat),
    major(D, Flat),
    major(G, Flat),
    major(C, Flat),
];

const FLAT_MINOR_KEYS: [Key; 7] = [
    minor(D, Natural),
    minor(G, Natural),
    minor(C, Natural),
    minor(F, Natural),
    minor(B, Flat),
    minor(E, Flat),
    minor(A, Flat),
];

/// Awkward transposition targets and the key actually written instead.
const ENHARMONIC_RESPELLINGS: [(Key, Key); 10] = [
    (major(G, Sharp), major(A, Flat)),
    (major(D, Sharp), major(E, Flat)),
    (major(A, Sharp), major(B, Flat)),
    (major(C, Flat), major(B, Natural)),
    (major(F, Flat), major(E, Natural)),
    (minor(E, Sharp), minor(F, Natural)),
    (minor(B, Sharp), minor(C, Natural)),
    (minor(D, Flat), minor(C, Sharp)),
    (minor(G, Flat), minor(F, Sharp)),
    (minor(C, Flat), minor(B, Natural)),
];

/// Tonics offered to a user picking a target key.
pub const SELECTABLE_KEYS: [&str; 17] = [
    "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb", "B",
];

impl Key {
    pub fn new(tonic: Note, minor: bool) -> Self {
        Self { tonic, minor }
    }

    /// The key name without the minor suffix.
    pub fn tonic_name(&self) -> String {
        self.tonic.to_string()
    }

    /// Resolve this key to its side and accidental count.
    ///
    /// Returns [`ChordError::KeyResolution`] for keys outside the circle of
    /// fifths tables (e.g. `E#`, `Fbm`).
    pub fn signature(&self) -> Result<KeySignature, ChordError> {
        if *self == major(C, Natural) || *self == minor(A, Natural) {
            return Ok(KeySignature::NATURAL);
        }

        let (sharp_table, flat_table) = if self.minor {
            (&SHARP_MINOR_KEYS, &FLAT_MINOR_KEYS)
        } else {
            (&SHARP_MAJOR_KEYS, &FLAT_MAJOR_KEYS)
        };

        if let Some(idx) = sharp_table.iter().position(|k| k == self) {
            return Ok(KeySignature {
                side: Side::Sharp,
                accidentals: idx as u8 + 1,
            });
        }
        if let Some(idx) = flat_table.iter().position(|k| k == self) {
            return Ok(KeySignature {
                side: Side::Flat,
                accidentals: idx as u8 + 1,
            });
        }
        Err(ChordError::KeyResolution(self.to_string()))
    }

    /// The key a transposition from `from` towards `target` is written in.
    ///
    /// The mode comes from `from`; awkward spellings of the target tonic are
    /// swapped for their enharmonic equivalent.
    ///
    /// # Example
    /// ```
    /// use chordsheet::Key;
    ///
    /// let from: Key = "Em".parse().unwrap();
    /// let target: Key = "Db".parse().unwrap();
    /// assert_eq!(Key::realize(&from, &target).to_string(), "C#m");
    /// ```
    pub fn realize(from: &Key, target: &Key) -> Key {
        let candidate = Key::new(target.tonic, from.minor);
        ENHARMONIC_RESPELLINGS
            .iter()
            .find(|(awkward, _)| *awkward == candidate)
            .map(|(_, written)| *written)
            .unwrap_or(candidate)
    }

    /// The key one semitone up, keeping the mode.
    pub fn step_up(&self) -> Key {
        Key::new(self.tonic.step_up(), self.minor)
    }

    /// The key one semitone down, keeping the mode.
    pub fn step_down(&self) -> Key {
        Key::new(self.tonic.step_down(), self.minor)
    }
}

impl FromStr for Key {
    type Err = ChordError;

    /// Parse a key name like `"G"`, `"Bb"` or `"F#m"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (tonic, rest) = Note::parse_prefix(trimmed)
            .ok_or_else(|| ChordError::KeyResolution(trimmed.to_string()))?;
        match rest {
            "" => Ok(Key::new(tonic, false)),
            "m" => Ok(Key::new(tonic, true)),
            _ => Err(ChordError::KeyResolution(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tonic, if self.minor { "m" } else { "" })
    }
}
