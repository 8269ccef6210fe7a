//! # Error Types
//!
//! This module defines all error types for the chordsheet engine.
//!
//! None of these are fatal to a render. The pipeline collects them as warnings
//! on [`FormattedSong`](crate::FormattedSong) and keeps going, degrading to
//! untransposed or unaligned text in the worst case. Only caller-supplied
//! values (a key string, an options document) are rejected with `Err`.
//!
//! ## Error Types
//! - `KeyResolution` - A key name that is not on the circle of fifths
//! - `NoChordsFound` - The song has no chord annotations, so transposing is a no-op
//! - `MalformedChordToken` - Bracketed text that is not a chord, left as literal lyric text
//! - `Config` - Invalid YAML render options
//!
//! ## Usage
//! ```rust
//! use chordsheet::{ChordError, Key};
//!
//! match "H#".parse::<Key>() {
//!     Ok(key) => println!("Key: {}", key),
//!     Err(ChordError::KeyResolution(name)) => eprintln!("No such key: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// Unrecognized key name.
    ///
    /// The caller treats this as "no transposition possible" and spells with
    /// the natural (C / Am) convention instead.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordError;
    /// let err = ChordError::KeyResolution("E#".to_string());
    /// assert_eq!(err.to_string(), "Unrecognized key: E#");
    /// ```
    #[error("Unrecognized key: {0}")]
    KeyResolution(String),

    /// The song carries no chord annotations at all.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordError;
    /// assert_eq!(ChordError::NoChordsFound.to_string(), "Song has no chord annotations");
    /// ```
    #[error("Song has no chord annotations")]
    NoChordsFound,

    /// A `[` that does not open a recognizable chord.
    ///
    /// Line and column are 1-based; the column counts characters, not bytes.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordError;
    /// let err = ChordError::MalformedChordToken {
    ///     line: 4,
    ///     column: 7,
    ///     fragment: "[Verse]".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed chord at line 4, column 7: [Verse]");
    /// ```
    #[error("Malformed chord at line {line}, column {column}: {fragment}")]
    MalformedChordToken {
        line: usize,
        column: usize,
        fragment: String,
    },

    /// Invalid render options.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordError;
    /// let err = ChordError::Config("indent: invalid type".to_string());
    /// assert_eq!(err.to_string(), "Invalid options: indent: invalid type");
    /// ```
    #[error("Invalid options: {0}")]
    Config(String),
}
