//! # Public API
//!
//! The render entry points. A render is a pure function of the request: the
//! raw lines are never modified, no state survives between calls, and the
//! same request always gives the same rows.
//!
//! ## Pipeline
//! 1. Resolve the source key (explicit `source_key`, else the last chord)
//! 2. When chords are shown and a target key is set, build one rewrite map
//!    for the whole song and apply it to every line
//! 3. Run the structural formatter over the body
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordsheet::{render, LineKind, RenderRequest, Song};
//!
//! let song = Song::parse("My Song\nMe\n\nI see [D]trees of [F#m]green\n[D]");
//! let mut request = RenderRequest::from_song(&song);
//! request.target_key = Some("C".to_string());
//!
//! let out = render(&request);
//! assert_eq!(out.lines[0].kind, LineKind::Chord);
//! assert_eq!(out.lines[0].content, "      C        Em");
//! assert_eq!(out.lines[1].content, "I see trees of green");
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::chord::stray_brackets;
use crate::detect::find_key_in_song;
use crate::error::ChordError;
use crate::format::format_body;
use crate::key::Key;
use crate::layout::TypedLine;
use crate::options::FormatOptions;
use crate::song::Song;
use crate::transpose::Transposer;

/// Everything a render needs.
///
/// Deserializes from `{ "rawLines": [...], "skip": 2, "targetKey": "G",
/// "chordsVisible": true }`; missing fields take their defaults.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderRequest {
    /// Every line of the song, header included
    pub raw_lines: Vec<String>,
    /// Leading header lines to drop before the body
    pub skip: usize,
    /// Key to transpose into; `None` or empty keeps the song as written
    pub target_key: Option<String>,
    /// Key the song is written in; detected from the chords when absent
    pub source_key: Option<String>,
    pub chords_visible: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            raw_lines: Vec::new(),
            skip: 0,
            target_key: None,
            source_key: None,
            chords_visible: true,
        }
    }
}

impl RenderRequest {
    /// A request for a parsed song, in its own key with chords shown.
    pub fn from_song(song: &Song) -> Self {
        Self {
            raw_lines: song.lines.clone(),
            skip: song.skip,
            source_key: song.key.map(|k| k.to_string()),
            ..Self::default()
        }
    }
}

/// Result of a render
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSong {
    pub lines: Vec<TypedLine>,
    /// Key the song was read in (declared or detected)
    #[serde(serialize_with = "serialize_key")]
    pub source_key: Option<Key>,
    /// Key the chords were written in after transposing
    #[serde(serialize_with = "serialize_key")]
    pub realized_key: Option<Key>,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<ChordError>,
}

fn serialize_key<S: serde::Serializer>(key: &Option<Key>, s: S) -> Result<S::Ok, S::Error> {
    match key {
        Some(k) => s.serialize_some(&k.to_string()),
        None => s.serialize_none(),
    }
}

fn serialize_warnings<S: serde::Serializer>(warnings: &[ChordError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(warnings.iter().map(ToString::to_string))
}

/// Render a song with the default options.
pub fn render(request: &RenderRequest) -> FormattedSong {
    render_with_options(request, &FormatOptions::default())
}

/// Render a song.
///
/// Never fails: an unknown key, a song without chords, or bracketed text
/// that is not a chord is reported in [`FormattedSong::warnings`] and the
/// song is rendered as well as it can be.
pub fn render_with_options(request: &RenderRequest, options: &FormatOptions) -> FormattedSong {
    let mut warnings = Vec::new();
    let source_key = resolve_source_key(request, &mut warnings);

    let mut realized_key = None;
    let mut transposed = None;
    if request.chords_visible {
        if let Some(target) = parse_optional_key(request.target_key.as_deref(), &mut warnings) {
            match source_key {
                Some(from) => {
                    let transposer = Transposer::new(from, &target);
                    if let Some(w) = transposer.warning() {
                        warnings.push(w.clone());
                    }
                    realized_key = Some(transposer.realized_key());
                    let rewrites = transposer.rewrite_map(&request.raw_lines);
                    transposed = Some(rewrites.apply_all(&request.raw_lines));
                }
                None => warnings.push(ChordError::NoChordsFound),
            }
        }
    }

    warnings.extend(malformed_chords(&request.raw_lines, request.skip));

    let lines = format_body(
        transposed.as_deref().unwrap_or(request.raw_lines.as_slice()),
        request.skip,
        request.chords_visible,
        options,
    );

    FormattedSong {
        lines,
        source_key,
        realized_key,
        warnings,
    }
}

fn resolve_source_key(request: &RenderRequest, warnings: &mut Vec<ChordError>) -> Option<Key> {
    parse_optional_key(request.source_key.as_deref(), warnings)
        .or_else(|| find_key_in_song(&request.raw_lines))
}

/// Empty strings count as "not set"; bad keys become warnings.
fn parse_optional_key(name: Option<&str>, warnings: &mut Vec<ChordError>) -> Option<Key> {
    let name = name.map(str::trim).filter(|n| !n.is_empty())?;
    match name.parse::<Key>() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("{}", e);
            warnings.push(e);
            None
        }
    }
}

/// Bracketed text in the body that is not a chord.
fn malformed_chords(lines: &[String], skip: usize) -> Vec<ChordError> {
    lines
        .iter()
        .enumerate()
        .skip(skip)
        .filter(|(_, line)| !line.starts_with('#'))
        .flat_map(|(idx, line)| {
            stray_brackets(line)
                .into_iter()
                .map(move |(column, fragment)| {
                    warn!("Not a chord at line {}, column {}: {}", idx + 1, column, fragment);
                    ChordError::MalformedChordToken {
                        line: idx + 1,
                        column,
                        fragment,
                    }
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LineKind;

    fn request(lines: &[&str]) -> RenderRequest {
        RenderRequest {
            raw_lines: lines.iter().map(|l| l.to_string()).collect(),
            ..RenderRequest::default()
        }
    }

    #[test]
    fn test_no_target_keeps_chords() {
        let out = render(&request(&["[G]la [C]la"]));
        assert_eq!(out.lines[0], TypedLine::chord("G  C"));
        assert_eq!(out.source_key.unwrap().to_string(), "C");
        assert_eq!(out.realized_key, None);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_declared_source_key_wins() {
        let mut req = request(&["[G]la [C]la"]);
        req.source_key = Some("G".to_string());
        req.target_key = Some("A".to_string());
        let out = render(&req);
        assert_eq!(out.lines[0], TypedLine::chord("A  D"));
        assert_eq!(out.realized_key.unwrap().to_string(), "A");
    }

    #[test]
    fn test_bad_target_key_is_a_warning() {
        let mut req = request(&["[G]la"]);
        req.target_key = Some("X".to_string());
        let out = render(&req);
        assert_eq!(out.lines[0], TypedLine::chord("G"));
        assert_eq!(out.warnings, vec![ChordError::KeyResolution("X".to_string())]);
    }

    #[test]
    fn test_empty_target_key_is_ignored() {
        let mut req = request(&["[G]la"]);
        req.target_key = Some(String::new());
        assert!(render(&req).warnings.is_empty());
    }

    #[test]
    fn test_no_chords_with_target() {
        let mut req = request(&["la la"]);
        req.target_key = Some("D".to_string());
        let out = render(&req);
        assert_eq!(out.lines, vec![TypedLine::text("la la")]);
        assert_eq!(out.warnings, vec![ChordError::NoChordsFound]);
    }

    #[test]
    fn test_hidden_chords_skip_transposition() {
        let mut req = request(&["[G]la"]);
        req.chords_visible = false;
        req.target_key = Some("A".to_string());
        let out = render(&req);
        assert_eq!(out.lines, vec![TypedLine::text("la")]);
        assert_eq!(out.realized_key, None);
    }

    #[test]
    fn test_malformed_chord_warning() {
        let out = render(&request(&["Title", "[Verse] [G]go", "# [not checked]"]));
        assert_eq!(
            out.warnings,
            vec![ChordError::MalformedChordToken {
                line: 2,
                column: 1,
                fragment: "[Verse]".to_string(),
            }]
        );
        assert_eq!(out.lines[1].kind, LineKind::Chord);
        assert_eq!(out.lines[2], TypedLine::text("[Verse] go"));
    }

    #[test]
    fn test_request_from_json() {
        let req: RenderRequest = serde_json::from_str(
            r#"{"rawLines": ["T", "A", "[C]x"], "skip": 2, "targetKey": "D", "chordsVisible": true}"#,
        )
        .unwrap();
        let out = render(&req);
        assert_eq!(out.lines, vec![TypedLine::chord("D"), TypedLine::text("x")]);
    }

    #[test]
    fn test_output_json() {
        let out = render(&request(&["[Am]x"]));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["sourceKey"], "Am");
        assert_eq!(json["lines"][0]["kind"], "chord");
        assert!(json["realizedKey"].is_null());
    }
}
