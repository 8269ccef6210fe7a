pub mod api;
pub mod chord;
pub mod detect;
pub mod error;
pub mod format;
pub mod key;
pub mod layout;
pub mod options;
pub mod song;
pub mod transpose;

pub use api::{render, render_with_options, FormattedSong, RenderRequest};
pub use detect::{detect_source_key, find_key_in_song};
pub use error::*;
pub use format::format_body;
pub use key::{Key, KeySignature, Side, SELECTABLE_KEYS};
pub use layout::{layout_line, LineKind, TypedLine};
pub use options::FormatOptions;
pub use song::Song;
pub use transpose::{transpose, ChordRewriteMap, Transposer};

/// Render raw song text in `target_key` (or its own key when `None`).
/// This is the main entry point for the library.
pub fn render_text(text: &str, target_key: Option<&str>, chords_visible: bool) -> FormattedSong {
    let song = Song::parse(text);
    let mut request = RenderRequest::from_song(&song);
    request.target_key = target_key.map(str::to_string);
    request.chords_visible = chords_visible;
    render(&request)
}
