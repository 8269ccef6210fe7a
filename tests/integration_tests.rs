//! Integration tests for chordsheet
//!
//! Tests the full render pipeline from raw song text to typed output rows.

use std::io::Write;

use chordsheet::chord::find_chords;
use chordsheet::{
    find_key_in_song, render, render_text, render_with_options, transpose, FormatOptions, Key,
    LineKind, RenderRequest, Song, TypedLine, SELECTABLE_KEYS,
};

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn transposed(song: &[String], target: &str) -> Vec<String> {
    let key: Key = target.parse().unwrap();
    match transpose(song, &key) {
        Some(map) => map.apply_all(song),
        None => song.to_vec(),
    }
}

fn chords_of(song: &[String]) -> Vec<String> {
    song.iter()
        .flat_map(|line| find_chords(line).into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

#[test]
fn test_concrete_transposition_scenario() {
    let text = "Wonderful\nSomeone\n\nI see [D]trees of [F#m]green\n[D]";
    let out = render_text(text, Some("C"), true);
    assert_eq!(out.lines[0], TypedLine::chord("      C        Em"));
    assert_eq!(out.lines[1], TypedLine::text("I see trees of green"));
    assert_eq!(out.source_key.unwrap().to_string(), "D");
    assert_eq!(out.realized_key.unwrap().to_string(), "C");
}

#[test]
fn test_find_key_scenarios() {
    let minor = lines("[D]one\n[G]two [A7]\n[Bm]");
    assert_eq!(find_key_in_song(&minor).unwrap().to_string(), "Bm");

    let with_quality = lines("[G]one [C]two\n[D7+]\nno chords");
    assert_eq!(find_key_in_song(&with_quality).unwrap().to_string(), "D");
}

#[test]
fn test_transposing_to_own_key_is_identity() {
    let song = lines("[G]one [D/F#]two [Em7]three\n[C]four [Dsus4] [G]");
    let map = transpose(&song, &"G".parse().unwrap()).unwrap();
    assert!(map.is_identity());
    assert_eq!(map.apply_all(&song), song);

    // Same pitch under another name is still a no-op
    let sharp_song = lines("[C#]one [G#7]two [C#]");
    assert_eq!(transposed(&sharp_song, "Db"), sharp_song);
}

#[test]
fn test_round_trip_all_keys() {
    let bases = [
        lines("[C]one [F]two [Dm7]three [G7/B]four\n[Am]five [G]six [C]"),
        lines("[Am]one [Dm]two [F]three [E7/G#]four\n[C]five [E7]six [Am]"),
    ];

    for base in &bases {
        for from in SELECTABLE_KEYS {
            let original = transposed(base, from);
            for to in SELECTABLE_KEYS {
                let there = transposed(&original, to);
                let back = transposed(&there, from);
                assert_eq!(
                    chords_of(&back),
                    chords_of(&original),
                    "round trip {} -> {} -> {}",
                    from,
                    to,
                    from
                );
            }
        }
    }
}

#[test]
fn test_g_sharp_target_renders_flat_side() {
    let song = lines("[C]one [F]two [G7]three [Dm]four [C]");
    let out = transposed(&song, "G#");
    assert_eq!(chords_of(&out), vec!["[Ab]", "[Db]", "[Eb7]", "[Bbm]", "[Ab]"]);
    assert!(out.iter().all(|line| !line.contains('#')));
}

#[test]
fn test_minor_song_follows_target_tonic() {
    let song = lines("[Em]one [Am]two [B7]three [Em]");
    let out = transposed(&song, "Gb");
    // Gbm is written as F#m
    assert_eq!(chords_of(&out), vec!["[F#m]", "[Bm]", "[C#7]", "[F#m]"]);
}

#[test]
fn test_alignment_invariant() {
    let source = [
        "When the [G]night has [Em]come and the [C]land is [D]dark",
        "[A]Oh, I [E]won't be a[F#m]fraid, no I [D]won't",
        "Somebody [Bb]told me [F/A]you had a [Gm7]boyfriend",
    ];
    for line in source {
        let out = render(&RenderRequest {
            raw_lines: vec![line.to_string()],
            ..RenderRequest::default()
        });
        let chord_row: Vec<char> = out.lines[0].content.chars().collect();
        assert_eq!(out.lines[0].kind, LineKind::Chord);

        let mut lyric_chars = 0;
        let mut rest = line;
        while let Some(start) = rest.find('[') {
            lyric_chars += rest[..start].chars().count();
            let end = rest[start..].find(']').unwrap() + start;
            let name: Vec<char> = rest[start + 1..end].chars().collect();
            assert_eq!(
                &chord_row[lyric_chars..lyric_chars + name.len()],
                name.as_slice(),
                "chord in {:?}",
                line
            );
            rest = &rest[end + 1..];
        }
    }
}

#[test]
fn test_adjacent_chords_stay_apart() {
    let out = render(&RenderRequest {
        raw_lines: vec!["[G][D/F#][Em]Amazing".to_string()],
        ..RenderRequest::default()
    });
    assert_eq!(out.lines[0], TypedLine::chord("G D/F# Em"));
    assert_eq!(out.lines[1], TypedLine::text("       Amazing"));
}

#[test]
fn test_chorus_fallback_closes_at_blank() {
    let text = "Song\nMe\n\nverse [G]one\n\nChorus: \n[C]sing it\n[D]loud\n\nverse [G]two";
    let out = render_text(text, None, false);
    assert_eq!(
        out.lines,
        vec![
            TypedLine::text("verse one"),
            TypedLine::blank(),
            TypedLine::structure("     Chorus:"),
            TypedLine::text("     sing it"),
            TypedLine::text("     loud"),
            TypedLine::blank(),
            TypedLine::text("verse two"),
        ]
    );
}

#[test]
fn test_chords_hidden_mode() {
    let text = "Song\nMe\n\n[G]one [C]two\nplain\n[Am7/G]three[D]\n\n[Em]four";
    let out = render_text(text, Some("A"), false);
    assert!(out.lines.iter().all(|l| l.kind == LineKind::Text));
    assert_eq!(
        out.lines.iter().map(|l| l.content.as_str()).collect::<Vec<_>>(),
        vec!["one two", "plain", "three", "", "four"]
    );
}

#[test]
fn test_render_is_deterministic() {
    let song = Song::parse(chordsheet_songs::get_song("harbor-lights").unwrap().content.as_str());
    let mut request = RenderRequest::from_song(&song);
    request.target_key = Some("Eb".to_string());
    let first = render(&request);
    let second = render(&request);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_demo_library_renders_in_every_key() {
    for demo in chordsheet_songs::get_all_songs() {
        let song = Song::parse(&demo.content);
        assert!(!song.title.is_empty(), "{}", demo.name);
        for key in SELECTABLE_KEYS {
            let out = render_text(&demo.content, Some(key), true);
            assert!(out.warnings.is_empty(), "{} in {}: {:?}", demo.name, key, out.warnings);
            assert!(out.lines.iter().any(|l| l.kind == LineKind::Chord));
        }
    }
}

#[test]
fn test_harbor_lights_structure() {
    let demo = chordsheet_songs::get_song("harbor-lights").unwrap();
    let out = render_text(&demo.content, None, true);
    assert_eq!(out.source_key.unwrap().to_string(), "G");

    let structs: Vec<&str> = out
        .lines
        .iter()
        .filter(|l| l.kind == LineKind::Struct)
        .map(|l| l.content.as_str())
        .collect();
    assert_eq!(structs, vec!["     Chorus:", "Coda:"]);
    assert!(out.lines.iter().all(|l| !l.content.contains("tag ends")));
}

#[test]
fn test_options_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "indent: \"  \"").unwrap();
    writeln!(file, "chorus-label: \"Refrain:\"").unwrap();
    let content = std::fs::read_to_string(file.path()).unwrap();
    let options = FormatOptions::from_yaml(&content).unwrap();

    let request = RenderRequest {
        raw_lines: lines("{soc}\n[C]la"),
        ..RenderRequest::default()
    };
    let out = render_with_options(&request, &options);
    assert_eq!(
        out.lines,
        vec![
            TypedLine::structure("  Refrain:"),
            TypedLine::chord("  C"),
            TypedLine::text("  la"),
        ]
    );
}
