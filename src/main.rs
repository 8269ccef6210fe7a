use std::env;
use std::fs;
use std::process;

use chordsheet::{render_with_options, FormatOptions, FormattedSong, RenderRequest, Song};

const USAGE: &str = "Usage: chordsheet <song.txt> [--key K] [--no-chords] [--json] [--options opts.yaml]
       chordsheet --demo <name> [--key K] [--no-chords] [--json]
       chordsheet --list-demos";

struct Args {
    input: Input,
    key: Option<String>,
    chords_visible: bool,
    json: bool,
    options_path: Option<String>,
}

enum Input {
    File(String),
    Demo(String),
    ListDemos,
}

fn usage_exit() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Args {
    let mut input = None;
    let mut key = None;
    let mut chords_visible = true;
    let mut json = false;
    let mut options_path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--key" => key = Some(iter.next().cloned().unwrap_or_else(|| usage_exit())),
            "--no-chords" => chords_visible = false,
            "--json" => json = true,
            "--options" => options_path = Some(iter.next().cloned().unwrap_or_else(|| usage_exit())),
            "--demo" => input = Some(Input::Demo(iter.next().cloned().unwrap_or_else(|| usage_exit()))),
            "--list-demos" => input = Some(Input::ListDemos),
            flag if flag.starts_with("--") => {
                eprintln!("Unknown flag: {}", flag);
                usage_exit();
            }
            path => input = Some(Input::File(path.to_string())),
        }
    }

    Args {
        input: input.unwrap_or_else(|| usage_exit()),
        key,
        chords_visible,
        json,
        options_path,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args);

    // Read input
    let source = match &args.input {
        Input::ListDemos => {
            for name in chordsheet_songs::list_songs() {
                println!("{}", name);
            }
            return;
        }
        Input::Demo(name) => match chordsheet_songs::get_song(name) {
            Some(song) => song.content,
            None => {
                eprintln!("No demo song named '{}'. Try --list-demos.", name);
                process::exit(1);
            }
        },
        Input::File(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                process::exit(1);
            }
        },
    };

    let options = match &args.options_path {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading options '{}': {}", path, e);
                    process::exit(1);
                }
            };
            match FormatOptions::from_yaml(&content) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(1);
                }
            }
        }
        None => FormatOptions::default(),
    };

    // Render
    let song = Song::parse(&source);
    let mut request = RenderRequest::from_song(&song);
    request.target_key = args.key.clone();
    request.chords_visible = args.chords_visible;
    let rendered = render_with_options(&request, &options);

    for warning in &rendered.warnings {
        eprintln!("warning: {}", warning);
    }

    // Output
    if args.json {
        match serde_json::to_string_pretty(&rendered) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("{}", song.title);
    println!("{}", song.authors);
    if let Some(key) = rendered.realized_key.or(rendered.source_key) {
        println!("Key: {}", key);
    }
    println!();
    print!("{}", plain_text(&rendered));
}

/// One row per line, labels exactly as configured.
fn plain_text(rendered: &FormattedSong) -> String {
    rendered
        .lines
        .iter()
        .map(|line| format!("{}\n", line.content))
        .collect()
}
