include!(concat!(env!("OUT_DIR"), "/songs.rs"));

/// A song with its name and raw text
#[derive(Debug, Clone)]
pub struct Song {
    pub name: String,
    pub content: String,
}

/// Get all embedded songs
pub fn get_all_songs() -> Vec<Song> {
    SONGS
        .iter()
        .map(|(name, content)| Song {
            name: name.to_string(),
            content: content.to_string(),
        })
        .collect()
}

/// Get a song by name (file name without `.song`)
pub fn get_song(name: &str) -> Option<Song> {
    SONGS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(name, content)| Song {
            name: name.to_string(),
            content: content.to_string(),
        })
}

/// List all song names
pub fn list_songs() -> Vec<&'static str> {
    SONGS.iter().map(|(name, _)| *name).collect()
}
