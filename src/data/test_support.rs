//! Fixtures shared by the data-layer tests.

use std::path::PathBuf;

use super::model::Track;

/// A track whose numeric attributes are offset by `base`.
pub fn track(title: &str, artist: &str, genre: &str, base: i64) -> Track {
    Track {
        title: title.to_string(),
        artist: artist.to_string(),
        top_genre: genre.to_string(),
        beats_per_minute: 100 + base,
        energy: 50 + base,
        danceability: 60 + base,
        loudness: -6,
        liveness: 10,
        valence: 40,
        duration: 200,
        acousticness: 5,
        speechiness: 4,
        popularity: 80 + base,
    }
}

/// The dataset shipped with the dashboard.
pub fn canonical_dataset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/Top2020.csv")
}
