//! Output files for a fetched song.

use std::fs;
use std::path::Path;

use anyhow::Result;
use wywrota_model::Song;

/// Write a fetched song into `output_dir`.
///
/// Creates the directory if it doesn't exist, then writes:
/// - `lyrics.txt` / `chords.txt` — the two aligned plain-text streams
/// - `song.json` — both streams plus the source URL
pub fn write_song(song: &Song, url: &str, output_dir: &str) -> Result<()> {
    let dir = Path::new(output_dir);
    fs::create_dir_all(dir)?;

    fs::write(dir.join("lyrics.txt"), &song.lyrics)?;
    tracing::info!(path = %dir.join("lyrics.txt").display(), lines = song.lyric_lines(), "Wrote lyrics");

    fs::write(dir.join("chords.txt"), &song.chords)?;
    tracing::info!(path = %dir.join("chords.txt").display(), lines = song.chord_lines(), "Wrote chords");

    let record = serde_json::json!({
        "url": url,
        "lyrics": song.lyrics,
        "chords": song.chords,
    });
    fs::write(dir.join("song.json"), serde_json::to_string_pretty(&record)?)?;
    tracing::info!(path = %dir.join("song.json").display(), "Wrote song JSON");

    Ok(())
}
