//! Core data types for the wywrota songbook client.

use serde::{Deserialize, Serialize};

/// A song fetched from wywrota.pl: two line-aligned text streams.
///
/// Line N of `chords` annotates line N of `lyrics`. Both streams are
/// guaranteed non-empty by the extractor; a page that yields an empty
/// stream is reported as "song not found" instead of producing a `Song`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Lyric text with embedded line breaks.
    pub lyrics: String,
    /// Chord annotations, one line per lyric line.
    pub chords: String,
}

impl Song {
    pub fn new(lyrics: impl Into<String>, chords: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
            chords: chords.into(),
        }
    }

    /// Number of lines in the lyrics stream.
    pub fn lyric_lines(&self) -> usize {
        self.lyrics.lines().count()
    }

    /// Number of lines in the chords stream.
    pub fn chord_lines(&self) -> usize {
        self.chords.lines().count()
    }

    /// Render the song as songbook text: each chord line printed above the
    /// lyric line it annotates. Chord lines that are blank (a lyric line
    /// with no annotations) are omitted rather than printed as empty lines.
    pub fn interleaved(&self) -> String {
        let mut out = String::with_capacity(self.lyrics.len() + self.chords.len());
        let mut chords = self.chords.lines();
        let mut lyrics = self.lyrics.lines();

        loop {
            match (chords.next(), lyrics.next()) {
                (None, None) => break,
                (chord, lyric) => {
                    if let Some(chord) = chord {
                        if !chord.trim().is_empty() {
                            out.push_str(chord);
                            out.push('\n');
                        }
                    }
                    if let Some(lyric) = lyric {
                        out.push_str(lyric);
                        out.push('\n');
                    }
                }
            }
        }

        out
    }
}
