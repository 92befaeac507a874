//! Splitting a song page into lyrics and chord annotations.
//!
//! A wywrota.pl song page renders chords as inline `<code>` spans
//! interleaved with plain lyric text on the same visual line, with `<br>`
//! as the only line separator. The immediate parent's tag name is the one
//! reliable discriminator between the two streams, and feeding every `<br>`
//! to both accumulators in lock-step is what keeps them line-for-line
//! aligned after the split.

use std::ops::Deref;

use scraper::{Html, Node, Selector};
use wywrota_model::Song;

/// Element enclosing both lyrics and chords for one song.
const CONTENT_SELECTOR: &str = "div.interpretation-content";

/// `&nbsp;` as handed over by the HTML parser.
const NBSP: char = '\u{a0}';

/// Split a song page into its lyrics and chords streams.
///
/// Pure function of the page HTML. Returns `None` when the content block is
/// missing or either stream comes out empty; both streams must carry text
/// for the page to count as a song.
pub fn split_content(html: &str) -> Option<Song> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(CONTENT_SELECTOR).expect("valid selector");
    let content = document.select(&selector).next()?;

    let mut lyrics = String::new();
    let mut chords = String::new();
    let mut br_count = 0u32;

    // One pass over every descendant in document order. Text nodes reset
    // the break counter; runs of adjacent <br> past the first emit nothing,
    // so stacked breaks collapse instead of tearing the streams apart.
    for node in content.descendants() {
        match node.value() {
            Node::Text(text) => {
                br_count = 0;
                if has_code_parent(node) {
                    let fragment = text.deref().replace(NBSP, "");
                    if !fragment.is_empty() {
                        chords.push_str(&fragment);
                        chords.push(' ');
                    }
                } else {
                    let fragment = text.deref().trim_matches('\n').replace(NBSP, "");
                    if !fragment.is_empty() {
                        lyrics.push_str(&fragment);
                    }
                }
            }
            Node::Element(element) if element.name().eq_ignore_ascii_case("br") => {
                br_count += 1;
                if br_count < 2 {
                    lyrics.push('\n');
                    chords.push('\n');
                }
            }
            _ => {}
        }
    }

    let lyrics = lyrics.trim_matches('\n');
    let chords = chords.trim_matches('\n');
    if lyrics.is_empty() || chords.is_empty() {
        tracing::debug!("Content block present but a stream came out empty");
        return None;
    }

    Some(Song::new(lyrics, chords))
}

/// Whether a node's immediate parent is a `<code>` element.
fn has_code_parent(node: ego_tree::NodeRef<'_, Node>) -> bool {
    node.parent()
        .and_then(|parent| parent.value().as_element().map(|el| el.name() == "code"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> String {
        format!(
            r#"<html><body><div class="interpretation-content">{content}</div></body></html>"#
        )
    }

    #[test]
    fn test_round_trip_scenario() {
        let html = page(r#"Hello <code>C G</code><br>World"#);
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "Hello \nWorld");
        // The trailing <br> starts a new lyric line; the chords stream gets
        // no further text, and the final trim drops its trailing newline.
        assert_eq!(song.chords, "C G ");
    }

    #[test]
    fn test_streams_stay_line_aligned() {
        let html = page(
            "<code>C</code>Line one<br><code>G</code>Line two<br><code>D</code>Line three",
        );
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "Line one\nLine two\nLine three");
        assert_eq!(song.chords, "C \nG \nD ");
        assert_eq!(song.lyric_lines(), song.chord_lines());
    }

    #[test]
    fn test_adjacent_breaks_collapse() {
        // Three back-to-back <br> elements yield exactly one newline.
        let html = page("<code>C</code>One<br><br><br>Two<code>D</code>");
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "One\nTwo");
        assert_eq!(song.chords, "C \nD ");
    }

    #[test]
    fn test_text_between_breaks_resets_the_gate() {
        // Whitespace text nodes between breaks reset the counter, so each
        // break emits its own newline — matching how the site interleaves
        // markup and indentation.
        let html = page("<code>C</code>One<br>\n<br>\nTwo<code>D</code>");
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "One\n\nTwo");
        assert_eq!(song.chords, "C \n\nD ");
    }

    #[test]
    fn test_missing_content_block() {
        let html = r#"<html><body><div class="other">Hello <code>C</code></div></body></html>"#;
        assert_eq!(split_content(html), None);
    }

    #[test]
    fn test_entity_only_content() {
        // Non-breaking spaces and breaks but no real text in either stream.
        let html = page("&nbsp;&nbsp;<br><code>&nbsp;</code>");
        assert_eq!(split_content(&html), None);
    }

    #[test]
    fn test_lyrics_without_chords_is_not_a_song() {
        let html = page("Just words<br>More words");
        assert_eq!(split_content(&html), None);
    }

    #[test]
    fn test_chords_without_lyrics_is_not_a_song() {
        let html = page("<code>C G D</code>");
        assert_eq!(split_content(&html), None);
    }

    #[test]
    fn test_nbsp_stripped_from_both_streams() {
        let html = page("Hej&nbsp;there <code>C&nbsp;G</code><br>Next");
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "Hejthere \nNext");
        assert_eq!(song.chords, "CG ");
    }

    #[test]
    fn test_nested_markup_inside_content() {
        // Only the immediate parent decides the stream: text inside other
        // inline elements still counts as lyrics.
        let html = page("<strong>Refrain</strong><br><code>e C</code>words");
        let song = split_content(&html).unwrap();
        assert_eq!(song.lyrics, "Refrain\nwords");
        // The break before any chord text leaves a leading newline in the
        // chords buffer, which the final trim removes.
        assert_eq!(song.chords, "e C ");
    }

    #[test]
    fn test_split_is_idempotent() {
        let html = page("<code>a F</code>Som na siodemce<br><code>C</code>dalej");
        let first = split_content(&html).unwrap();
        let second = split_content(&html).unwrap();
        assert_eq!(first, second);
    }
}
