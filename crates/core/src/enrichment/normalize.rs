//! Search input normalization.
//!
//! Local titles carry qualifiers ("(Live)", "[Remastered]") and artist names
//! carry featured artists ("A feat. B") that make a field-filtered catalog
//! search miss. Both are stripped before the first lookup.

use std::sync::LazyLock;

use regex::Regex;

/// Featured-artist separators, matched case-insensitively.
pub const ARTIST_SEPARATORS: [&str; 5] = [" ft. ", " feat. ", " featuring ", " x ", " & "];

static QUALIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Non-greedy so "A (Live) B (Edit)" keeps the " B ".
    Regex::new(r"\(.*?\)|\[.*?\]").expect("qualifier pattern is valid")
});

/// Removes parenthesized and bracketed qualifiers, then trims.
///
/// ```
/// use top2000_core::enrichment::normalize_title;
/// assert_eq!(normalize_title("Song (Live)"), "Song");
/// assert_eq!(normalize_title("Bohemian Rhapsody [Remastered 2011]"), "Bohemian Rhapsody");
/// ```
pub fn normalize_title(title: &str) -> String {
    QUALIFIER_PATTERN.replace_all(title, "").trim().to_string()
}

/// Keeps the part of an artist credit before a featured-artist separator.
///
/// Separators are tried in [`ARTIST_SEPARATORS`] order and the first one found
/// past position 0 decides the cut, so `" ft. "` outranks `" & "` wherever
/// each appears.
///
/// ```
/// use top2000_core::enrichment::normalize_artist;
/// assert_eq!(normalize_artist("A feat. B"), "A");
/// assert_eq!(normalize_artist("A & B"), "A");
/// assert_eq!(normalize_artist("A & B feat. C"), "A & B");
/// assert_eq!(normalize_artist("Queen"), "Queen");
/// ```
pub fn normalize_artist(artist: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with the original.
    let lowered = artist.to_ascii_lowercase();
    let cut = ARTIST_SEPARATORS
        .iter()
        .filter_map(|separator| lowered.find(separator))
        .find(|&index| index > 0);

    match cut {
        Some(index) => artist[..index].trim().to_string(),
        None => artist.trim().to_string(),
    }
}
