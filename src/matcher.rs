use std::cmp::Reverse;

use itertools::Itertools;

use crate::schema::{FavoriteArtists, MatchResult, PlaylistTable};

/// Classes whose playlist features any favorite artist, most matching songs first.
///
/// An artist matches when its lowercase form contains a favorite as a substring, so
/// `"Foo ft. Bar"` matches `"bar"`.  Classes without a match are left out.  Ties are
/// broken by URL so that the order only depends on the inputs.
pub fn rank(table: &PlaylistTable, favorites: &FavoriteArtists) -> Vec<MatchResult> {
    table
        .iter()
        .filter_map(|(class, playlist)| {
            let matches = playlist
                .songs()
                .iter()
                .filter(|song| favorites.matches(&song.artist))
                .cloned()
                .collect_vec();
            (!matches.is_empty()).then(|| MatchResult {
                class: class.clone(),
                matches,
            })
        })
        .sorted_by_key(|result| (Reverse(result.matches.len()), result.class.clone()))
        .collect()
}
