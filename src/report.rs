use std::fmt::Write;

use crate::schema::MatchResult;

pub const HEADER: &str = "Recommended Classes Based on Your Spotify Artists:";

pub fn render(results: &[MatchResult]) -> String {
    let mut out = format!("{HEADER}\n");
    if results.is_empty() {
        out.push_str("No class features any of your artists.\n");
        return out;
    }
    for result in results {
        out.push('\n');
        let _ = writeln!(out, "{}", result.class);
        for song in &result.matches {
            let _ = writeln!(out, "   {} \u{2014} {}", song.title, song.artist);
        }
    }
    out
}
