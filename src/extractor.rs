//! Reads the playlist off a rendered class page.
//!
//! The public class page numbers its rows (`#song-title-0`, `#song-artists-0`, ...) but
//! never says how many there are, so rows are probed one index at a time until one is
//! missing.  The member page renders plain list items that are read in one pass.

use std::{iter::FusedIterator, time::Duration};

use log::{debug, info};
use playlist_scout_utils::{selector, selector::trimmed_text};
use scraper::Html;
use strum::{Display, EnumIter};

use crate::{
    config::Timeouts,
    page::Page,
    schema::{Playlist, Song},
    site,
};

/// How the class pages are accessed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, EnumIter, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Anonymous, one headless browser per class.
    Public,
    /// Logged in, one shared browser with a tab per class.
    Member,
}

pub fn extract<P: Page>(page: &P, mode: Mode, timeouts: &Timeouts) -> Playlist {
    match mode {
        Mode::Public => extract_public(page, timeouts),
        Mode::Member => extract_member(page, timeouts),
    }
}

pub fn extract_public<P: Page>(page: &P, timeouts: &Timeouts) -> Playlist {
    expand_playlist(page, timeouts);
    probe_songs(page, timeouts).collect()
}

/// Opens the collapsed playlist accordion, if any.  Every step is best-effort:
/// some pages have no accordion and show the list already expanded.
fn expand_playlist<P: Page>(page: &P, timeouts: &Timeouts) {
    let expanded = page.attribute(site::PLAYLIST_ACCORDION, "aria-expanded", timeouts.expand);
    match expanded {
        Ok(Some(expanded)) if expanded == "false" => {
            if let Err(e) = page.click(site::PLAYLIST_ACCORDION, timeouts.expand) {
                debug!("Could not expand the playlist: {e:#}");
                return;
            }
            if let Err(e) = page.wait_for(&site::song_title(0), timeouts.first_row) {
                debug!("First song did not appear after expanding: {e:#}");
            }
        }
        Ok(_) => {}
        Err(e) => debug!("Playlist accordion not found: {e:#}"),
    }
}

/// Songs at index 0, 1, 2, ... up to (excluding) the first index that cannot be read.
pub fn probe_songs<'p, P: Page>(page: &'p P, timeouts: &Timeouts) -> SongProbe<'p, P> {
    SongProbe {
        page,
        timeout: timeouts.probe,
        next_index: 0,
        finished: false,
    }
}

pub struct SongProbe<'p, P> {
    page: &'p P,
    timeout: Duration,
    next_index: usize,
    finished: bool,
}

impl<P: Page> SongProbe<'_, P> {
    fn probe(&self, index: usize) -> anyhow::Result<Song> {
        let title = self.page.text(&site::song_title(index), self.timeout)?;
        let artist = self.page.text(&site::song_artists(index), self.timeout)?;
        Ok(Song::new(title, artist))
    }
}

impl<P: Page> Iterator for SongProbe<'_, P> {
    type Item = Song;

    fn next(&mut self) -> Option<Song> {
        if self.finished {
            return None;
        }
        match self.probe(self.next_index) {
            Ok(song) => {
                self.next_index += 1;
                Some(song)
            }
            Err(e) => {
                // A slow row and the end of the list look the same from here.
                debug!("Stopped probing at index {}: {e:#}", self.next_index);
                self.finished = true;
                None
            }
        }
    }
}

impl<P: Page> FusedIterator for SongProbe<'_, P> {}

pub fn extract_member<P: Page>(page: &P, timeouts: &Timeouts) -> Playlist {
    if let Err(e) = page.wait_for(site::MEMBER_SONG_ROW, timeouts.member_rows) {
        info!("No visible playlist found");
        debug!("{e:#}");
        return Playlist::default();
    }
    match page.snapshot() {
        Ok(html) => parse_member_rows(&html),
        Err(e) => {
            info!("Could not read the playlist: {e:#}");
            Playlist::default()
        }
    }
}

pub fn parse_member_rows(html: &Html) -> Playlist {
    html.select(selector!(site::MEMBER_SONG_ROW))
        .filter_map(|row| {
            let title = row.select(selector!(site::MEMBER_SONG_TITLE)).next();
            let artist = row.select(selector!(site::MEMBER_SONG_ARTIST)).next();
            match (title, artist) {
                (Some(title), Some(artist)) => {
                    Some(Song::new(trimmed_text(title), trimmed_text(artist)))
                }
                _ => {
                    debug!("Skipping a song row without title or artist");
                    None
                }
            }
        })
        .collect()
}
