use derive_more::{AsRef, Display, From, IntoIterator};
use hashbrown::{hash_map::Entry, HashMap};
use log::warn;
use serde::{Deserialize, Serialize};

/// Canonical URL of a single class page.
#[derive(
    Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, From, AsRef, Display, Serialize, Deserialize,
)]
pub struct ClassUrl(String);
impl ClassUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for ClassUrl {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Serialize, Deserialize)]
pub struct SongTitle(String);

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Serialize, Deserialize)]
pub struct ArtistName(String);

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Song {
    pub title: SongTitle,
    pub artist: ArtistName,
}
impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let (title, artist): (String, String) = (title.into(), artist.into());
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Songs in the order they are played in the class.
#[derive(Clone, PartialEq, Eq, Default, Debug, From, IntoIterator, Serialize, Deserialize)]
#[into_iterator(owned, ref)]
pub struct Playlist(Vec<Song>);
impl Playlist {
    pub fn songs(&self) -> &[Song] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromIterator<Song> for Playlist {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Playlists keyed by class.  Each class is written at most once.
#[derive(Default, Debug)]
pub struct PlaylistTable(HashMap<ClassUrl, Playlist>);
impl PlaylistTable {
    /// Returns `false` (and keeps the existing entry) if `class` was already recorded.
    pub fn record(&mut self, class: ClassUrl, playlist: Playlist) -> bool {
        match self.0.entry(class) {
            Entry::Vacant(entry) => {
                entry.insert(playlist);
                true
            }
            Entry::Occupied(entry) => {
                warn!("Playlist for {} was already recorded; ignoring", entry.key());
                false
            }
        }
    }
    pub fn get(&self, class: &ClassUrl) -> Option<&Playlist> {
        self.0.get(class)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&ClassUrl, &Playlist)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromIterator<(ClassUrl, Playlist)> for PlaylistTable {
    fn from_iter<I: IntoIterator<Item = (ClassUrl, Playlist)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (class, playlist) in iter {
            table.record(class, playlist);
        }
        table
    }
}

/// Lowercase artist names used as match keys.  Blank names are dropped,
/// since an empty key would match every artist.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct FavoriteArtists(Vec<String>);
impl FavoriteArtists {
    pub fn names(&self) -> &[String] {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn matches(&self, artist: &ArtistName) -> bool {
        let artist = artist.as_ref().to_lowercase();
        self.0.iter().any(|favorite| artist.contains(favorite.as_str()))
    }
}
impl<S: AsRef<str>> FromIterator<S> for FavoriteArtists {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MatchResult {
    pub class: ClassUrl,
    pub matches: Vec<Song>,
}
