//! URLs and DOM shapes of the class site.

use strum::{Display, EnumIter, EnumString};

pub const PUBLIC_LISTING_BASE_URL: &str = "https://www.onepeloton.com/classes/cycling/";
pub const MEMBER_LISTING_URL: &str = "https://members.onepeloton.com/classes/cycling";

/// Anchor pointing to a class detail page in the public listing.
pub const CLASS_DETAIL_URL_PATTERN: &str =
    r"^https://www\.onepeloton\.com/classes/cycling/\d+-min-[a-z0-9-]+-[a-z-]+-[a-z-]+-\w+";

pub const ANCHOR: &str = "a";
pub const MEMBER_CLASS_ANCHOR: &str = r#"a[href*="/classes/cycling?modal=classDetailsModal"]"#;
pub const COOKIE_CONSENT_BUTTON: &str = "#onetrust-accept-btn-handler";

pub const PLAYLIST_ACCORDION: &str = "#playlist-accordion";
pub const MEMBER_SONG_ROW: &str = r#"li[data-test-id="playlistSong"]"#;
pub const MEMBER_SONG_TITLE: &str = "strong";
pub const MEMBER_SONG_ARTIST: &str = "span";

pub fn song_title(index: usize) -> String {
    format!("#song-title-{index}")
}

pub fn song_artists(index: usize) -> String {
    format!("#song-artists-{index}")
}

/// Duration filters offered by the public listing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, EnumIter, EnumString, clap::ValueEnum)]
pub enum DurationBucket {
    #[strum(serialize = "5-10mins")]
    #[value(name = "5-10mins")]
    FiveToTen,
    #[strum(serialize = "15-20mins")]
    #[value(name = "15-20mins")]
    FifteenToTwenty,
    #[strum(serialize = "30-45mins")]
    #[value(name = "30-45mins")]
    ThirtyToFortyFive,
    #[strum(serialize = "60mins-up")]
    #[value(name = "60mins-up")]
    SixtyAndUp,
}
impl DurationBucket {
    pub fn listing_url(self) -> String {
        format!("{PUBLIC_LISTING_BASE_URL}{self}")
    }
}
