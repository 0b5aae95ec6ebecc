use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::bail;
use log::info;
use playlist_scout_utils::fs_util::read_toml;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use strum::Display;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_MAX_CLASSES: usize = 10;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Concurrent headless browsers in public mode.
    pub workers: usize,
    pub max_classes: usize,
    pub timeouts: Timeouts,
    pub browser: BrowserConfig,
    pub artists: ArtistsConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_classes: DEFAULT_MAX_CLASSES,
            timeouts: Default::default(),
            browser: Default::default(),
            artists: Default::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config: Self = match path {
            Some(path) => {
                let config = read_toml(path)?;
                info!("Loaded configuration from {path:?}");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            bail!("`workers` must be at least 1");
        }
        if self.max_classes == 0 {
            bail!("`max_classes` must be at least 1");
        }
        Ok(())
    }
}

/// Upper bounds for every wait on the browser.  Written in milliseconds.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub navigation: Duration,
    /// Looking up the playlist accordion.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub expand: Duration,
    /// First song row after expanding the accordion.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub first_row: Duration,
    /// Each probed song row.  Paid once more at the end of every playlist.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub probe: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub listing: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub member_rows: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub cookie_banner: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub member_listing: Duration,
    /// Pause after closing a class tab in member mode.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tab_settle: Duration,
}
impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(20),
            expand: Duration::from_secs(10),
            first_row: Duration::from_secs(10),
            probe: Duration::from_millis(500),
            listing: Duration::from_secs(10),
            member_rows: Duration::from_secs(10),
            cookie_banner: Duration::from_secs(5),
            member_listing: Duration::from_secs(20),
            tab_settle: Duration::from_secs(2),
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Chrome executable; detected (or fetched) when absent.
    pub path: Option<PathBuf>,
    pub remote_debugging_port: Option<u16>,
    /// The browser is shut down after this long without any command.  Must outlast
    /// the manual login in member mode.
    #[serde(rename = "idle_timeout_secs")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub idle_timeout: Duration,
    pub member_window_size: Option<(u32, u32)>,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            path: None,
            remote_debugging_port: None,
            idle_timeout: Duration::from_secs(600),
            member_window_size: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ArtistsConfig {
    /// Used instead of asking Spotify when present.
    pub favorites: Option<Vec<String>>,
    pub spotify_token_path: PathBuf,
    pub limit: u8,
    pub time_range: TimeRange,
}
impl Default for ArtistsConfig {
    fn default() -> Self {
        Self {
            favorites: None,
            spotify_token_path: PathBuf::from("./ignore/spotify_token.json"),
            limit: 25,
            time_range: TimeRange::ShortTerm,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}
