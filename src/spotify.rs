//! Favorite artists, either from the configuration or from the listener's Spotify
//! top artists.

use std::path::Path;

use anyhow::Context;
use log::info;
use playlist_scout_utils::fs_util::read_json;
use serde::Deserialize;

use crate::{
    config::{ArtistsConfig, TimeRange},
    schema::FavoriteArtists,
};

const TOP_ARTISTS_URL: &str = "https://api.spotify.com/v1/me/top/artists";

/// The access token is obtained out of band (it needs the `user-top-read` scope).
#[derive(Deserialize)]
pub struct SpotifyToken {
    pub access_token: String,
}

#[derive(Deserialize)]
struct TopArtistsResponse {
    items: Vec<ArtistObject>,
}
#[derive(Deserialize)]
struct ArtistObject {
    name: String,
}

pub struct SpotifyClient {
    client: reqwest::Client,
    token: String,
}
impl SpotifyClient {
    pub fn new(token: SpotifyToken) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.access_token,
        }
    }

    pub fn from_token_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(read_json(path)?))
    }

    /// Names of the most played artists, most played first.
    pub async fn top_artists(&self, limit: u8, time_range: TimeRange) -> anyhow::Result<Vec<String>> {
        let response: TopArtistsResponse = self
            .client
            .get(TOP_ARTISTS_URL)
            .bearer_auth(&self.token)
            .query(&[
                ("limit", limit.to_string()),
                ("time_range", time_range.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Unexpected response for top artists")?;
        Ok(response.items.into_iter().map(|artist| artist.name).collect())
    }
}

pub enum ArtistSource {
    Fixed(Vec<String>),
    Spotify {
        client: SpotifyClient,
        limit: u8,
        time_range: TimeRange,
    },
}
impl ArtistSource {
    pub fn from_config(config: &ArtistsConfig) -> anyhow::Result<Self> {
        Ok(match &config.favorites {
            Some(favorites) => Self::Fixed(favorites.clone()),
            None => Self::Spotify {
                client: SpotifyClient::from_token_file(&config.spotify_token_path)?,
                limit: config.limit,
                time_range: config.time_range,
            },
        })
    }

    pub async fn top_artists(&self) -> anyhow::Result<FavoriteArtists> {
        let names = match self {
            Self::Fixed(names) => names.clone(),
            Self::Spotify {
                client,
                limit,
                time_range,
            } => client.top_artists(*limit, *time_range).await?,
        };
        let favorites: FavoriteArtists = names.iter().collect();
        if favorites.is_empty() {
            anyhow::bail!("No favorite artist to match against");
        }
        info!("Favorite artists: {}", favorites.names().join(", "));
        Ok(favorites)
    }
}
