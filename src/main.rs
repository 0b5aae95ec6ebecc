use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use inquire::{Confirm, Select};
use log::info;
use playlist_scout::{
    config::Config,
    discovery::{discover_member, discover_public},
    error::RunError,
    extractor::Mode,
    matcher::rank,
    orchestrator::{fetch_all, walk_all},
    report,
    schema::PlaylistTable,
    session::{
        isolated::ChromeLauncher,
        shared::{ChromeTabs, SharedSession, TabHost},
        Launcher,
    },
    site::{DurationBucket, MEMBER_LISTING_URL},
    spotify::ArtistSource,
};
use strum::IntoEnumIterator;
use tokio::task::spawn_blocking;

#[derive(Parser)]
struct Opts {
    /// TOML file overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Asked interactively when omitted.
    #[arg(value_enum)]
    mode: Option<Mode>,
    /// Duration filter for the public listing.  Asked interactively when omitted.
    #[arg(long, value_enum)]
    duration: Option<DurationBucket>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let opts = Opts::parse();
    let config = Config::load(opts.config.as_deref())?;

    let mode = match opts.mode {
        Some(mode) => mode,
        None => Select::new("Which classes?", Mode::iter().collect()).prompt()?,
    };
    let artists = ArtistSource::from_config(&config.artists).map_err(RunError::TopArtists)?;

    let (favorites, table) = match mode {
        Mode::Public => {
            let bucket = match opts.duration {
                Some(bucket) => bucket,
                None => Select::new("Class duration", DurationBucket::iter().collect()).prompt()?,
            };
            tokio::try_join!(
                async { artists.top_artists().await.map_err(RunError::TopArtists) },
                run_public(&config, bucket),
            )?
        }
        Mode::Member => {
            // Looked up first so that a bad token is reported before the login prompt.
            let favorites = artists.top_artists().await.map_err(RunError::TopArtists)?;
            let config = config.clone();
            let table = spawn_blocking(move || run_member(&config))
                .await
                .map_err(|e| RunError::Browser(e.into()))??;
            (favorites, table)
        }
    };

    let results = rank(&table, &favorites);
    info!(
        "{} of {} classes feature your artists",
        results.len(),
        table.len()
    );
    print!("{}", report::render(&results));
    Ok(())
}

async fn run_public(config: &Config, bucket: DurationBucket) -> Result<PlaylistTable, RunError> {
    let launcher = Arc::new(ChromeLauncher::new(
        config.browser.clone(),
        config.timeouts.navigation,
    ));
    let timeouts = Arc::new(config.timeouts.clone());
    let classes = {
        let launcher = Arc::clone(&launcher);
        let timeouts = Arc::clone(&timeouts);
        let max = config.max_classes;
        spawn_blocking(move || {
            let mut session = launcher.launch().map_err(RunError::Browser)?;
            discover_public(&mut session, bucket, &timeouts, max)
        })
        .await
        .map_err(|e| RunError::Browser(e.into()))??
    };
    info!("Found {} classes", classes.len());
    Ok(fetch_all(launcher, classes, config.workers, timeouts).await)
}

fn run_member(config: &Config) -> Result<PlaylistTable, RunError> {
    let tabs = ChromeTabs::launch(&config.browser, config.timeouts.navigation)
        .map_err(RunError::Browser)?;
    tabs.navigate_home(MEMBER_LISTING_URL)
        .map_err(|source| RunError::Discovery {
            url: MEMBER_LISTING_URL.to_owned(),
            source,
        })?;
    let classes = discover_member(
        tabs.home(),
        || {
            Confirm::new("Log in manually, then press ENTER to continue...")
                .with_default(true)
                .prompt()?;
            Ok(())
        },
        &config.timeouts,
        config.max_classes,
    )?;
    info!("Found {} classes", classes.len());
    let mut session = SharedSession::new(tabs, config.timeouts.tab_settle);
    Ok(walk_all(&mut session, &classes, &config.timeouts))
}
