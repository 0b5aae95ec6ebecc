/// Failures that end a run.  Anything that goes wrong with a single class is
/// absorbed into an empty playlist instead and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("No classes could be discovered from {url}: {source:#}")]
    Discovery {
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Could not determine the favorite artists: {0:#}")]
    TopArtists(#[source] anyhow::Error),
    #[error("The browser could not be started: {0:#}")]
    Browser(#[source] anyhow::Error),
}
