//! A rendered page that can be queried with CSS selectors.
//!
//! Every lookup takes an explicit timeout; an element that does not show up in time
//! is reported as an error, which callers are free to treat as "absent".

pub mod chrome;
pub mod snapshot;

use std::time::Duration;

use scraper::Html;

pub trait Page {
    /// Waits until at least one element matches `selector`.
    fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<()>;

    /// Visible text of the first element matching `selector`, trimmed.
    fn text(&self, selector: &str, timeout: Duration) -> anyhow::Result<String>;

    fn attribute(&self, selector: &str, name: &str, timeout: Duration)
        -> anyhow::Result<Option<String>>;

    /// Clicks the first element matching `selector`.  Falls back to a scripted click
    /// when the element is obscured or not naturally interactive.
    fn click(&self, selector: &str, timeout: Duration) -> anyhow::Result<()>;

    /// The current DOM, for reading many elements at once.
    fn snapshot(&self) -> anyhow::Result<Html>;

    fn url(&self) -> String;
}
