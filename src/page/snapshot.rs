use std::{cell::RefCell, time::Duration};

use anyhow::Context;
use playlist_scout_utils::selector::{parse_selector, trimmed_text};
use scraper::{ElementRef, Html};

use super::Page;

/// A page frozen at one point in time, e.g. saved from a browser.
///
/// Nothing is ever rendered later, so timeouts are ignored and a missing element fails
/// immediately.  Clicks are recorded but do not change the document.
pub struct SnapshotPage {
    html: Html,
    url: String,
    clicked: RefCell<Vec<String>>,
}

impl SnapshotPage {
    pub fn new(html: &str, url: impl Into<String>) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.into(),
            clicked: Default::default(),
        }
    }

    /// Selectors passed to [`Page::click`] so far.
    pub fn clicked(&self) -> Vec<String> {
        self.clicked.borrow().clone()
    }

    fn first(&self, selector: &str) -> anyhow::Result<ElementRef> {
        self.html
            .select(&parse_selector(selector)?)
            .next()
            .with_context(|| format!("No element matches {selector:?}"))
    }
}

impl Page for SnapshotPage {
    fn wait_for(&self, selector: &str, _: Duration) -> anyhow::Result<()> {
        self.first(selector).map(|_| ())
    }

    fn text(&self, selector: &str, _: Duration) -> anyhow::Result<String> {
        self.first(selector).map(trimmed_text)
    }

    fn attribute(&self, selector: &str, name: &str, _: Duration) -> anyhow::Result<Option<String>> {
        Ok(self.first(selector)?.value().attr(name).map(ToOwned::to_owned))
    }

    fn click(&self, selector: &str, _: Duration) -> anyhow::Result<()> {
        self.first(selector)?;
        self.clicked.borrow_mut().push(selector.to_owned());
        Ok(())
    }

    fn snapshot(&self) -> anyhow::Result<Html> {
        Ok(self.html.clone())
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
