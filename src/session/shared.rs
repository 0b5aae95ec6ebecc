use std::{sync::Arc, thread::sleep, time::Duration};

use headless_chrome::{Browser, Tab};
use log::{debug, warn};

use crate::{config::BrowserConfig, extractor::Mode, page::Page};

use super::{launch_options, Session};

/// A browser whose tabs can be opened and closed around a fixed home tab.
pub trait TabHost {
    type Tab: Page;

    fn home(&self) -> &Self::Tab;
    /// Opens `url` in a new tab and brings it to the front.  On failure no tab is
    /// left open.
    fn open(&self, url: &str) -> anyhow::Result<Self::Tab>;
    fn close(&self, tab: &Self::Tab) -> anyhow::Result<()>;
    fn focus_home(&self) -> anyhow::Result<()>;
}

/// One long-lived (typically logged-in) browser, visited one tab at a time.
///
/// Not `Clone`: visits need `&mut self`, so they can never overlap.
pub struct SharedSession<H> {
    host: H,
    settle: Duration,
}

impl<H: TabHost> SharedSession<H> {
    pub fn new(host: H, settle: Duration) -> Self {
        Self { host, settle }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn home(&self) -> &H::Tab {
        self.host.home()
    }
}

impl<H: TabHost> Session for SharedSession<H> {
    type Page = H::Tab;

    fn visit<R>(&mut self, url: &str, f: impl FnOnce(&H::Tab) -> R) -> anyhow::Result<R> {
        let tab = OpenTab {
            host: &self.host,
            tab: self.host.open(url)?,
            settle: self.settle,
        };
        Ok(f(&tab.tab))
    }
}

/// Closes the tab and returns to the home tab when dropped.
struct OpenTab<'h, H: TabHost> {
    host: &'h H,
    tab: H::Tab,
    settle: Duration,
}

impl<H: TabHost> Drop for OpenTab<'_, H> {
    fn drop(&mut self) {
        release(self.host, &self.tab);
        sleep(self.settle);
    }
}

/// Closes `tab` and refocuses the home tab.  Returning to the home tab is attempted
/// even if closing fails.
fn release<H: TabHost>(host: &H, tab: &H::Tab) {
    if let Err(e) = host.close(tab) {
        warn!("Failed to close a class tab: {e:#}");
    }
    if let Err(e) = host.focus_home() {
        warn!("Failed to return to the home tab: {e:#}");
    }
}

/// A visible Chrome window driven over the DevTools protocol.
pub struct ChromeTabs {
    // Keeps the process alive; it is killed when this is dropped.
    browser: Browser,
    home: Arc<Tab>,
    navigation: Duration,
}

impl ChromeTabs {
    pub fn launch(config: &BrowserConfig, navigation: Duration) -> anyhow::Result<Self> {
        let browser = Browser::new(launch_options(config, Mode::Member)?)?;
        let home = browser.new_tab()?;
        home.set_default_timeout(navigation);
        Ok(Self {
            browser,
            home,
            navigation,
        })
    }

    pub fn navigate_home(&self, url: &str) -> anyhow::Result<()> {
        self.home.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn navigate(&self, tab: &Tab, url: &str) -> anyhow::Result<()> {
        tab.set_default_timeout(self.navigation);
        tab.navigate_to(url)?.wait_until_navigated()?;
        tab.bring_to_front()?;
        Ok(())
    }
}

impl TabHost for ChromeTabs {
    type Tab = Arc<Tab>;

    fn home(&self) -> &Arc<Tab> {
        &self.home
    }

    fn open(&self, url: &str) -> anyhow::Result<Arc<Tab>> {
        let tab = self.browser.new_tab()?;
        if let Err(e) = self.navigate(&tab, url) {
            debug!("Closing the tab for {url} after a failed navigation");
            release(self, &tab);
            return Err(e);
        }
        Ok(tab)
    }

    fn close(&self, tab: &Arc<Tab>) -> anyhow::Result<()> {
        tab.close(true)?;
        Ok(())
    }

    fn focus_home(&self) -> anyhow::Result<()> {
        self.home.bring_to_front()?;
        Ok(())
    }
}
