use std::{sync::Arc, time::Duration};

use headless_chrome::{Browser, Tab};
use log::debug;

use crate::{config::BrowserConfig, extractor::Mode};

use super::{launch_options, Launcher, Session};

/// Launches a fresh headless Chrome for every session.
pub struct ChromeLauncher {
    browser: BrowserConfig,
    navigation: Duration,
}

impl ChromeLauncher {
    pub fn new(browser: BrowserConfig, navigation: Duration) -> Self {
        Self {
            browser,
            navigation,
        }
    }
}

impl Launcher for ChromeLauncher {
    type Session = IsolatedSession;

    fn launch(&self) -> anyhow::Result<IsolatedSession> {
        let browser = Browser::new(launch_options(&self.browser, Mode::Public)?)?;
        debug!("Launched a headless browser");
        Ok(IsolatedSession {
            browser,
            navigation: self.navigation,
        })
    }
}

/// A browser process owned by a single task.  The process is killed when this is
/// dropped.
pub struct IsolatedSession {
    browser: Browser,
    navigation: Duration,
}

impl Session for IsolatedSession {
    type Page = Arc<Tab>;

    fn visit<R>(&mut self, url: &str, f: impl FnOnce(&Arc<Tab>) -> R) -> anyhow::Result<R> {
        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(self.navigation);
        tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(f(&tab))
    }
}
