//! Navigation contexts that hand a rendered page to the extractor.

pub mod isolated;
pub mod shared;

use std::ffi::OsStr;

use headless_chrome::{LaunchOptions, LaunchOptionsBuilder};

use crate::{config::BrowserConfig, extractor::Mode, page::Page};

pub trait Session {
    type Page: Page;

    /// Opens `url` and passes the rendered page to `f`.  Whatever the visit opened is
    /// released before this returns, including when `f` panics.
    fn visit<R>(&mut self, url: &str, f: impl FnOnce(&Self::Page) -> R) -> anyhow::Result<R>;
}

/// Starts independent sessions, one per concurrent task.
pub trait Launcher: Send + Sync + 'static {
    type Session: Session;

    fn launch(&self) -> anyhow::Result<Self::Session>;
}

pub fn launch_options(config: &BrowserConfig, mode: Mode) -> anyhow::Result<LaunchOptions<'static>> {
    let mut args = vec![OsStr::new("--disable-gpu")];
    let (headless, port, window_size) = match mode {
        // Several of these run at once, so they cannot share a debugging port.
        Mode::Public => (true, None, None),
        Mode::Member => {
            args.push(OsStr::new("--disable-blink-features=AutomationControlled"));
            (false, config.remote_debugging_port, config.member_window_size)
        }
    };
    Ok(LaunchOptionsBuilder::default()
        .headless(headless)
        .sandbox(false)
        .path(config.path.clone())
        .port(port)
        .window_size(window_size)
        .idle_browser_timeout(config.idle_timeout)
        .args(args)
        .build()?)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use crate::{config::BrowserConfig, extractor::Mode};

    use super::launch_options;

    fn config() -> BrowserConfig {
        BrowserConfig {
            remote_debugging_port: Some(9222),
            member_window_size: Some((1280, 2000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_public_launch_options() {
        let options = launch_options(&config(), Mode::Public).unwrap();
        assert!(options.headless);
        assert!(!options.sandbox);
        assert_eq!(options.args, [OsStr::new("--disable-gpu")]);
        assert_eq!(options.port, None);
        assert_eq!(options.window_size, None);
    }

    #[test]
    fn test_member_launch_options() {
        let options = launch_options(&config(), Mode::Member).unwrap();
        assert!(!options.headless);
        assert!(!options.sandbox);
        assert_eq!(
            options.args,
            [
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ]
        );
        assert_eq!(options.port, Some(9222));
        assert_eq!(options.window_size, Some((1280, 2000)));
    }
}
