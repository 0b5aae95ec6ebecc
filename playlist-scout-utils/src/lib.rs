#[macro_use]
pub mod macros;

pub mod fs_util;
pub mod selector;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use regex::Regex;
    pub use scraper::Selector;
}
