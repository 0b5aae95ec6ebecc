/// A `&'static scraper::Selector` compiled once from a literal.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use $crate::__private::{Lazy, Selector};
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($e).unwrap());
        &*SELECTOR
    }};
}

/// A `&'static regex::Regex` compiled once from a literal.
#[macro_export]
macro_rules! regex {
    ($e: expr) => {{
        use $crate::__private::{Lazy, Regex};
        static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new($e).unwrap());
        &*PATTERN
    }};
}
