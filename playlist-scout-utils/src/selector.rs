use anyhow::anyhow;
use scraper::{ElementRef, Selector};

/// Parses a selector that is only known at runtime, e.g. one containing an index.
pub fn parse_selector(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector {selector:?}: {e:?}"))
}

/// Visible text of an element with surrounding whitespace removed.
pub fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{parse_selector, trimmed_text};

    #[test]
    fn test_parse_selector() {
        assert!(parse_selector("#song-title-3").is_ok());
        assert!(parse_selector("li[data-test-id='playlistSong']").is_ok());
        assert!(parse_selector("##").is_err());
    }

    #[test]
    fn test_trimmed_text() {
        let html = Html::parse_fragment("<p id='x'>\n  Levitating <b>(Remix)</b>  </p>");
        let element = html.select(selector!("#x")).next().unwrap();
        assert_eq!(trimmed_text(element), "Levitating (Remix)");
    }
}
