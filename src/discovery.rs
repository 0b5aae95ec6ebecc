//! Finds the class pages to visit.

use anyhow::Context;
use itertools::Itertools;
use log::{debug, info};
use playlist_scout_utils::{regex, selector};
use scraper::Html;
use url::Url;

use crate::{
    config::Timeouts,
    error::RunError,
    page::Page,
    schema::ClassUrl,
    session::Session,
    site::{self, DurationBucket},
};

/// Visits the public listing for `bucket` and returns up to `max` distinct class URLs
/// in the order they appear.
pub fn discover_public<S: Session>(
    session: &mut S,
    bucket: DurationBucket,
    timeouts: &Timeouts,
    max: usize,
) -> Result<Vec<ClassUrl>, RunError> {
    let url = bucket.listing_url();
    info!("Looking for {bucket} classes at {url}");
    session
        .visit(&url, |page| collect_public_classes(page, timeouts, max))
        .and_then(|classes| classes)
        .map_err(|source| RunError::Discovery { url, source })
}

pub fn collect_public_classes<P: Page>(
    page: &P,
    timeouts: &Timeouts,
    max: usize,
) -> anyhow::Result<Vec<ClassUrl>> {
    page.wait_for(site::ANCHOR, timeouts.listing)
        .context("The listing did not render any link")?;
    let html = page.snapshot()?;
    Ok(public_class_links(&html, base_url(page).as_ref(), max))
}

pub fn public_class_links(html: &Html, base: Option<&Url>, max: usize) -> Vec<ClassUrl> {
    hrefs(html, selector!(site::ANCHOR), base)
        .filter(|href| regex!(site::CLASS_DETAIL_URL_PATTERN).is_match(href))
        .unique()
        .take(max)
        .map(ClassUrl::from)
        .collect()
}

/// Collects classes from the logged-in listing shown in `home`.
///
/// `wait_for_login` blocks until the user has logged in by hand.  The listing is
/// taken as is: first `max` entries in page order, without deduplication.
pub fn discover_member<P: Page>(
    home: &P,
    wait_for_login: impl FnOnce() -> anyhow::Result<()>,
    timeouts: &Timeouts,
    max: usize,
) -> Result<Vec<ClassUrl>, RunError> {
    let url = home.url();
    wait_for_login()
        .and_then(|()| collect_member_classes(home, timeouts, max))
        .map_err(|source| RunError::Discovery { url, source })
}

pub fn collect_member_classes<P: Page>(
    page: &P,
    timeouts: &Timeouts,
    max: usize,
) -> anyhow::Result<Vec<ClassUrl>> {
    match page.click(site::COOKIE_CONSENT_BUTTON, timeouts.cookie_banner) {
        Ok(()) => info!("Accepted the cookie banner"),
        Err(e) => {
            info!("No cookie banner found");
            debug!("{e:#}");
        }
    }
    page.wait_for(site::MEMBER_CLASS_ANCHOR, timeouts.member_listing)
        .context("No class appeared in the listing")?;
    let html = page.snapshot()?;
    Ok(member_class_links(&html, base_url(page).as_ref(), max))
}

pub fn member_class_links(html: &Html, base: Option<&Url>, max: usize) -> Vec<ClassUrl> {
    hrefs(html, selector!(site::MEMBER_CLASS_ANCHOR), base)
        .take(max)
        .map(ClassUrl::from)
        .collect()
}

fn base_url<P: Page>(page: &P) -> Option<Url> {
    Url::parse(&page.url()).ok()
}

/// Absolute `href`s of the matching elements.  Missing or unparsable ones are skipped.
fn hrefs<'a>(
    html: &'a Html,
    selector: &'a scraper::Selector,
    base: Option<&'a Url>,
) -> impl Iterator<Item = String> + 'a {
    html.select(selector).filter_map(move |anchor| {
        let href = anchor.value().attr("href")?;
        let url = match base {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        match url {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!("Skipping href {href:?}: {e}");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        config::Timeouts,
        error::RunError,
        page::snapshot::SnapshotPage,
        schema::ClassUrl,
        session::{shared::tests::FakeTabs, shared::SharedSession},
        site::DurationBucket,
    };

    use super::{discover_member, discover_public};

    const LISTING: &str = "https://www.onepeloton.com/classes/cycling/15-20mins";

    fn class(i: usize) -> String {
        format!("https://www.onepeloton.com/classes/cycling/20-min-pop-ride-with-instructor-{i:04}abcd")
    }

    fn listing_session(body: &str) -> SharedSession<FakeTabs> {
        SharedSession::new(
            FakeTabs::with_pages([(LISTING, body)]),
            std::time::Duration::ZERO,
        )
    }

    #[test]
    fn test_public_filters_and_deduplicates() {
        let body = format!(
            r#"<a href="{a}">A</a>
            <a>no href</a>
            <a href="/classes/cycling/20-min-pop-ride-with-instructor-0002abcd">relative</a>
            <a href="{a}">A again</a>
            <a href="https://www.onepeloton.com/classes/cycling/5-10mins">filter</a>
            <a href="https://www.onepeloton.com/shop">shop</a>
            <a href="{b}">B</a>"#,
            a = class(1),
            b = class(3),
        );
        let mut session = listing_session(&body);
        let classes = discover_public(
            &mut session,
            DurationBucket::FifteenToTwenty,
            &Timeouts::default(),
            10,
        )
        .unwrap();
        assert_eq!(
            classes,
            [class(1), class(2), class(3)].map(ClassUrl::from)
        );
    }

    #[test]
    fn test_public_is_capped() {
        let body = (0..15)
            .map(|i| format!(r#"<a href="{}">{i}</a>"#, class(i)))
            .join("\n");
        let mut session = listing_session(&body);
        let classes = discover_public(
            &mut session,
            DurationBucket::FifteenToTwenty,
            &Timeouts::default(),
            10,
        )
        .unwrap();
        assert_eq!(classes, (0..10).map(|i| ClassUrl::from(class(i))).collect_vec());
    }

    #[test]
    fn test_public_without_anchors_is_fatal() {
        let mut session = listing_session("<p>Please enable JavaScript</p>");
        let result = discover_public(
            &mut session,
            DurationBucket::FifteenToTwenty,
            &Timeouts::default(),
            10,
        );
        assert!(matches!(result, Err(RunError::Discovery { url, .. }) if url == LISTING));
    }

    #[test]
    fn test_member_keeps_page_order() {
        let body = (0..12)
            .map(|i| {
                format!(
                    r#"<a href="/classes/cycling?modal=classDetailsModal&classId={}">{i}</a>"#,
                    i % 4
                )
            })
            .join("\n");
        let home = SnapshotPage::new(
            &format!(
                r#"<button id="onetrust-accept-btn-handler">OK</button><a href="/profile">me</a>{body}"#
            ),
            "https://members.onepeloton.com/classes/cycling",
        );
        let mut logged_in = false;
        let classes = discover_member(
            &home,
            || {
                logged_in = true;
                Ok(())
            },
            &Timeouts::default(),
            10,
        )
        .unwrap();
        assert!(logged_in);
        assert_eq!(home.clicked(), ["#onetrust-accept-btn-handler"]);
        assert_eq!(classes.len(), 10);
        assert_eq!(
            classes[5],
            ClassUrl::from(
                "https://members.onepeloton.com/classes/cycling?modal=classDetailsModal&classId=1"
            )
        );
    }

    #[test]
    fn test_member_without_classes_is_fatal() {
        let home = SnapshotPage::new("<p>Log in</p>", "https://members.onepeloton.com/");
        let result = discover_member(&home, || Ok(()), &Timeouts::default(), 10);
        assert!(matches!(result, Err(RunError::Discovery { .. })));
    }
}
