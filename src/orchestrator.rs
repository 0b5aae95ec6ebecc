//! Runs the extractor over every discovered class.
//!
//! A class that cannot be read ends up with an empty playlist; it never aborts the
//! others and never disappears from the table.

use std::sync::Arc;

use itertools::Itertools;
use log::{info, warn};
use tokio::{sync::Semaphore, task::spawn_blocking};

use crate::{
    config::Timeouts,
    extractor::{self, Mode},
    schema::{ClassUrl, Playlist, PlaylistTable},
    session::{Launcher, Session},
};

/// What happened to one class.
#[derive(Debug)]
pub enum FetchOutcome {
    Extracted(Playlist),
    Failed(anyhow::Error),
}
impl FetchOutcome {
    /// Failures collapse to an empty playlist, indistinguishable from a class that
    /// really has none.
    pub fn into_playlist(self) -> Playlist {
        match self {
            Self::Extracted(playlist) => playlist,
            Self::Failed(_) => Playlist::default(),
        }
    }
}

/// Fetches every class in its own session, at most `workers` at a time.
pub async fn fetch_all<L: Launcher>(
    launcher: Arc<L>,
    classes: Vec<ClassUrl>,
    workers: usize,
    timeouts: Arc<Timeouts>,
) -> PlaylistTable {
    info!(
        "Extracting playlists from {} classes with {workers} workers",
        classes.len()
    );
    let semaphore = Arc::new(Semaphore::new(workers));
    let tasks = classes
        .into_iter()
        .map(|class| {
            let semaphore = Arc::clone(&semaphore);
            let launcher = Arc::clone(&launcher);
            let timeouts = Arc::clone(&timeouts);
            let task_class = class.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let outcome = spawn_blocking(move || fetch_one(&*launcher, &task_class, &timeouts))
                    .await?;
                anyhow::Ok(outcome)
            });
            (class, handle)
        })
        .collect_vec();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (class, handle) in tasks {
        let outcome = match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => FetchOutcome::Failed(e),
            Err(e) => FetchOutcome::Failed(e.into()),
        };
        outcomes.push((class, outcome));
    }
    assemble(outcomes)
}

/// Launches a session for `class`, extracts, and tears the session down again.
pub fn fetch_one<L: Launcher>(launcher: &L, class: &ClassUrl, timeouts: &Timeouts) -> FetchOutcome {
    let result = launcher.launch().and_then(|mut session| {
        session.visit(class.as_str(), |page| {
            extractor::extract(page, Mode::Public, timeouts)
        })
    });
    match result {
        Ok(playlist) => FetchOutcome::Extracted(playlist),
        Err(e) => FetchOutcome::Failed(e),
    }
}

/// Visits every class in order through one shared session.
pub fn walk_all<S: Session>(
    session: &mut S,
    classes: &[ClassUrl],
    timeouts: &Timeouts,
) -> PlaylistTable {
    let mut outcomes = Vec::with_capacity(classes.len());
    for (i, class) in classes.iter().enumerate() {
        info!("Class {} - Extracting playlist from {class}", i + 1);
        let outcome = match session.visit(class.as_str(), |page| {
            extractor::extract(page, Mode::Member, timeouts)
        }) {
            Ok(playlist) => FetchOutcome::Extracted(playlist),
            Err(e) => FetchOutcome::Failed(e),
        };
        outcomes.push((class.clone(), outcome));
    }
    assemble(outcomes)
}

fn assemble(outcomes: Vec<(ClassUrl, FetchOutcome)>) -> PlaylistTable {
    let total = outcomes.len();
    let mut failed = 0;
    let table = outcomes
        .into_iter()
        .map(|(class, outcome)| {
            if let FetchOutcome::Failed(e) = &outcome {
                warn!("Error with {class}: {e:#}");
                failed += 1;
            }
            (class, outcome.into_playlist())
        })
        .collect::<PlaylistTable>();
    if failed > 0 {
        warn!("{failed} of {total} classes could not be read");
    }
    table
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread::sleep,
        time::Duration,
    };

    use itertools::Itertools;

    use crate::{
        config::Timeouts,
        page::snapshot::SnapshotPage,
        schema::{ClassUrl, Playlist, Song},
        session::{
            shared::{tests::FakeTabs, SharedSession},
            Launcher, Session,
        },
    };

    use super::{fetch_all, walk_all};

    fn class_html(i: usize) -> String {
        format!(
            r#"<p id="song-title-0">Song{i}</p><p id="song-artists-0">Artist{i}</p>
            <p id="song-title-1">Encore</p><p id="song-artists-1">Band</p>"#
        )
    }

    fn url(i: usize) -> ClassUrl {
        ClassUrl::from(format!("https://www.onepeloton.com/classes/cycling/20-min-ride-{i}"))
    }

    #[derive(Default)]
    struct Counters {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        live_sessions: AtomicUsize,
    }

    /// Serves `class_html` for every URL, except that the launch fails for URLs
    /// containing "broken" and the extraction panics for URLs containing "panic".
    struct FakeLauncher {
        counters: Arc<Counters>,
        delay: Duration,
    }

    struct FakeSession {
        counters: Arc<Counters>,
        delay: Duration,
    }

    impl Launcher for FakeLauncher {
        type Session = FakeSession;

        fn launch(&self) -> anyhow::Result<FakeSession> {
            self.counters.live_sessions.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                counters: Arc::clone(&self.counters),
                delay: self.delay,
            })
        }
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.counters.live_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl Session for FakeSession {
        type Page = SnapshotPage;

        fn visit<R>(&mut self, url: &str, f: impl FnOnce(&SnapshotPage) -> R) -> anyhow::Result<R> {
            if url.contains("broken") {
                anyhow::bail!("net::ERR_CONNECTION_RESET");
            }
            let _in_flight = InFlight::enter(&self.counters);
            sleep(self.delay);
            if url.contains("panic") {
                panic!("tab crashed");
            }
            let i = url.rsplit('-').next().unwrap().parse().unwrap_or(0);
            Ok(f(&SnapshotPage::new(&class_html(i), url)))
        }
    }

    struct InFlight<'a>(&'a Counters);
    impl<'a> InFlight<'a> {
        fn enter(counters: &'a Counters) -> Self {
            let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            counters.peak.fetch_max(now, Ordering::SeqCst);
            Self(counters)
        }
    }
    impl Drop for InFlight<'_> {
        fn drop(&mut self) {
            self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn launcher(counters: &Arc<Counters>, delay: Duration) -> Arc<FakeLauncher> {
        Arc::new(FakeLauncher {
            counters: Arc::clone(counters),
            delay,
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let counters = Arc::new(Counters::default());
        let classes = (0..12).map(url).collect_vec();
        let table = fetch_all(
            launcher(&counters, Duration::from_millis(50)),
            classes.clone(),
            5,
            Arc::new(Timeouts::default()),
        )
        .await;
        assert_eq!(table.len(), 12);
        let peak = counters.peak.load(Ordering::SeqCst);
        assert!(peak <= 5, "peak was {peak}");
        assert!(peak >= 2, "peak was {peak}");
        assert_eq!(counters.live_sessions.load(Ordering::SeqCst), 0);
        for (i, class) in classes.iter().enumerate() {
            assert_eq!(
                table.get(class).unwrap().songs(),
                [Song::new(format!("Song{i}"), format!("Artist{i}")), Song::new("Encore", "Band")]
            );
        }
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty() {
        let counters = Arc::new(Counters::default());
        let broken = ClassUrl::from("https://www.onepeloton.com/classes/cycling/broken-1");
        let panicking = ClassUrl::from("https://www.onepeloton.com/classes/cycling/panic-2");
        let classes = vec![url(0), broken.clone(), panicking.clone(), url(3)];
        let table = fetch_all(
            launcher(&counters, Duration::ZERO),
            classes,
            2,
            Arc::new(Timeouts::default()),
        )
        .await;
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&broken), Some(&Playlist::default()));
        assert_eq!(table.get(&panicking), Some(&Playlist::default()));
        assert_eq!(table.get(&url(3)).unwrap().len(), 2);
        assert_eq!(counters.live_sessions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_walk_is_sequential_and_complete() {
        let member = |i| format!("https://members.onepeloton.com/classes/cycling?modal=classDetailsModal&classId={i}");
        let pages = [
            (member(1), r#"<li data-test-id="playlistSong"><strong>Hold On</strong><span>Drake</span></li>"#.to_owned()),
            (member(3), "<p>No playlist for this class</p>".to_owned()),
        ];
        let mut session = SharedSession::new(
            FakeTabs::with_pages(pages.iter().map(|(url, html)| (url.as_str(), html.as_str()))),
            Duration::ZERO,
        );
        let classes = [member(3), member(2), member(1)].map(ClassUrl::from);
        let timeouts = Timeouts {
            member_rows: Duration::ZERO,
            ..Default::default()
        };
        let table = walk_all(&mut session, &classes, &timeouts);

        assert_eq!(*session.host().opened.borrow(), [member(3), member(2), member(1)]);
        assert!(session.host().open.borrow().is_empty());
        assert_eq!(table.len(), 3);
        assert!(table.get(&classes[0]).unwrap().is_empty());
        assert!(table.get(&classes[1]).unwrap().is_empty());
        assert_eq!(
            table.get(&classes[2]).unwrap().songs(),
            [Song::new("Hold On", "Drake")]
        );
    }
}
