//! Integration tests for dispatch and bounded execution

use async_trait::async_trait;
use news_harvester::config::ExecutorConfig;
use news_harvester::dispatch::{Executor, Registry, RegistryError};
use news_harvester::handler::{Handler, HandlerError, HandlerKind};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// In-memory log sink for a `tracing-subscriber` fmt layer
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Tracks how many handlers are alive and the highest count seen
#[derive(Default)]
struct LiveCounter {
    live: AtomicUsize,
    peak: AtomicUsize,
    created: AtomicUsize,
}

impl LiveCounter {
    fn enter(&self) {
        self.created.fetch_add(1, Ordering::SeqCst);
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handler whose behavior depends on the target path
///
/// `/fail` returns an error, `/panic` panics, anything else succeeds after `delay`.
struct ScriptedHandler {
    counter: Arc<LiveCounter>,
    delay: Duration,
}

impl ScriptedHandler {
    fn new(counter: Arc<LiveCounter>, delay: Duration) -> Self {
        counter.enter();
        Self { counter, delay }
    }
}

impl Drop for ScriptedHandler {
    fn drop(&mut self) {
        self.counter.leave();
    }
}

#[async_trait]
impl Handler for ScriptedHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Crawler
    }

    async fn process(&mut self, target: &Url) -> Result<(), HandlerError> {
        tokio::time::sleep(self.delay).await;
        match target.path() {
            "/fail" => Err(HandlerError::EmptyPage(target.to_string())),
            "/panic" => panic!("injected fault for {}", target),
            _ => Ok(()),
        }
    }
}

fn register(registry: &mut Registry, site: &str, counter: &Arc<LiveCounter>, delay: Duration) {
    let counter = Arc::clone(counter);
    registry
        .register(site, move || {
            Ok(Box::new(ScriptedHandler::new(Arc::clone(&counter), delay)) as Box<dyn Handler>)
        })
        .unwrap();
}

fn executor(registry: Registry, handlers: usize, workers: usize) -> Executor {
    let config = ExecutorConfig {
        max_concurrent_handlers: handlers,
        max_workers: workers,
    };
    Executor::new(Arc::new(registry), &config).unwrap()
}

#[tokio::test]
async fn test_every_target_gets_a_result() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::ZERO);
    register(&mut registry, "https://b.example/", &counter, Duration::ZERO);

    let targets: Vec<String> = (0..20)
        .map(|i| {
            let site = if i % 2 == 0 { "a" } else { "b" };
            format!("https://{}.example/article-{}", site, i)
        })
        .collect();

    let results = executor(registry, 3, 5).run(&targets).await;

    assert_eq!(results.len(), targets.len());
    for target in &targets {
        assert_eq!(results.get(target), Some(&true), "missing {}", target);
    }
    assert_eq!(counter.created.load(Ordering::SeqCst), targets.len());
    assert_eq!(counter.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failures_and_panics_are_isolated() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::from_millis(5));

    let targets = [
        "https://a.example/one",
        "https://a.example/fail",
        "https://a.example/panic",
        "https://a.example/two",
    ];
    let results = executor(registry, 2, 4).run(&targets).await;

    assert_eq!(results.len(), 4);
    assert!(results["https://a.example/one"]);
    assert!(results["https://a.example/two"]);
    assert!(!results["https://a.example/fail"]);
    assert!(!results["https://a.example/panic"]);
    assert_eq!(counter.live.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_live_handlers_never_exceed_limit() {
    for limit in [1usize, 2, 5] {
        let counter = Arc::new(LiveCounter::default());
        let mut registry = Registry::new();
        register(&mut registry, "https://a.example/", &counter, Duration::from_millis(20));

        let targets: Vec<String> = (0..15)
            .map(|i| format!("https://a.example/article-{}", i))
            .collect();
        let results = executor(registry, limit, 10).run(&targets).await;

        assert_eq!(results.len(), 15);
        assert!(results.values().all(|ok| *ok));

        let peak = counter.peak.load(Ordering::SeqCst);
        assert!(peak >= 1);
        assert!(peak <= limit, "peak {} exceeded limit {}", peak, limit);
        assert_eq!(counter.live.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_workers_below_handler_limit_still_bound_handlers() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::from_millis(10));

    let targets: Vec<String> = (0..8)
        .map(|i| format!("https://a.example/article-{}", i))
        .collect();
    let results = executor(registry, 4, 2).run(&targets).await;

    assert_eq!(results.len(), 8);
    assert!(counter.peak.load(Ordering::SeqCst) <= 2);
}

#[test]
fn test_one_handler_per_site() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::ZERO);

    let again = registry.register("https://A.example/other/path", || {
        Err(HandlerError::EmptyPage("never built".to_string()))
    });
    assert!(matches!(again, Err(RegistryError::DuplicateRegistration(_))));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_unregistered_site_fails_only_its_target() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::ZERO);
    register(&mut registry, "https://b.example/", &counter, Duration::ZERO);

    let targets = [
        "https://a.example/x",
        "https://b.example/y",
        "https://unknown.example/z",
    ];
    let results = executor(registry, 2, 2).run(&targets).await;

    assert_eq!(results.len(), 3);
    assert!(results["https://a.example/x"]);
    assert!(results["https://b.example/y"]);
    assert!(!results["https://unknown.example/z"]);
}

#[tokio::test]
async fn test_mixed_batch_end_to_end() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::ZERO);
    register(&mut registry, "https://b.example/", &counter, Duration::ZERO);

    let targets = [
        "https://a.example/news",
        "https://b.example/fail",
        "https://c.example/news",
    ];

    // Current-thread runtime: spawned tasks run on this thread and see the default subscriber.
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let results = executor(registry, 1, 1).run(&targets).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results["https://a.example/news"], true);
    assert_eq!(results["https://b.example/fail"], false);
    assert_eq!(results["https://c.example/news"], false);

    let outcome_lines: Vec<String> = logs
        .lines()
        .into_iter()
        .filter(|line| line.contains("Target succeeded") || line.contains("Target failed"))
        .collect();
    assert_eq!(outcome_lines.len(), 3, "{:#?}", outcome_lines);
    for target in targets {
        let matching = outcome_lines
            .iter()
            .filter(|line| line.contains(&format!("url={}", target)))
            .count();
        assert_eq!(matching, 1, "expected one outcome line for {}", target);
    }
    assert!(outcome_lines
        .iter()
        .any(|line| line.contains("ERROR") && line.contains("No handler registered")));
}

#[test]
fn test_resolution_builds_fresh_handlers() {
    let counter = Arc::new(LiveCounter::default());
    let mut registry = Registry::new();
    register(&mut registry, "https://a.example/", &counter, Duration::ZERO);

    let url = Url::parse("https://a.example/page").unwrap();
    let first = registry.resolve(&url).unwrap();
    let second = registry.resolve(&url).unwrap();

    assert_eq!(counter.created.load(Ordering::SeqCst), 2);
    assert_eq!(counter.live.load(Ordering::SeqCst), 2);
    drop(first);
    drop(second);
    assert_eq!(counter.live.load(Ordering::SeqCst), 0);
}
