//! Bounded-concurrency batch executor
//!
//! Every target runs in its own task. Two limits apply:
//! - `max_workers` caps the tasks in flight, including those still queued
//!   for a handler slot
//! - `max_concurrent_handlers` caps the handlers alive at once; a task builds
//!   its handler only after taking a slot and drops it before giving it back
//!
//! A failing, panicking or unresolvable target is logged and recorded as
//! `false`. Nothing a handler does can abort the batch.

use crate::config::{validate_executor_config, ExecutorConfig};
use crate::dispatch::{RateCalculator, Registry};
use crate::url::parse_target;
use crate::HarvestError;
use futures::FutureExt;
use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};
use url::Url;

/// Outcome per distinct input target
pub type ResultMap = HashMap<String, bool>;

/// Runs targets through their handlers under bounded concurrency
#[derive(Debug)]
pub struct Executor {
    registry: Arc<Registry>,
    max_concurrent_handlers: usize,
    max_workers: usize,
}

impl Executor {
    /// Creates an executor over `registry`
    ///
    /// # Returns
    ///
    /// * `Ok(Executor)` - Ready to run batches
    /// * `Err(HarvestError::Config)` - The limits are unusable
    pub fn new(registry: Arc<Registry>, config: &ExecutorConfig) -> Result<Self, HarvestError> {
        validate_executor_config(config)?;

        Ok(Self {
            registry,
            max_concurrent_handlers: config.max_concurrent_handlers,
            max_workers: config.max_workers,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Processes every target and reports success per target
    ///
    /// Duplicate targets are processed once, including inputs that differ
    /// only in surrounding whitespace; each input still gets its own entry
    /// carrying the shared outcome. Malformed targets are recorded
    /// as `false` without being dispatched. Results are collected in
    /// completion order; the returned map has exactly one entry per distinct
    /// input target.
    pub async fn run<T: AsRef<str>>(&self, targets: &[T]) -> ResultMap {
        let mut results = ResultMap::with_capacity(targets.len());
        let mut seen = HashSet::new();
        let mut aliases: HashMap<Url, Vec<String>> = HashMap::new();
        let mut pending = Vec::new();

        for raw in targets {
            let raw = raw.as_ref();
            if !seen.insert(raw.to_string()) {
                debug!(url = %raw, "Skipping duplicate target");
                continue;
            }

            match parse_target(raw) {
                Ok(url) => match aliases.entry(url.clone()) {
                    Entry::Occupied(mut inputs) => {
                        debug!(url = %raw, "Target already queued as '{}'", inputs.get()[0]);
                        inputs.get_mut().push(raw.to_string());
                    }
                    Entry::Vacant(inputs) => {
                        inputs.insert(vec![raw.to_string()]);
                        pending.push(url);
                    }
                },
                Err(e) => {
                    error!(url = %raw, "Rejected malformed target: {}", e);
                    results.insert(raw.to_string(), false);
                }
            }
        }

        let total = pending.len();
        info!(
            "Dispatching {} targets ({} handlers, {} workers)",
            total, self.max_concurrent_handlers, self.max_workers
        );

        let handler_slots = Arc::new(Semaphore::new(self.max_concurrent_handlers));
        let mut tasks = JoinSet::new();
        let mut rate = RateCalculator::new();

        for url in pending {
            while tasks.len() >= self.max_workers {
                match tasks.join_next().await {
                    Some(joined) => collect(joined, &aliases, &mut results, &mut rate, total),
                    None => break,
                }
            }

            let registry = Arc::clone(&self.registry);
            let slots = Arc::clone(&handler_slots);
            tasks.spawn(async move {
                let succeeded = run_target(registry, slots, url.clone()).await;
                (url, succeeded)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            collect(joined, &aliases, &mut results, &mut rate, total);
        }

        for key in seen {
            results.entry(key).or_insert(false);
        }

        results
    }
}

/// Records one finished task under every input that named it and logs throughput
fn collect(
    joined: Result<(Url, bool), JoinError>,
    aliases: &HashMap<Url, Vec<String>>,
    results: &mut ResultMap,
    rate: &mut RateCalculator,
    total: usize,
) {
    match joined {
        Ok((url, succeeded)) => {
            for key in aliases.get(&url).into_iter().flatten() {
                results.insert(key.clone(), succeeded);
            }
        }
        Err(e) => error!("Task ended abnormally: {}", e),
    }

    let completed = rate.record_completion();
    info!(
        "Completed {}/{} targets ({:.2} items/minute)",
        completed,
        total,
        rate.rate()
    );
}

/// Resolves and runs the handler for one target
async fn run_target(registry: Arc<Registry>, slots: Arc<Semaphore>, target: Url) -> bool {
    let _slot = match slots.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!(url = %target, "Handler slots unavailable: {}", e);
            return false;
        }
    };

    let outcome = AssertUnwindSafe(async {
        let mut handler = registry.resolve(&target)?;
        debug!(url = %target, kind = %handler.kind(), "Handler started");
        handler.process(&target).await?;
        Ok::<(), HarvestError>(())
    })
    .catch_unwind()
    .await;

    match outcome {
        Ok(Ok(())) => {
            info!(url = %target, "Target succeeded");
            true
        }
        Ok(Err(e)) => {
            error!(url = %target, "Target failed: {}", e);
            false
        }
        Err(panic) => {
            error!(url = %target, "Handler panicked: {}", panic_message(panic.as_ref()));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
