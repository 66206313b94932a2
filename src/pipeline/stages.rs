use crate::dispatch::{Executor, Registry};
use crate::pipeline::RunSummary;
use crate::sites::{build_crawler_registry, build_scraper_registry, HarvestContext};
use crate::storage::{with_store, RunKind};
use crate::HarvestError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Crawls every listing in `newspapers` for article links
pub async fn crawl_links(
    ctx: &HarvestContext,
    config_hash: &str,
    newspapers: &[String],
) -> Result<RunSummary, HarvestError> {
    let registry = build_crawler_registry(ctx)?;
    run_stage(ctx, Arc::new(registry), RunKind::Crawl, config_hash, newspapers).await
}

/// Scrapes up to `max_articles` links that have no article yet
pub async fn scrape_articles(
    ctx: &HarvestContext,
    config_hash: &str,
    max_articles: usize,
) -> Result<RunSummary, HarvestError> {
    let pending = with_store(&ctx.store, |store| store.pending_links(max_articles))?;
    info!("Found {} links without an article", pending.len());

    let registry = build_scraper_registry(ctx)?;
    run_stage(ctx, Arc::new(registry), RunKind::Scrape, config_hash, &pending).await
}

/// Runs `targets` through `registry` and records the run
///
/// # Returns
///
/// * `Ok(RunSummary)` - The batch finished; individual targets may have failed
/// * `Err(HarvestError)` - The executor could not be built or the run could not be recorded
pub async fn run_stage(
    ctx: &HarvestContext,
    registry: Arc<Registry>,
    kind: RunKind,
    config_hash: &str,
    targets: &[String],
) -> Result<RunSummary, HarvestError> {
    let executor = Executor::new(registry, &ctx.config.executor)?;
    let run_id = with_store(&ctx.store, |store| store.create_run(kind, config_hash))?;

    let started = Instant::now();
    let results = executor.run(targets).await;
    let summary = RunSummary::new(kind, results, started.elapsed());

    let totals = summary.totals()?;
    with_store(&ctx.store, |store| store.complete_run(run_id, &totals))?;

    info!(
        run_id,
        "{} run finished: {} of {} succeeded in {:.1}s",
        kind.to_db_string(),
        summary.succeeded,
        summary.total,
        summary.elapsed.as_secs_f64()
    );
    if summary.failed > 0 {
        warn!("{} targets failed", summary.failed);
    }

    Ok(summary)
}
