//! Integration tests for listing crawls
//!
//! These tests use wiremock to serve newspaper listings and run the G1
//! crawler through the executor end-to-end.

use news_harvester::browser::HttpSessionFactory;
use news_harvester::config::{Config, PaginationConfig};
use news_harvester::dispatch::Registry;
use news_harvester::pipeline::run_stage;
use news_harvester::sites::{register_crawler, Band, HarvestContext, G1};
use news_harvester::storage::{share, with_store, RunKind, SqliteStore};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRST_PAGE: &str = r#"<html><body>
    <header><a href="/">Início do portal</a></header>
    <main>
        <a href="/economia/noticia/2024/05/06/governo-anuncia-medidas.ghtml">Governo anuncia medidas para o crédito</a>
        <a href="/politica/noticia/2024/05/06/congresso-vota-reforma.ghtml?utm_source=home">Congresso vota reforma</a>
        <div class="load-more"><a href="/ultimas-noticias/index/feed/pagina-2.ghtml">Veja mais</a></div>
    </main>
    <footer><a href="/sobre">Sobre o g1</a></footer>
</body></html>"#;

const SECOND_PAGE: &str = r#"<html><body>
    <main>
        <a href="/mundo/noticia/2024/05/07/eleicoes-na-europa.ghtml">Eleições na Europa</a>
    </main>
    <footer></footer>
</body></html>"#;

fn test_config() -> Config {
    Config {
        pagination: PaginationConfig {
            scroll_limit: None,
            max_retries: 1,
            max_repeated_pages: 2,
            element_wait_secs: 1,
            crawl_timeout_secs: 30,
            settle_delay_ms: 0,
        },
        ..Config::default()
    }
}

fn test_context() -> HarvestContext {
    let config = test_config();
    let sessions = Arc::new(HttpSessionFactory::new(&config.browser));
    HarvestContext::new(config, share(SqliteStore::in_memory().unwrap()), sessions)
}

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn crawler_registry(ctx: &HarvestContext, server: &MockServer) -> Arc<Registry> {
    let mut registry = Registry::new();
    register_crawler(&mut registry, ctx, &server.uri(), G1).unwrap();
    Arc::new(registry)
}

#[tokio::test]
async fn test_crawl_follows_load_more_and_stores_links() {
    let server = MockServer::start().await;
    serve(&server, "/ultimas-noticias/", FIRST_PAGE).await;
    serve(&server, "/ultimas-noticias/index/feed/pagina-2.ghtml", SECOND_PAGE).await;

    let ctx = test_context();
    let listing = format!("{}/ultimas-noticias/", server.uri());
    let summary = run_stage(
        &ctx,
        crawler_registry(&ctx, &server),
        RunKind::Crawl,
        "test-hash",
        &[listing.clone()],
    )
    .await
    .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.statuses[&listing], true);

    let urls: Vec<String> = with_store(&ctx.store, |store| store.list_links())
        .unwrap()
        .into_iter()
        .map(|link| link.url)
        .collect();

    let base = server.uri();
    for expected in [
        format!("{}/economia/noticia/2024/05/06/governo-anuncia-medidas.ghtml", base),
        format!("{}/politica/noticia/2024/05/06/congresso-vota-reforma.ghtml", base),
        format!("{}/mundo/noticia/2024/05/07/eleicoes-na-europa.ghtml", base),
    ] {
        assert!(urls.contains(&expected), "missing {} in {:?}", expected, urls);
    }
    assert!(!urls.iter().any(|url| url.ends_with("/sobre")));
    assert!(!urls.iter().any(|url| url.contains("utm_source")));
}

#[tokio::test]
async fn test_failed_listing_does_not_stall_batch() {
    let server = MockServer::start().await;
    serve(&server, "/ultimas-noticias/", FIRST_PAGE).await;
    serve(&server, "/ultimas-noticias/index/feed/pagina-2.ghtml", SECOND_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/fora-do-ar/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctx = test_context();
    let good = format!("{}/ultimas-noticias/", server.uri());
    let broken = format!("{}/fora-do-ar/", server.uri());
    let unregistered = "https://unregistered.example/ultimas/".to_string();

    let summary = run_stage(
        &ctx,
        crawler_registry(&ctx, &server),
        RunKind::Crawl,
        "test-hash",
        &[good.clone(), broken.clone(), unregistered.clone()],
    )
    .await
    .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.statuses[&good], true);
    assert_eq!(summary.statuses[&broken], false);
    assert_eq!(summary.statuses[&unregistered], false);

    let runs = with_store(&ctx.store, |store| store.latest_runs(5)).unwrap();
    assert_eq!(runs.len(), 1);
    let totals = runs[0].totals.as_ref().unwrap();
    assert_eq!(totals.total, 3);
    assert_eq!(totals.succeeded, 1);
    assert_eq!(totals.failed, 2);
    assert!(totals.statuses_json.contains("\"fail\""));
}

#[tokio::test]
async fn test_listing_without_links_fails() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/vazio/",
        "<html><body><main><p>Nada aqui</p></main><footer></footer></body></html>",
    )
    .await;

    let ctx = test_context();
    let listing = format!("{}/vazio/", server.uri());
    let summary = run_stage(
        &ctx,
        crawler_registry(&ctx, &server),
        RunKind::Crawl,
        "test-hash",
        &[listing.clone()],
    )
    .await
    .unwrap();

    assert_eq!(summary.statuses[&listing], false);
    assert_eq!(with_store(&ctx.store, |store| store.count_links()).unwrap(), 0);
}

#[tokio::test]
async fn test_scripted_load_more_keeps_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ultimas/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <main>
                    <a href="/noticias/chuvas-atingem-o-sul-do-pais">Chuvas atingem o Sul do país</a>
                    <button class="cs-load-more" data-page="2">Carregar mais</button>
                </main>
                <footer></footer>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = test_context();
    let mut registry = Registry::new();
    register_crawler(&mut registry, &ctx, &server.uri(), Band).unwrap();

    let listing = format!("{}/ultimas/", server.uri());
    let summary = run_stage(
        &ctx,
        Arc::new(registry),
        RunKind::Crawl,
        "test-hash",
        &[listing.clone()],
    )
    .await
    .unwrap();

    assert_eq!(summary.statuses[&listing], true);
    let links = with_store(&ctx.store, |store| store.list_links()).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(
        links[0].url,
        format!("{}/noticias/chuvas-atingem-o-sul-do-pais", server.uri())
    );
}
