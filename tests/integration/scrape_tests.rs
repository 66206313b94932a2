//! Integration tests for article scraping

use news_harvester::browser::HttpSessionFactory;
use news_harvester::config::Config;
use news_harvester::dispatch::Registry;
use news_harvester::pipeline::run_stage;
use news_harvester::sites::{register_scraper, HarvestContext, G1};
use news_harvester::storage::{share, with_store, RunKind, SqliteStore};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html><body>
    <h1 class="content-head__title">Governo anuncia medidas</h1>
    <h2 class="content-head__subtitle">Pacote inclui crédito para pequenas empresas</h2>
    <a class="multi_signatures" href="/autor">Por Ana Souza, g1</a>
    <time itemprop="datePublished" datetime="2024-05-06T14:30:00.000Z">06/05/2024</time>
    <div class="mc-article-body">
        <p>Primeiro parágrafo.</p>
        <p>Segundo parágrafo.</p>
    </div>
</body></html>"#;

const NO_TITLE: &str = r#"<html><body>
    <div class="mc-article-body"><p>Texto sem título.</p></div>
</body></html>"#;

fn test_context() -> HarvestContext {
    let config = Config::default();
    let sessions = Arc::new(HttpSessionFactory::new(&config.browser));
    HarvestContext::new(config, share(SqliteStore::in_memory().unwrap()), sessions)
}

#[tokio::test]
async fn test_scrape_stores_articles_and_records_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/economia/noticia/governo-anuncia-medidas.ghtml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/economia/noticia/sem-titulo.ghtml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NO_TITLE))
        .mount(&server)
        .await;

    let ctx = test_context();
    let mut registry = Registry::new();
    register_scraper(&mut registry, &ctx, &server.uri(), G1).unwrap();

    let good = format!("{}/economia/noticia/governo-anuncia-medidas.ghtml", server.uri());
    let untitled = format!("{}/economia/noticia/sem-titulo.ghtml", server.uri());
    let missing = format!("{}/economia/noticia/removida.ghtml", server.uri());

    let summary = run_stage(
        &ctx,
        Arc::new(registry),
        RunKind::Scrape,
        "test-hash",
        &[good.clone(), untitled.clone(), missing.clone()],
    )
    .await
    .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.statuses[&good], true);
    assert_eq!(summary.statuses[&untitled], false);
    assert_eq!(summary.statuses[&missing], false);

    let article = with_store(&ctx.store, |store| store.get_article_by_url(&good))
        .unwrap()
        .unwrap();
    assert_eq!(article.title, "Governo anuncia medidas");
    assert_eq!(article.content, "Primeiro parágrafo.\nSegundo parágrafo.");
    assert_eq!(article.author.as_deref(), Some("Por Ana Souza, g1"));
    assert_eq!(
        article.publication_date.map(|d| d.to_string()),
        Some("2024-05-06 14:30:00".to_string())
    );

    assert_eq!(with_store(&ctx.store, |store| store.count_articles()).unwrap(), 1);
}
