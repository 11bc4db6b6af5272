//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the storefront and run the full
//! fetch → parse → filter → write cycle against a temporary data directory.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use storefront_crawler::config::Config;
use storefront_crawler::crawler::{crawl, Outcome};
use storefront_crawler::listing::Condition;
use storefront_crawler::storage::list_records;
use storefront_crawler::FetchErrorKind;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STORE: &str = "teststore";
const LISTING_PATH: &str = "/sch/teststore/m.html";

/// Creates a test configuration pointing at the mock storefront
fn create_test_config(base_url: &str, data_dir: &Path, condition: Option<Condition>) -> Config {
    let mut config = Config::default();
    config.crawler.store = STORE.to_string();
    config.crawler.condition = condition;
    config.fetch.base_url = base_url.to_string();
    config.fetch.timeout_secs = 2;
    config.fetch.connect_timeout_secs = 2;
    config.output.data_dir = data_dir.to_path_buf();
    config.output.log_dir = data_dir.join("logs");
    config
}

fn item(id: &str, title: &str, price: &str, condition: &str) -> String {
    format!(
        r#"<li class="s-item">
            <div class="s-item__title">{title}</div>
            <span class="s-item__price">{price}</span>
            <span class="SECONDARY_INFO">{condition}</span>
            <a class="s-item__link" href="https://www.ebay.com/itm/{id}?hash=item{id}">View item</a>
        </li>"#
    )
}

fn listing_page(items: &[String], next_page: Option<u32>) -> String {
    let pagination = match next_page {
        Some(n) => format!(
            r#"<nav class="pagination"><a class="pagination__next" href="{}?_pgn={}">Next page</a></nav>"#,
            LISTING_PATH, n
        ),
        None => String::new(),
    };
    format!(
        r#"<html><head><title>Store listings</title></head><body>
        <ul class="srp-results">{}</ul>{}
        </body></html>"#,
        items.join("\n"),
        pagination
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("_pgn", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn read_record(data_dir: &Path, item_id: &str) -> serde_json::Value {
    let path = data_dir.join(STORE).join(format!("{}.json", item_id));
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing record {}: {}", path.display(), e));
    serde_json::from_str(&content).expect("record is valid JSON")
}

fn no_stop() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[tokio::test]
async fn test_single_page_crawl() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        1,
        listing_page(
            &[
                item("1001", "Dell OptiPlex 7050", "$129.99", "Pre-Owned"),
                item("1002", "Cisco Catalyst 2960", "$1,050.00", "New"),
            ],
            None,
        ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert!(matches!(report.outcome, Outcome::Done));
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.items_written, 2);

    let first = read_record(data_dir.path(), "1001");
    let fields = first.as_object().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields["title"], "Dell OptiPlex 7050");
    assert_eq!(fields["condition"], "Pre-Owned");
    assert_eq!(fields["price"], "129.99");
    assert_eq!(
        fields["product_url"],
        "https://www.ebay.com/itm/1001?hash=item1001"
    );

    let second = read_record(data_dir.path(), "1002");
    assert_eq!(second["price"], "1050.00");
}

#[tokio::test]
async fn test_condition_filter() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        1,
        listing_page(
            &[
                item("2001", "New keyboard", "$20.00", "New"),
                item("2002", "Used keyboard", "$8.00", "Pre-Owned"),
            ],
            None,
        ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), data_dir.path(), Some(Condition::New));
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert_eq!(report.items_written, 1);
    assert_eq!(report.items_filtered_out, 1);

    let records = list_records(data_dir.path(), STORE).unwrap();
    assert_eq!(records, vec![data_dir.path().join(STORE).join("2001.json")]);
}

#[tokio::test]
async fn test_timeout_on_first_page_aborts() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[item("1", "Late", "$1.00", "New")], None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    config.fetch.timeout_secs = 1;
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert_eq!(report.pages_visited, 0);
    assert_eq!(report.items_written, 0);
    match report.outcome {
        Outcome::Aborted { page, error } => {
            assert_eq!(page, 1);
            assert_eq!(error.page, 1);
            assert_eq!(error.kind, FetchErrorKind::Timeout);
        }
        other => panic!("expected an aborted crawl, got {:?}", other),
    }
}

#[tokio::test]
async fn test_two_pages_second_without_matches() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        1,
        listing_page(
            &[
                item("3001", "Monitor", "$99.00", "New"),
                item("3002", "Dock", "$45.00", "New"),
            ],
            Some(2),
        ),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        listing_page(&[item("3003", "Old dock", "$5.00", "Used")], None),
    )
    .await;

    // Page 3 must never be requested
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("_pgn", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), data_dir.path(), Some(Condition::New));
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert!(report.is_success());
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.items_written, 2);
    assert_eq!(list_records(data_dir.path(), STORE).unwrap().len(), 2);
}

#[tokio::test]
async fn test_listing_without_title_is_skipped() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    let untitled = r#"<li class="s-item">
            <span class="s-item__price">$3.00</span>
            <a class="s-item__link" href="https://www.ebay.com/itm/4000">View item</a>
        </li>"#
        .to_string();

    mount_page(
        &mock_server,
        1,
        listing_page(
            &[
                untitled,
                item("4001", "Switch", "$30.00", "Used"),
                item("4002", "Router", "$40.00", "Used"),
                item("4003", "Modem", "$15.00", "Used"),
            ],
            None,
        ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert!(report.is_success());
    assert_eq!(report.items_found, 3);
    assert_eq!(report.items_skipped, 1);
    assert_eq!(report.items_written, 3);
    assert!(!data_dir.path().join(STORE).join("4000.json").exists());
}

#[tokio::test]
async fn test_server_error_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        1,
        listing_page(&[item("5001", "Laptop", "$300.00", "Used")], Some(2)),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("_pgn", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.items_written, 1);
    match report.outcome {
        Outcome::Aborted { page, error } => {
            assert_eq!(page, 2);
            assert_eq!(error.kind, FetchErrorKind::Status(503));
        }
        other => panic!("expected an aborted crawl, got {:?}", other),
    }
    assert!(data_dir.path().join(STORE).join("5001.json").exists());
}

#[tokio::test]
async fn test_recrawl_overwrites_records() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("_pgn", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[item("6001", "Tablet", "$75.00", "New")],
            None,
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let record_path = data_dir.path().join(STORE).join("6001.json");

    let config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    crawl(config.clone(), no_stop()).await.expect("First crawl failed");
    let first = std::fs::read(&record_path).unwrap();

    crawl(config, no_stop()).await.expect("Second crawl failed");
    let second = std::fs::read(&record_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(list_records(data_dir.path(), STORE).unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header("user-agent", "ArchiveBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    config.fetch.user_agent = "ArchiveBot/1.0".to_string();
    let report = crawl(config, no_stop()).await.expect("Crawl failed");

    assert!(report.is_success());
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.items_written, 0);
}

#[tokio::test]
async fn test_invalid_store_name_makes_no_request() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.path(), None);
    config.crawler.store = "../escape".to_string();

    let result = crawl(config, no_stop()).await;
    assert!(result.is_err());
}
