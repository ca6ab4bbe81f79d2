//! End-to-end command handling with the Ozon API mocked.
//! Run with: cargo test --test prices_flow_test

use std::sync::Once;

use meteorite_bot::application::replies;
use meteorite_bot::build_dispatcher;
use meteorite_bot::domain::entities::User;
use meteorite_bot::infrastructure::config::Config;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    });
}

fn config_for(server: &mockito::ServerGuard) -> Config {
    let mut config = Config::default();
    config.ozon.client_id = Some("123".to_string());
    config.ozon.api_key = Some("secret".to_string());
    config.ozon.api_url = Some(server.url());
    config.ozon.timeout_secs = 5;
    config
}

fn products_body(n: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=n)
        .map(|i| serde_json::json!({"product_id": i, "offer_id": format!("SKU-{}", i)}))
        .collect();
    serde_json::json!({"result": {"items": items, "last_id": "", "total": n}}).to_string()
}

fn prices_body(n: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=n)
        .map(|i| serde_json::json!({
            "product_id": i,
            "offer_id": format!("SKU-{}", i),
            "prices": {
                "price": "990.0000",
                "old_price": "1200.0000",
                "price_with_discount": "950.0000",
                "currency_code": "RUB"
            }
        }))
        .collect();
    serde_json::json!({"result": items}).to_string()
}

async fn mock_catalog(server: &mut mockito::ServerGuard, n: usize) {
    server.mock("POST", "/v3/product/list")
        .with_status(200)
        .with_body(products_body(n))
        .create_async()
        .await;
    server.mock("POST", "/v4/product/info/prices")
        .with_status(200)
        .with_body(prices_body(n))
        .create_async()
        .await;
}

#[tokio::test]
async fn test_start_and_ping_replies_are_fixed() {
    ensure_init();
    let dispatcher = build_dispatcher(&Config::default()).unwrap();

    for input in ["/start", "/start now", "/START"] {
        assert_eq!(dispatcher.process_text("1", input, None).await.as_deref(), Some(replies::GREETING));
    }
    for input in ["/ping", "/ping@meteorite_bot", "  /ping  "] {
        assert_eq!(dispatcher.process_text("1", input, None).await.as_deref(), Some(replies::PONG));
    }
}

#[tokio::test]
async fn test_prices_with_many_records_shows_ten_lines() {
    ensure_init();
    let mut server = mockito::Server::new_async().await;
    mock_catalog(&mut server, 14).await;

    let dispatcher = build_dispatcher(&config_for(&server)).unwrap();
    let reply = dispatcher.process_text("1", "/prices", None).await.unwrap();

    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "SKU-1: 990.0000 RUB (old: 1200.0000, disc: 950.0000)");
    assert!(lines[9].starts_with("SKU-10:"));
}

#[tokio::test]
async fn test_prices_with_few_records_shows_each() {
    ensure_init();
    let mut server = mockito::Server::new_async().await;
    mock_catalog(&mut server, 4).await;

    let dispatcher = build_dispatcher(&config_for(&server)).unwrap();
    let reply = dispatcher.process_text("1", "/prices", None).await.unwrap();

    assert_eq!(reply.lines().count(), 4);
}

#[tokio::test]
async fn test_prices_api_error_is_reported_and_bot_keeps_working() {
    ensure_init();
    let mut server = mockito::Server::new_async().await;
    server.mock("POST", "/v3/product/list")
        .with_status(403)
        .with_body(r#"{"code": 7, "message": "Api-key is deactivated"}"#)
        .create_async()
        .await;

    let dispatcher = build_dispatcher(&config_for(&server)).unwrap();
    let reply = dispatcher.process_text("1", "/prices", None).await.unwrap();

    assert!(!reply.is_empty());
    assert!(reply.starts_with(replies::OZON_ERROR_PREFIX));
    assert!(reply.contains("403"));

    assert_eq!(dispatcher.process_text("1", "/ping", None).await.as_deref(), Some(replies::PONG));
}

#[tokio::test]
async fn test_prices_without_credentials() {
    ensure_init();
    let dispatcher = build_dispatcher(&Config::default()).unwrap();
    let reply = dispatcher.process_text("1", "/prices", None).await;
    assert_eq!(reply.as_deref(), Some(replies::OZON_NOT_CONFIGURED));
}

#[tokio::test]
async fn test_prices_restricted_to_admins() {
    ensure_init();
    let mut server = mockito::Server::new_async().await;
    let list = server.mock("POST", "/v3/product/list")
        .with_status(200)
        .with_body(products_body(2))
        .expect(1)
        .create_async()
        .await;
    server.mock("POST", "/v4/product/info/prices")
        .with_status(200)
        .with_body(prices_body(2))
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.admins.ids = vec![1001];
    let dispatcher = build_dispatcher(&config).unwrap();

    let denied = dispatcher.process_text("5", "/prices", Some(User::new("5"))).await;
    assert_eq!(denied.as_deref(), Some(replies::ACCESS_DENIED));

    let allowed = dispatcher.process_text("1001", "/prices", Some(User::new("1001"))).await.unwrap();
    assert_eq!(allowed.lines().count(), 2);

    list.assert_async().await;
}

#[tokio::test]
async fn test_unknown_command_and_plain_text() {
    ensure_init();
    let dispatcher = build_dispatcher(&Config::default()).unwrap();

    let hint = dispatcher.process_text("1", "/stock", None).await.unwrap();
    assert!(hint.contains("/start"));
    assert!(hint.contains("/ping"));
    assert!(hint.contains("/prices"));

    assert!(dispatcher.process_text("1", "what are the prices?", None).await.is_none());
    assert!(dispatcher.process_text("1", "", None).await.is_none());
}

#[tokio::test]
async fn test_prices_times_out_when_ozon_never_answers() {
    ensure_init();

    // Accepts connections and never writes a response
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = Config::default();
    config.ozon.client_id = Some("123".to_string());
    config.ozon.api_key = Some("secret".to_string());
    config.ozon.api_url = Some(format!("http://{}", addr));
    config.ozon.timeout_secs = 1;
    let dispatcher = build_dispatcher(&config).unwrap();

    let started = std::time::Instant::now();
    let reply = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        dispatcher.process_text("1", "/prices", None),
    )
    .await
    .expect("/prices did not give up on a silent server")
    .unwrap();

    assert!(reply.starts_with("Ошибка Ozon API: request failed"), "{}", reply);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
