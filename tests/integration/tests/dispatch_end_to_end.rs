//! End-to-end dispatch against mock webhook and bot API servers.
//!
//! These tests run the real HTTP adapters through the dispatcher and record
//! outcomes into a file-backed history store.

use kokosend_channels::{
    Aggregate, Attachment, DeliveryOutcome, Dispatcher, HttpAdapterFactory, Message, RichEmbed,
};
use kokosend_core::{Destination, HistoryStatus, HistoryStore};
use kokosend_integration_tests::{bot_path, bot_target, webhook_target, WEBHOOK_PATH};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    webhook: MockServer,
    bot: MockServer,
    history: Arc<HistoryStore>,
    dispatcher: Dispatcher,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let webhook = MockServer::start().await;
    let bot = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history = Arc::new(HistoryStore::open(dir.path().join("history.json"), 50));

    let factory = HttpAdapterFactory::new(reqwest::Client::new()).with_bot_api_base(bot.uri());
    let dispatcher = Dispatcher::new(Arc::new(factory), history.clone());

    Harness {
        webhook,
        bot,
        history,
        dispatcher,
        _dir: dir,
    }
}

async fn webhook_responds(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_text_to_both_destinations() {
    let h = harness().await;
    webhook_responds(&h.webhook, 204).await;
    Mock::given(method("GET"))
        .and(path(bot_path("sendMessage")))
        .and(query_param("text", "hi"))
        .and(query_param("chat_id", "-1001"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.bot)
        .await;

    let result = h
        .dispatcher
        .send(Message::text("hi"), vec![webhook_target(&h.webhook), bot_target()])
        .await;

    assert_eq!(result.aggregate, Some(Aggregate::FullSuccess));

    let entries = h.history.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "hi");
    assert_eq!(entries[0].status, HistoryStatus::Success);
    assert_eq!(
        entries[0].destinations,
        vec![Destination::Webhook, Destination::Bot]
    );
}

#[tokio::test]
async fn test_long_text_to_webhook_attaches_full_text() {
    let h = harness().await;
    webhook_responds(&h.webhook, 204).await;

    let text: String = "abcdefghij".repeat(500);
    let mut bot = bot_target();
    bot.enabled = false;

    let result = h
        .dispatcher
        .send(Message::text(text.clone()), vec![webhook_target(&h.webhook), bot])
        .await;
    assert_eq!(result.aggregate, Some(Aggregate::FullSuccess));
    assert_eq!(result.outcome(Destination::Bot), Some(&DeliveryOutcome::Skipped));

    let requests = h.webhook.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("Message exceeded 2000 characters"));
    assert!(body.contains("filename=\"full_message.txt\""));
    assert!(body.contains(&text));

    assert!(h.bot.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_embed_is_native_on_webhook_and_text_on_bot() {
    let h = harness().await;
    webhook_responds(&h.webhook, 204).await;
    Mock::given(method("GET"))
        .and(path(bot_path("sendMessage")))
        .and(query_param("text", "launch\n\n*Status*\nall green"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.bot)
        .await;

    let message = Message::text("launch").with_embed(RichEmbed::new("Status", "all green", 0x2ecc71));
    let result = h
        .dispatcher
        .send(message, vec![webhook_target(&h.webhook), bot_target()])
        .await;
    assert_eq!(result.aggregate, Some(Aggregate::FullSuccess));

    let requests = h.webhook.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains(r#""embeds":[{"title":"Status","description":"all green","color":3066993}]"#));
}

#[tokio::test]
async fn test_partial_failure_then_retry() {
    let h = harness().await;
    webhook_responds(&h.webhook, 204).await;

    // The text call fails once, then the bot API recovers.
    Mock::given(method("GET"))
        .and(path(bot_path("sendMessage")))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&h.bot)
        .await;
    Mock::given(method("GET"))
        .and(path(bot_path("sendMessage")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&h.bot)
        .await;
    Mock::given(method("POST"))
        .and(path(bot_path("sendPhoto")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&h.bot)
        .await;

    let message = Message::text("report")
        .with_attachment(Attachment::from_bytes(b"png".to_vec(), "chart.png", "image/png"));

    let first = h
        .dispatcher
        .send(message.clone(), vec![webhook_target(&h.webhook), bot_target()])
        .await;
    assert_eq!(first.aggregate, Some(Aggregate::PartialSuccess));
    assert!(matches!(
        first.outcome(Destination::Bot),
        Some(DeliveryOutcome::Error { reason }) if reason.contains("sendMessage")
    ));
    // the failed text call stopped the photo upload
    assert_eq!(h.bot.received_requests().await.unwrap().len(), 1);

    let retried = h
        .dispatcher
        .retry(Destination::Bot, message, None)
        .await
        .unwrap();
    assert_eq!(retried.aggregate, Some(Aggregate::FullSuccess));
    assert_eq!(h.webhook.received_requests().await.unwrap().len(), 1);

    let entries = h.history.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].status, HistoryStatus::Success);
    assert_eq!(entries[1].status, HistoryStatus::Partial);
    assert_eq!(entries[1].destinations, vec![Destination::Webhook]);
}

#[tokio::test]
async fn test_total_failure_leaves_history_empty() {
    let h = harness().await;
    webhook_responds(&h.webhook, 401).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.bot)
        .await;

    let result = h
        .dispatcher
        .send(Message::text("hi"), vec![webhook_target(&h.webhook), bot_target()])
        .await;

    assert_eq!(result.aggregate, Some(Aggregate::FullFailure));
    assert!(h.history.list().is_empty());
}
