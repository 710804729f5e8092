use common::Config;
use newsline::server::build_rocket;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

async fn client_for(data_path: PathBuf) -> Client {
    Client::tracked(build_rocket(Arc::new(Config::default()), data_path))
        .await
        .expect("valid rocket instance")
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/news_data.json")
}

#[tokio::test]
async fn health_and_status() {
    let client = client_for(fixture_path()).await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.as_deref(), Some("OK"));

    let response = client.get("/api/v1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value =
        serde_json::from_str(&response.into_string().await.expect("body")).expect("json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["window_minutes"], 120);
}

#[tokio::test]
async fn index_serves_the_html_timeline() {
    let client = client_for(fixture_path()).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let body = response.into_string().await.expect("body");
    assert!(body.contains("Latest News (Past 2 Hours)"));
    assert!(body.contains("Ceasefire Announcements"));
}

#[tokio::test]
async fn text_and_json_routes() {
    let client = client_for(fixture_path()).await;

    let response = client.get("/timeline.txt").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response
        .into_string()
        .await
        .expect("body")
        .contains("Past News"));

    let response = client.get("/api/v1/timeline").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value =
        serde_json::from_str(&response.into_string().await.expect("body")).expect("json");
    assert_eq!(body["state"], "ready");
}

#[tokio::test]
async fn each_request_reads_a_fresh_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news_data.json");
    let client = client_for(path.clone()).await;

    let body: serde_json::Value = serde_json::from_str(
        &client
            .get("/api/v1/timeline")
            .dispatch()
            .await
            .into_string()
            .await
            .expect("body"),
    )
    .expect("json");
    assert_eq!(body["state"], "unavailable");

    fs::write(&path, "{\"not\": \"a list\"}").expect("write");
    let body: serde_json::Value = serde_json::from_str(
        &client
            .get("/api/v1/timeline")
            .dispatch()
            .await
            .into_string()
            .await
            .expect("body"),
    )
    .expect("json");
    assert_eq!(body["state"], "invalid");
}
