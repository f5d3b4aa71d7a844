//! End-to-end tests of the `archscope` binary against a fake service.

mod common;

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use common::{sample_records, FakeService};
use tempfile::TempDir;

/// US Eastern time as a POSIX TZ rule, so no zoneinfo files are needed.
const EASTERN_TZ: &str = "EST5EDT,M3.2.0,M11.1.0";

fn setup_test_env(service: &FakeService) -> (TempDir, PathBuf) {
    setup_test_env_in_zone(service, true)
}

fn setup_test_env_in_zone(service: &FakeService, utc: bool) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("archscope.toml");
    std::fs::write(
        &config_path,
        format!(
            "[api]\nurl = \"{}\"\ntimeout_secs = 5\n\n[display]\nutc = {}\n",
            service.base_url, utc
        ),
    )
    .unwrap();
    (tmp, config_path)
}

async fn run_archscope(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_archscope_with_tz(config_path, args, "UTC").await
}

async fn run_archscope_with_tz(
    config_path: &Path,
    args: &[&str],
    tz: &str,
) -> (String, String, bool) {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_archscope"))
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("API_URL")
        .env_remove("RUST_LOG")
        .env("TZ", tz)
        .output()
        .await
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_prints_cards() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) = run_archscope(&config, &["list"]).await;
    assert!(success, "list failed: {}", stderr);
    assert_eq!(
        stdout,
        "[1] Three-tier web app\n    March 5, 2024, 14:30\n\
         [2] No Title\n    Invalid Date\n    EC2 | S3 | RDS | +1\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_empty() {
    let service = FakeService::start(vec![]).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, _, success) = run_archscope(&config, &["list"]).await;
    assert!(success);
    assert_eq!(stdout, "No architectures found.\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, _, success) = run_archscope(&config, &["list", "--json"]).await;
    assert!(success);
    let cards: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(cards[1]["title"], "No Title");
    assert_eq!(cards[1]["tags"], serde_json::json!(["EC2", "S3", "RDS"]));
    assert_eq!(cards[1]["overflow"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_skip_and_limit() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) =
        run_archscope(&config, &["list", "--skip", "1", "--limit", "1"]).await;
    assert!(success, "list failed: {}", stderr);
    assert_eq!(
        stdout,
        "[1] No Title\n    Invalid Date\n    EC2 | S3 | RDS | +1\n"
    );

    let query = &service.list_queries()[0];
    assert_eq!(query.get("skip").map(String::as_str), Some("1"));
    assert_eq!(query.get("limit").map(String::as_str), Some("1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_time_follows_daylight_saving() {
    let records = vec![
        serde_json::json!({"title": "Winter", "timestamp": "2024-01-15T12:00:00Z", "raw_content": ""}),
        serde_json::json!({"title": "Summer", "timestamp": "2024-07-15T12:00:00Z", "raw_content": ""}),
    ];
    let service = FakeService::start(records).await;
    let (_tmp, config) = setup_test_env_in_zone(&service, false);

    let (stdout, stderr, success) = run_archscope_with_tz(&config, &["list"], EASTERN_TZ).await;
    assert!(success, "list failed: {}", stderr);
    assert_eq!(
        stdout,
        "[1] Winter\n    January 15, 2024, 07:00\n\
         [2] Summer\n    July 15, 2024, 08:00\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_failure_exits_nonzero_with_message() {
    let service = FakeService::start(sample_records()).await;
    service.fail_list(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"timeout"}"#);
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) = run_archscope(&config, &["list"]).await;
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("timeout"), "stderr: {}", stderr);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_cloudformation_detail() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) = run_archscope(&config, &["show", "1"]).await;
    assert!(success, "show failed: {}", stderr);
    assert!(stdout.starts_with("--- Three-tier web app ---\nMarch 5, 2024, 14:30\n"));
    assert!(stdout.contains("type: json\n"));
    assert!(stdout.contains("--- Description ---\nWeb tier with static assets\n"));
    assert!(stdout.contains(
        "Template Version: 2010-09-09\nResources:\n  WebServer  AWS::EC2::Instance\n  Assets     AWS::S3::Bucket\n"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_raw_is_verbatim() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, _, success) = run_archscope(&config, &["show", "1", "--raw"]).await;
    assert!(success);
    assert_eq!(stdout, "{\n  \"AWSTemplateFormatVersion\" : \"2010-09-09\"\n}\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_json() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) = run_archscope(&config, &["show", "1", "--json"]).await;
    assert!(success, "show failed: {}", stderr);
    let detail: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(detail["title"], "Three-tier web app");
    assert_eq!(detail["timestamp"], "March 5, 2024, 14:30");
    assert_eq!(detail["source_type"], "json");
    assert_eq!(detail["variant"], "cloud_formation_like");
    assert_eq!(
        detail["parsed"]["sections"][0],
        serde_json::json!({"kind": "field", "label": "Template Version", "value": "2010-09-09"})
    );
    assert_eq!(detail["parsed"]["sections"][1]["heading"], "Resources");
    assert_eq!(
        detail["raw"]["text"],
        "{\n  \"AWSTemplateFormatVersion\" : \"2010-09-09\"\n}\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_service_summary() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, _, success) = run_archscope(&config, &["show", "2"]).await;
    assert!(success);
    assert!(stdout.contains(
        "Notes on a serverless backend\nDetected Services: EC2, S3, RDS, Lambda\n"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_out_of_range() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (_, stderr, success) = run_archscope(&config, &["show", "3"]).await;
    assert!(!success);
    assert!(stderr.contains("no architecture #3 (2 listed)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_then_lists() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, stderr, success) =
        run_archscope(&config, &["submit", "https://example.com/page.html"]).await;
    assert!(success, "submit failed: {}", stderr);
    assert!(stdout.starts_with("Scraped https://example.com/page.html\n\n"));
    assert!(stdout.contains("[1] Scraped https://example.com/page.html\n    March 6, 2024, 09:00\n    Lambda\n"));
    assert_eq!(service.scraped(), vec!["https://example.com/page.html"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_blank_url_is_rejected() {
    let service = FakeService::start(sample_records()).await;
    let (_tmp, config) = setup_test_env(&service);

    let (_, stderr, success) = run_archscope(&config, &["submit", ""]).await;
    assert!(!success);
    assert!(stderr.contains("Please enter a URL"));
    assert!(service.scraped().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_failure_uses_fallback_message() {
    let service = FakeService::start(vec![]).await;
    service.fail_scrape(StatusCode::INTERNAL_SERVER_ERROR, "oops");
    let (_tmp, config) = setup_test_env(&service);

    let (_, stderr, success) = run_archscope(&config, &["submit", "https://x.test"]).await;
    assert!(!success);
    assert!(stderr.contains("Failed to submit URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ping() {
    let service = FakeService::start(vec![]).await;
    let (_tmp, config) = setup_test_env(&service);

    let (stdout, _, success) = run_archscope(&config, &["ping"]).await;
    assert!(success);
    assert!(stdout.contains("Welcome to the AWS Architecture Scraper API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("archscope.toml");
    std::fs::write(&config, "[api]\ntimeout_secs = 0\n").unwrap();

    let (_, stderr, success) = run_archscope(&config, &["list"]).await;
    assert!(!success);
    assert!(stderr.contains("timeout_secs"));
}
