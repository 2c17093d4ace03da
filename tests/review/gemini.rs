use std::time::Duration;

use httpmock::Method::POST;
use leetcode_tracker::{Analyzer, ExtractError, GeminiAnalyzer};
use serde_json::json;
use url::Url;

use crate::common::setup_server;
use crate::review_prompt::record;

const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn analyzer(server: &httpmock::MockServer) -> GeminiAnalyzer {
    GeminiAnalyzer::builder()
        .api_key("test-key")
        .base_url(Url::parse(&format!("{}/v1beta/", server.base_url())).unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn answer(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

const CRITIQUE: &str = r#"{
  "optimalSolution": {"code": "// hash map", "language": "C++", "timeComplexity": "O(n)", "spaceComplexity": "O(n)"},
  "comparison": {"userTimeComplexity": "O(n^2)", "userSpaceComplexity": "O(1)", "differences": ["nested loops"], "strengths": ["clear"], "improvements": ["use a map"]},
  "notes": "Use a **hash map**.",
  "topics": ["Hash Map", "Two Pointers", "Arrays"]
}"#;

#[tokio::test]
async fn critique_is_parsed_from_fenced_answer() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(PATH)
            .query_param("key", "test-key")
            .body_includes("Problem: Two Sum")
            .body_includes("systemInstruction")
            .body_includes("maxOutputTokens");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(answer(&format!("Here is my review:\n```json\n{CRITIQUE}\n```")));
    });

    let critique = analyzer(&server).analyze(&record(), None).await.unwrap();
    mock.assert();

    assert_eq!(critique.optimal_solution.time_complexity, "O(n)");
    assert_eq!(critique.comparison.user_time_complexity, "O(n^2)");
    assert_eq!(critique.comparison.improvements, vec!["use a map".to_string()]);
    assert_eq!(critique.notes, "Use a **hash map**.");
    assert_eq!(critique.topics.len(), 3);
}

#[tokio::test]
async fn missing_key_fails_before_the_network() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(answer(CRITIQUE));
    });

    let analyzer = GeminiAnalyzer::builder()
        .base_url(Url::parse(&format!("{}/v1beta/", server.base_url())).unwrap())
        .build()
        .unwrap();
    assert!(!analyzer.is_configured());

    let err = analyzer.analyze(&record(), None).await.unwrap_err();
    assert!(matches!(err, ExtractError::Analysis(ref m) if m.contains("API key")), "{err}");
    mock.assert_hits(0);
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}));
    });

    let err = analyzer(&server).analyze(&record(), None).await.unwrap_err();
    mock.assert();
    assert!(matches!(err, ExtractError::Analysis(ref m) if m.contains("API key not valid.")), "{err}");
}

#[tokio::test]
async fn bare_error_status() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(503).body("upstream unavailable");
    });

    let err = analyzer(&server).analyze(&record(), None).await.unwrap_err();
    match err {
        ExtractError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with(PATH));
            assert!(!url.contains("test-key"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn empty_answer() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({"candidates": []}));
    });

    let err = analyzer(&server).analyze(&record(), None).await.unwrap_err();
    assert!(matches!(err, ExtractError::Analysis(ref m) if m.contains("no response text")), "{err}");
}

#[tokio::test]
async fn answer_without_json() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(answer("I cannot review this."));
    });

    let err = analyzer(&server).analyze(&record(), None).await.unwrap_err();
    assert!(matches!(err, ExtractError::Analysis(ref m) if m.contains("no JSON object")), "{err}");
}

#[tokio::test]
async fn malformed_json_answer() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(answer(r#"{"notes": "unterminated}"#));
    });

    let err = analyzer(&server).analyze(&record(), None).await.unwrap_err();
    assert!(matches!(err, ExtractError::Analysis(ref m) if m.contains("not a valid critique")), "{err}");
}

#[tokio::test]
async fn model_is_configurable() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini-2.5-pro:generateContent");
        then.status(200).json_body(answer(CRITIQUE));
    });

    let analyzer = GeminiAnalyzer::builder()
        .api_key("k")
        .model("gemini-2.5-pro")
        .base_url(Url::parse(&format!("{}/v1beta/", server.base_url())).unwrap())
        .build()
        .unwrap();
    assert_eq!(analyzer.model(), "gemini-2.5-pro");
    analyzer.analyze(&record(), None).await.unwrap();
    mock.assert();
}
