use nlp_client::{ClientConfig, NlpClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A host whose liveness probe succeeds.
async fn live_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("NLP Server"))
        .mount(&server)
        .await;
    server
}

/// A host that answers every request with 500.
async fn failing_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

fn client_for(hosts: &[&str]) -> NlpClient {
    let mut config = ClientConfig::with_hosts(hosts.iter().copied());
    config.timeout = Duration::from_secs(5);
    config.probe_timeout = Duration::from_secs(2);
    config.debug = true;
    NlpClient::with_config(config).unwrap()
}

#[tokio::test]
async fn test_language_maps_norwegian_variants() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"langid": {"language": "nb"}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("Dette er norsk").await.as_deref(), Some("no"));
}

#[tokio::test]
async fn test_language_passes_other_codes_through() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"langid": {"language": "de"}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("Das ist Deutsch").await.as_deref(), Some("de"));
}

#[tokio::test]
async fn test_newspaper_url_fails_over_to_live_host() {
    let down = failing_server().await;
    let up = live_server().await;
    Mock::given(method("GET"))
        .and(path("/newspaper"))
        .and(query_param("url", "https://example.com/story"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"newspaper": {"title": "X"}})))
        .mount(&up)
        .await;

    // Repeat so both initial picks are exercised
    for _ in 0..8 {
        let client = client_for(&[&down.uri(), &up.uri()]);
        let article = client
            .newspaper_url("https://example.com/story")
            .await
            .expect("article from the live host");

        assert_eq!(article.title.as_deref(), Some("X"));
        assert_eq!(client.selected_host(), up.uri());
    }
}

#[tokio::test]
async fn test_unreachable_host_fails_over() {
    let up = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"langid": {"language": "en"}})),
        )
        .mount(&up)
        .await;

    for _ in 0..4 {
        let client = client_for(&["http://127.0.0.1:1", &up.uri()]);
        assert_eq!(client.language("Hello there").await.as_deref(), Some("en"));
        assert_eq!(client.selected_host(), up.uri());
    }
}

#[tokio::test]
async fn test_retry_ceiling_stops_after_four_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("anything").await, None);

    let stats = client.stats();
    assert_eq!(stats.calls, 1);
    assert_eq!(stats.success_count, 0);
    assert_eq!(stats.failed_attempts, 4);
    assert_eq!(stats.failovers, 4);
    assert_eq!(stats.failovers_succeeded, 0);
    assert_eq!(stats.exhausted, 1);
}

#[tokio::test]
async fn test_custom_retry_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = ClientConfig::with_hosts([server.uri()]);
    config.max_retries = 1;
    let client = NlpClient::with_config(config).unwrap();

    assert_eq!(client.embeddings("apple", "en").await, None);
}

#[tokio::test]
async fn test_all_hosts_down_returns_none() {
    let client = client_for(&["http://127.0.0.1:1", "http://127.0.0.1:2"]);
    let before = client.selected_host().to_string();

    assert!(client.newspaper_url("https://example.com").await.is_none());
    assert_eq!(client.selected_host(), before);
    assert_eq!(client.stats().exhausted, 1);
}

#[tokio::test]
async fn test_empty_body_is_retried() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"langid": {"language": "sv"}})),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("Det här är svenska").await.as_deref(), Some("sv"));

    let stats = client.stats();
    assert_eq!(stats.failed_attempts, 1);
    assert_eq!(stats.failovers_succeeded, 1);
}

#[tokio::test]
async fn test_non_ok_status_is_a_failure() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"langid": {"language": "fi"}})),
        )
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("Tämä on suomea").await, None);
}

#[tokio::test]
async fn test_malformed_json_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("NLP Server"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert_eq!(client.language("text").await, None);
    assert_eq!(client.stats().failovers, 0);
}

#[tokio::test]
async fn test_post_sends_form_body() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/polyglot"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("text=Ola+bor+i+Oslo&lang=no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "polyglot": {
                "language": "no",
                "entities": ["Ola", "Oslo"],
                "type_entities": {"I-PER": ["Ola"], "I-LOC": ["Oslo"]},
                "sentiment": 0.5
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    let result = client.polyglot("Ola bor i Oslo", Some("no")).await;

    assert_eq!(result.language.as_deref(), Some("no"));
    assert_eq!(result.persons(), ["Ola"]);
    assert_eq!(result.locations(), ["Oslo"]);
    assert_eq!(result.sentiment(), 0.5);
}

#[tokio::test]
async fn test_polyglot_omits_missing_language() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/polyglot"))
        .and(body_string("text=hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"polyglot": {"sentiment": 0.1}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    let result = client.polyglot("hello", None).await;
    assert_eq!(result.sentiment, Some(0.1));
}

#[tokio::test]
async fn test_polyglot_unavailable_is_empty() {
    let client = client_for(&["http://127.0.0.1:1"]);
    assert!(client.polyglot("hello", None).await.is_empty());
}

#[tokio::test]
async fn test_newspaper_html() {
    let server = live_server().await;
    Mock::given(method("POST"))
        .and(path("/newspaper"))
        .and(body_string("text=%3Chtml%3E%3C%2Fhtml%3E"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "newspaper": {"title": "Headline", "authors": ["A. Writer"], "text": "Body"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    let article = client.newspaper_html("<html></html>").await.unwrap();
    assert_eq!(article.title.as_deref(), Some("Headline"));
    assert_eq!(article.authors, ["A. Writer"]);
}

#[tokio::test]
async fn test_newspaper_empty_result_is_none() {
    let server = live_server().await;
    Mock::given(method("GET"))
        .and(path("/newspaper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"newspaper": {}})))
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    assert!(client.newspaper_url("https://example.com").await.is_none());
}

#[tokio::test]
async fn test_embeddings() {
    let server = live_server().await;
    Mock::given(method("GET"))
        .and(path("/embeddings"))
        .and(query_param("word", "apple"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "neighbours": [["pear", 0.9], ["plum", 0.8]]
        })))
        .mount(&server)
        .await;

    let client = client_for(&[&server.uri()]);
    let neighbours = client
        .embeddings("apple", nlp_client::DEFAULT_EMBEDDINGS_LANG)
        .await
        .unwrap();

    let words: Vec<&str> = neighbours.iter().map(|n| n.word.as_str()).collect();
    assert_eq!(words, ["pear", "plum"]);
    assert_eq!(neighbours[0].similarity, Some(0.9));
}

#[tokio::test]
async fn test_get_query_string() {
    let server = live_server().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_for(&[&format!("{}/", server.uri())]);
    assert_eq!(client.get("/status", &[]).await, Some(json!({"ok": true})));
    assert_eq!(
        client.get("status", &[("a", "1"), ("b", "x y")]).await,
        Some(json!({"ok": true}))
    );

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<Option<String>> = requests
        .iter()
        .filter(|r| r.url.path() == "/status")
        .map(|r| r.url.query().map(str::to_string))
        .collect();

    assert_eq!(queries, [None, Some("a=1&b=x+y".to_string())]);
}

#[tokio::test]
async fn test_clones_share_selected_host() {
    let down = failing_server().await;
    let up = live_server().await;
    Mock::given(method("POST"))
        .and(path("/language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"langid": {"language": "en"}})),
        )
        .mount(&up)
        .await;

    let client = client_for(&[&down.uri(), &up.uri()]);
    let clone = client.clone();

    assert!(client.language("hello").await.is_some());
    assert_eq!(clone.selected_host(), up.uri());
}
