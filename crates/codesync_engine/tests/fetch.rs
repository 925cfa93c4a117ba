mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use codesync_engine::{
    FailureKind, FetchSettings, Fetcher, ReqwestFetcher, Selectors, SyncLoop, SyncSettings,
};
use common::{init_logging, FakePage, RecordingSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("http client")
}

#[tokio::test]
async fn fetcher_returns_body_text() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Player.java"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("class Player {}", "text/x-java; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/Player.java", server.uri());
    let output = fetcher(FetchSettings::default()).fetch(&url).await.expect("fetch ok");

    assert_eq!(output.text, "class Player {}");
    assert_eq!(output.status, 200);
    assert_eq!(output.byte_len, 15);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = fetcher(FetchSettings::default()).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let err = fetcher(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());

    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());

    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'a', 0xff, b'b']))
        .mount(&server)
        .await;

    let url = format!("{}/latin1", server.uri());
    let output = fetcher(FetchSettings::default()).fetch(&url).await.unwrap();
    assert_eq!(output.text, "a\u{fffd}b");
    assert_eq!(output.byte_len, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_loop_mirrors_a_served_file() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Player.java"))
        .respond_with(ResponseTemplate::new(200).set_body_string("class Player { int v = 1; }"))
        .mount(&server)
        .await;

    let page = FakePage::ide();
    let sync = SyncLoop::new(
        Arc::new(fetcher(FetchSettings::default())),
        page.clone(),
        RecordingSink::new(),
        Selectors::default(),
        SyncSettings {
            poll_interval: Duration::from_millis(20),
            playback_delay: Duration::from_millis(5),
        },
    );
    sync.start(format!("{}/Player.java", server.uri()), false);

    let deadline = Instant::now() + Duration::from_secs(5);
    while page.codes().is_empty() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // Let a few more ticks run; the unchanged body must not be re-dispatched.
    tokio::time::sleep(Duration::from_millis(150)).await;
    sync.stop();

    assert_eq!(page.codes(), vec!["class Player { int v = 1; }".to_string()]);
}
