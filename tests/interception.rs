//! End-to-end interception tests against a running proxy.

use std::time::Duration;

use reqwest::StatusCode;
use scope_proxy::config::ProxyConfig;
use scope_proxy::playground::{ControlMessage, PlaygroundData};

mod common;

fn config(patterns: &[&str]) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.blocklist.patterns = patterns.iter().map(|p| p.to_string()).collect();
    config
}

#[tokio::test]
async fn test_blocked_request_never_reaches_backend() {
    let backend = common::start_mock_backend("text/plain", "hello").await;
    let proxy = common::start_proxy(config(&["127.0.0.1/ads/*"])).await;
    let client = common::client();

    let res = client
        .get(proxy.proxied(&backend.url("/ads/banner")))
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.headers()["content-type"], "text/plain;charset=UTF-8");
    assert_eq!(res.text().await.unwrap(), "Site Blocked");
    assert_eq!(backend.hits(), 0);

    let res = client.get(proxy.proxied(&backend.url("/page"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "hello");
    assert_eq!(backend.hits(), 1);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_html_pass_through_has_exact_length() {
    let backend = common::start_mock_backend("text/html; charset=utf-8", "<p>héllo wörld</p>").await;
    let proxy = common::start_proxy(config(&[])).await;

    let res = common::client()
        .get(proxy.proxied(&backend.url("/")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let declared: usize = res
        .headers()
        .get("content-length")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let body = res.bytes().await.unwrap();
    assert_eq!(declared, body.len());
    assert_eq!(body, "<p>héllo wörld</p>".as_bytes());

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_playground_origin_is_answered_locally() {
    let backend = common::start_mock_backend("text/plain", "from network").await;
    let proxy = common::start_proxy(config(&[])).await;
    let client = common::client();

    let message = ControlMessage::PlaygroundData(PlaygroundData {
        origin: backend.url("/"),
        html: "<h1>Hi</h1>".into(),
        css: "h1 { color: red }".into(),
        js: "console.log('hi')".into(),
    });
    let res = client
        .post(proxy.url("/__scope/message"))
        .json(&message)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(proxy.proxied(&backend.url("/"))).send().await.unwrap();
    assert_eq!(res.headers()["content-type"], "text/html");
    assert_eq!(res.text().await.unwrap(), "<h1>Hi</h1>");

    let res = client
        .get(proxy.proxied(&backend.url("/script.js")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "application/javascript");

    let res = client
        .get(proxy.proxied(&backend.url("/missing.png")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-type").is_none());
    assert!(res.bytes().await.unwrap().is_empty());

    assert_eq!(backend.hits(), 0, "claimed origin must not reach the network");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_new_playground_replaces_old_origin() {
    let backend = common::start_mock_backend("text/plain", "from network").await;
    let proxy = common::start_proxy(config(&[])).await;
    let client = common::client();

    for origin in [backend.url("/"), "https://play.example/".to_string()] {
        let message = ControlMessage::PlaygroundData(PlaygroundData {
            origin,
            html: "<h1>Hi</h1>".into(),
            css: String::new(),
            js: String::new(),
        });
        client
            .post(proxy.url("/__scope/message"))
            .json(&message)
            .send()
            .await
            .unwrap();
    }

    // The backend origin is no longer claimed, so it passes through.
    let res = client.get(proxy.proxied(&backend.url("/"))).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "from network");
    assert_eq!(backend.hits(), 1);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_excluded_request_bypasses_engine() {
    let site = common::start_mock_backend("text/plain", "site").await;
    let mut config = config(&[".doubleclick.net"]);
    config.dispatch.exclusions = vec!["supabase.co".into()];
    config.site.upstream = Some(site.url("/"));
    let proxy = common::start_proxy(config).await;

    // Would be blocked if the engine saw it.
    let res = common::client()
        .get(proxy.proxied("https://ads.doubleclick.net/x.supabase.co"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "site");
    assert_eq!(site.hits(), 1);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_unclaimed_request_goes_to_site() {
    let site = common::start_mock_backend("text/html", "<html>index</html>").await;
    let mut config = config(&[]);
    config.site.upstream = Some(site.url("/"));
    let proxy = common::start_proxy(config).await;

    let res = common::client()
        .get(proxy.url("/ixlmath/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<html>index</html>");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let proxy = common::start_proxy(config(&[])).await;

    let res = common::client()
        .get(proxy.proxied("http://127.0.0.1:1/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let proxy = common::start_proxy(config(&[])).await;
    proxy.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), proxy.task)
        .await
        .expect("server should stop after shutdown");
    assert!(result.unwrap().is_ok());
}
