//! End-to-end tests for the reqwest transport against a local HTTP responder.

mod common;

use common::{quiet_options, wait_until, TestProxy};
use proxybench_core::endpoint::ProxyEndpoint;
use proxybench_core::error::ProxyBenchError;
use proxybench_core::options::FailurePolicy;
use proxybench_http::{
    HttpTransport, ProxyMethod, ProxyRequest, ProxyTransport, PublishPool, SweepRunner,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn test_transport() -> Arc<HttpTransport> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .no_proxy()
        .build()
        .unwrap();
    Arc::new(HttpTransport::with_client(client))
}

fn closed_port_url() -> String {
    let port = portpicker::pick_unused_port().expect("no free port");
    format!("http://127.0.0.1:{port}/")
}

#[tokio::test]
async fn test_extension_methods_on_the_wire() {
    let proxy = TestProxy::start(200).await.unwrap();
    let transport = test_transport();
    let endpoint = ProxyEndpoint::parse(&proxy.url()).unwrap();

    for method in [ProxyMethod::Subscribe, ProxyMethod::Unsubscribe, ProxyMethod::Post] {
        let request = ProxyRequest::new(
            method,
            42,
            endpoint.url_for(42),
            bytes::Bytes::from_static(br#"{"key":"K"}"#),
        );
        assert_eq!(transport.send(request).await.unwrap(), 200);
    }

    let seen = proxy.requests();
    let methods: Vec<&str> = seen.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["SUBSCRIBE", "UNSUBSCRIBE", "POST"]);
    assert!(seen.iter().all(|r| r.path == "/42"));
    assert!(seen.iter().all(|r| r.json()["key"] == "K"));
}

#[tokio::test]
async fn test_status_is_reported_not_raised() {
    let proxy = TestProxy::start(503).await.unwrap();
    let transport = test_transport();
    let endpoint = ProxyEndpoint::parse(&proxy.url()).unwrap();

    let request = ProxyRequest::new(
        ProxyMethod::Post,
        1,
        endpoint.url_for(1),
        bytes::Bytes::from_static(b"{}"),
    );
    assert_eq!(transport.send(request).await.unwrap(), 503);
}

#[tokio::test]
async fn test_subscribe_sweep_end_to_end() {
    let proxy = TestProxy::start(200).await.unwrap();
    let options = Arc::new(
        quiet_options()
            .with_listeners(3)
            .with_subscribe_endpoint(ProxyEndpoint::parse(&proxy.url()).unwrap()),
    );
    let runner = SweepRunner::new(test_transport(), options).unwrap();

    let report = runner.subscribe("K", &CancellationToken::new()).await.unwrap();
    assert_eq!(report.accepted, 3);

    let seen = proxy.requests();
    let paths: Vec<&str> = seen.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/0", "/1", "/2"]);
    assert!(seen.iter().all(|r| r.method == "SUBSCRIBE"));
    assert!(seen.iter().all(|r| r.body == br#"{"key":"K"}"#));
}

#[tokio::test]
async fn test_connection_refused_aborts_first_index() {
    let options = Arc::new(
        quiet_options()
            .with_base_hash(10)
            .with_listeners(5)
            .with_subscribe_endpoint(ProxyEndpoint::parse(&closed_port_url()).unwrap()),
    );
    let runner = SweepRunner::new(test_transport(), options).unwrap();

    let err = runner
        .subscribe("K", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyBenchError::Aborted { index: 10, .. }));
}

#[tokio::test]
async fn test_connection_refused_continue_records_all() {
    let options = Arc::new(
        quiet_options()
            .with_listeners(4)
            .with_failure_policy(FailurePolicy::Continue)
            .with_subscribe_endpoint(ProxyEndpoint::parse(&closed_port_url()).unwrap()),
    );
    let runner = SweepRunner::new(test_transport(), options).unwrap();

    let report = runner
        .unsubscribe("K", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.attempted, 4);
    assert_eq!(report.failures.len(), 4);
    assert!(report.failures[0].reason.starts_with("UNSUBSCRIBE /0 failed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_publish_pool_end_to_end() {
    let proxy = TestProxy::start(200).await.unwrap();
    let options = Arc::new(
        quiet_options()
            .with_listeners(10)
            .with_workers(4)
            .with_publish_endpoint(ProxyEndpoint::parse(&proxy.url()).unwrap()),
    );
    let pool = PublishPool::new(test_transport(), options).unwrap();
    let stats = pool.stats();
    let cancel = CancellationToken::new();
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move { pool.run(cancel).await }
    });

    assert!(wait_until(Duration::from_secs(5), || stats.attempts() >= 50).await);
    cancel.cancel();
    let summary = run.await.unwrap();
    assert!(summary.accepted >= 40);

    let seen = proxy.requests();
    assert!(seen.iter().all(|r| r.method == "POST"));
    for request in &seen {
        let index: u64 = request.path.trim_start_matches('/').parse().unwrap();
        assert!(index < 10);
        assert_eq!(request.body, br#"{"data":"YQ==","id":"0","type":0}"#);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_publish_pool_survives_refused_connections() {
    let options = Arc::new(
        quiet_options()
            .with_workers(2)
            .with_publish_endpoint(ProxyEndpoint::parse(&closed_port_url()).unwrap()),
    );
    let pool = PublishPool::new(test_transport(), options).unwrap();
    let stats = pool.stats();
    let cancel = CancellationToken::new();
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move { pool.run(cancel).await }
    });

    assert!(wait_until(Duration::from_secs(5), || stats.attempts() >= 20).await);
    assert_eq!(stats.active_workers(), 2);
    cancel.cancel();
    let summary = run.await.unwrap();
    assert!(summary.failed >= 19);
}
