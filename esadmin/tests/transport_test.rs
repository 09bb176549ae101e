//! Transport-level behaviour: retry with backoff, exhaustion, per-attempt
//! timeouts and the shard listing deadline.
//!
//! These tests use raw `TcpListener` doubles so a node can drop connections,
//! stall, or disappear, which a well-behaved HTTP server cannot do.

use esadmin::{AdminClient, AdminConfig, AdminError, RetryConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const SETTINGS_BODY: &str = r#"{"ai":{"settings":{"index":{"number_of_shards":"5"}}}}"#;

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_backoff_ms: 10,
        max_backoff_ms: 40,
        multiplier: 2.0,
    }
}

/// Read until the end of the request head.
async fn read_request_head(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(head)
}

async fn write_json_response(socket: &mut TcpStream, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

/// A node that hangs up on the first `drop_first` connections after reading
/// the request, then answers every later one with `body`.
async fn start_flaky_node(drop_first: usize, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::spawn(async move {
                let _ = read_request_head(&mut socket).await;
                if seen > drop_first {
                    let _ = write_json_response(&mut socket, body).await;
                }
            });
        }
    });

    (format!("http://{}", addr), connections)
}

/// An address nothing listens on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_dropped_connections_are_retried() {
    let (base_url, connections) = start_flaky_node(2, SETTINGS_BODY).await;
    let config = AdminConfig::new(vec![base_url], "ai").with_retry(fast_retry(3));
    let client = AdminClient::new(config).unwrap();

    let doc = client.settings(0).await.unwrap();
    assert!(doc.contains_key("ai"));
    assert_eq!(connections.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_exhausted_surface_transport_error() {
    let config = AdminConfig::new(vec![closed_port().await], "ai").with_retry(fast_retry(2));
    let client = AdminClient::new(config).unwrap();

    let err = client.flush(0).await.unwrap_err();
    match &err {
        AdminError::Transport { attempts, url, .. } => {
            assert_eq!(*attempts, 3);
            assert!(url.ends_with("/ai/_flush"), "{}", url);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    assert_eq!(err.error_type(), "transport");
}

#[tokio::test]
async fn test_truncated_body_is_body_error_without_retry() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = read_request_head(&mut socket).await;
            // Promise more bytes than are sent, then hang up.
            let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 1000\r\n\r\n";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(br#"{"ai":{"sett"#).await;
            let _ = socket.shutdown().await;
        }
    });

    let config = AdminConfig::new(vec![format!("http://{}", addr)], "ai").with_retry(fast_retry(3));
    let client = AdminClient::new(config).unwrap();

    let err = client.settings(0).await.unwrap_err();
    match &err {
        AdminError::Body { url, .. } => assert!(url.ends_with("/ai/_settings"), "{}", url),
        other => panic!("expected body error, got {:?}", other),
    }
    assert_eq!(err.error_type(), "transport");
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_backoff_delays_are_applied() {
    let retry = RetryConfig {
        max_retries: 2,
        initial_backoff_ms: 100,
        max_backoff_ms: 1000,
        multiplier: 2.0,
    };
    let config = AdminConfig::new(vec![closed_port().await], "ai").with_retry(retry);
    let client = AdminClient::new(config).unwrap();

    let start = Instant::now();
    let err = client.settings(0).await.unwrap_err();
    assert!(matches!(err, AdminError::Transport { attempts: 3, .. }));
    // 100ms before the second attempt, 200ms before the third.
    assert!(start.elapsed() >= Duration::from_millis(300), "{:?}", start.elapsed());
}

#[tokio::test]
async fn test_no_retry_policy_makes_one_attempt() {
    let (base_url, connections) = start_flaky_node(1, SETTINGS_BODY).await;
    let config = AdminConfig::new(vec![base_url], "ai").with_retry(RetryConfig::none());
    let client = AdminClient::new(config).unwrap();

    let err = client.settings(0).await.unwrap_err();
    assert!(matches!(err, AdminError::Transport { attempts: 1, .. }), "{:?}", err);
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stalled_attempt_times_out_and_is_retried() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        let mut stalled = Vec::new();
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let _ = read_request_head(&mut socket).await;
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                // Never answer the first attempt.
                stalled.push(socket);
            } else {
                let _ = write_json_response(&mut socket, SETTINGS_BODY).await;
            }
        }
    });

    let config = AdminConfig::new(vec![format!("http://{}", addr)], "ai")
        .with_retry(fast_retry(1))
        .with_request_timeout(Duration::from_millis(200));
    let client = AdminClient::new(config).unwrap();

    client.settings(0).await.unwrap();
    assert_eq!(connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shard_deadline_cancels_and_releases_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (released_tx, released_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = read_request_head(&mut socket).await;
        // Stall without answering, and report when the client hangs up.
        let mut buf = [0u8; 64];
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = released_tx.send(Instant::now());
    });

    let config = AdminConfig::new(vec![format!("http://{}", addr)], "ai")
        .with_retry(RetryConfig::none())
        .with_shard_timeout(Duration::from_millis(300));
    let client = AdminClient::new(config).unwrap();

    let start = Instant::now();
    let err = client.shard_info(0).await.unwrap_err();
    let returned = Instant::now();

    match &err {
        AdminError::Timeout { url, timeout } => {
            assert_eq!(*timeout, Duration::from_millis(300));
            assert!(url.contains("/_cat/shards/ai"), "{}", url);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(err.error_type(), "timeout");
    assert!(returned - start < Duration::from_secs(5));

    let released_at = tokio::time::timeout(Duration::from_secs(5), released_rx)
        .await
        .expect("connection was not released after the deadline")
        .unwrap();
    assert!(released_at >= start + Duration::from_millis(300));
}
