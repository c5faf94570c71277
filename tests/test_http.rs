// ABOUTME: Integration tests for HttpRequester against a throwaway local server

use std::time::Duration;

use amdr_welcome::http::{HttpError, HttpEvent, HttpRequester, RequestOptions};
use reqwest::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one connection, answering with the raw request head as the body
async fn echo_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let body = String::from_utf8_lossy(&head).into_owned();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nX-Robot: amdr\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/")
}

/// Accept one connection and never answer
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_request_returns_status_headers_and_body() {
    let url = echo_server("200 OK").await;
    let (requester, _events) = HttpRequester::from_url(url.clone(), Method::GET);

    let response = requester
        .send(None, None, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.url, url);
    assert_eq!(response.header("x-robot"), Some("amdr"));
    assert!(response.body.starts_with("GET / HTTP/1.1"));
}

#[tokio::test]
async fn test_overrides_method_path_query_and_headers() {
    let base = echo_server("201 Created").await;
    let (requester, _events) = HttpRequester::from_url("http://unused.invalid/", Method::GET);

    let response = requester
        .send(
            Some(&format!("{base}status")),
            Some(Method::POST),
            RequestOptions {
                headers: vec![("X-Token".to_string(), "abc".to_string())],
                query: vec![("mode".to_string(), "full".to_string())],
                body: Some("ping".to_string()),
                timeout: Some(Duration::from_secs(5)),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert!(response.body.starts_with("POST /status?mode=full HTTP/1.1"));
    assert!(response.body.to_ascii_lowercase().contains("x-token: abc"));
}

#[tokio::test]
async fn test_empty_url_falls_back_to_stored_one() {
    let url = echo_server("200 OK").await;
    let (requester, _events) = HttpRequester::from_url(url, Method::GET);

    let response = requester
        .send(Some("   "), None, RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_error_status_is_not_a_failure() {
    let url = echo_server("503 Service Unavailable").await;
    let (requester, _events) = HttpRequester::from_url(url, Method::GET);

    let response = requester
        .send(None, None, RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(response.status, 503);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_invalid_url() {
    let (requester, _events) = HttpRequester::from_url("not a url", Method::GET);

    let err = requester
        .send(None, None, RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::InvalidUrl { ref url, .. } if url == "not a url"));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (requester, _events) = HttpRequester::from_url(format!("http://{addr}/"), Method::GET);
    let err = requester
        .send(None, None, RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn test_timeout() {
    let url = silent_server().await;
    let (requester, _events) = HttpRequester::from_url(url, Method::GET);

    let err = requester
        .send(
            None,
            None,
            RequestOptions {
                timeout: Some(Duration::from_millis(200)),
                ..RequestOptions::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn test_make_request_emits_events() {
    let url = echo_server("200 OK").await;
    let (requester, mut events) = HttpRequester::from_url(url, Method::GET);

    requester.make_request(None, None, RequestOptions::default()).await;
    match events.recv().await {
        Some(HttpEvent::Completed(response)) => assert_eq!(response.status, 200),
        other => panic!("expected completion, got {:?}", other),
    }

    requester
        .make_request(Some("::bad::"), None, RequestOptions::default())
        .await;
    assert!(matches!(
        events.recv().await,
        Some(HttpEvent::Failed(HttpError::InvalidUrl { .. }))
    ));
}
