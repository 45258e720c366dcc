//! Integration tests: the OpenRouter client against a local HTTP stub (pd-ai).
//!
//! Each stub accepts exactly one connection, records the raw request and
//! answers with a canned response.

use pd_ai::{AspectRatio, GatewayConfig, GenerateError, GenerateRequest, ImageGateway, OpenRouterGateway};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct Captured {
    head: String,
    body: serde_json::Value,
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).into_owned();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                let body = &buf[end + 4..end + 4 + content_length];
                return Captured {
                    head: text[..end].to_ascii_lowercase(),
                    body: serde_json::from_slice(body).unwrap_or(serde_json::Value::Null),
                };
            }
        }
    }
    panic!("connection closed before a full request arrived");
}

/// Serve one request; returns the base URL and a handle yielding the request.
async fn stub(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        captured
    });
    (format!("http://{addr}/api/v1"), handle)
}

fn gateway(base_url: &str) -> OpenRouterGateway {
    OpenRouterGateway::new(
        GatewayConfig::default()
            .with_api_key("sk-or-test")
            .with_base_url(base_url),
    )
}

// ─── Success ────────────────────────────────────────────────────────────

#[tokio::test]
async fn posts_generation_request_and_returns_url() {
    let (base, server) = stub("200 OK", r#"{"data":[{"url":"https://cdn.example/fox.png"}]}"#).await;
    let request = GenerateRequest::new("a red fox in the snow", AspectRatio::Portrait);

    let image = gateway(&base).generate(&request).await.unwrap();
    assert_eq!(image.image_url, "https://cdn.example/fox.png");

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post /api/v1/images/generations http/1.1"));
    assert!(captured.head.contains("authorization: bearer sk-or-test"));
    assert!(captured.head.contains("http-referer: http://localhost:3000"));
    assert!(captured.head.contains("x-title: poster draft"));
    assert_eq!(
        captured.body,
        serde_json::json!({
            "model": "black-forest-labs/flux-1.1-pro",
            "prompt": "a red fox in the snow",
            "n": 1,
            "size": "1024x1792",
        })
    );
}

// ─── Failures ───────────────────────────────────────────────────────────

#[tokio::test]
async fn upstream_error_keeps_status_and_body() {
    let (base, server) = stub("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
    let err = gateway(&base)
        .generate(&GenerateRequest::new("poster", AspectRatio::Square))
        .await
        .unwrap_err();
    match err {
        GenerateError::Upstream { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn success_without_image_is_empty_result() {
    let (base, server) = stub("200 OK", r#"{"data":[]}"#).await;
    let err = gateway(&base)
        .generate(&GenerateRequest::new("poster", AspectRatio::Square))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::EmptyResult));
    server.await.unwrap();
}

#[tokio::test]
async fn empty_prompt_and_missing_key_fail_before_any_request() {
    // Nothing listens here; reaching the network would surface as Transport
    let unreachable = "http://127.0.0.1:9/api/v1";

    let err = gateway(unreachable)
        .generate(&GenerateRequest::new("", AspectRatio::Square))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::EmptyPrompt));

    let keyless = OpenRouterGateway::new(GatewayConfig::default().with_base_url(unreachable));
    let err = keyless
        .generate(&GenerateRequest::new("poster", AspectRatio::Square))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::MissingCredential));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway(&format!("http://{addr}"))
        .generate(&GenerateRequest::new("poster", AspectRatio::Square))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Transport(_)));
}
