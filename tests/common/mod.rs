//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A workspace record in the lookup API's wire shape.
#[allow(dead_code)]
pub fn company_json(id: &str, subdomain: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("{} Inc", subdomain),
        "subdomain": subdomain,
        "description": null,
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-01T12:00:00Z",
    })
}

/// What the mock saw of a request.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SeenRequest {
    pub path: String,
    pub authorization: Option<String>,
}

/// Start a programmable mock API on an ephemeral port.
///
/// `f` maps each request to `(status, body)`; the body is sent as JSON.
pub async fn start_mock_api<F>(f: F) -> SocketAddr
where
    F: Fn(SeenRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(seen) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(seen);
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.lines();
    let path = lines.next()?.split_whitespace().nth(1)?.to_string();
    let authorization = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());

    Some(SeenRequest { path, authorization })
}

/// Lookup API serving `acme` (w1) and `beta` (w2), 404 for anything else.
///
/// `/companies/mine` answers with both, `beta` current, for any bearer.
#[allow(dead_code)]
pub async fn start_lookup_api() -> SocketAddr {
    start_mock_api(|req| {
        let path = req.path.trim_start_matches("/api");
        match path {
            "/companies/subdomain/acme" => (
                200,
                serde_json::json!({ "company": company_json("w1", "acme") }).to_string(),
            ),
            "/companies/subdomain/beta" => (
                200,
                serde_json::json!({ "company": company_json("w2", "beta") }).to_string(),
            ),
            "/companies/subdomain/broken" => (500, r#"{"error":"boom"}"#.to_string()),
            "/companies/mine" if req.authorization.is_some() => (
                200,
                serde_json::json!({
                    "companies": [company_json("w1", "acme"), company_json("w2", "beta")],
                    "current_company_id": "w2",
                })
                .to_string(),
            ),
            "/companies/mine" => (401, r#"{"error":"unauthorized"}"#.to_string()),
            _ => (404, r#"{"error":"not found"}"#.to_string()),
        }
    })
    .await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
