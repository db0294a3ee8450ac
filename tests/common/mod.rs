//! Shared utilities for integration testing.

use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock Nominatim service. `respond` receives the decoded `q`
/// parameter of each search and returns status and body.
pub async fn start_mock_nominatim<F>(respond: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let query = search_query(&head).unwrap_or_default();
                        let (status, body) = respond(&query);
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    while read < buf.len() {
        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf[..read]).into_owned()
}

fn search_query(head: &str) -> Option<String> {
    let target = head.lines().next()?.split_whitespace().nth(1)?;
    let (_, query) = target.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
}

/// Nominatim jsonv2 body for `(display_name, lat, lon)` records.
pub fn records(places: &[(&str, &str, &str)]) -> String {
    let records: Vec<_> = places
        .iter()
        .map(|(name, lat, lon)| {
            json!({
                "place_id": 1,
                "display_name": name,
                "lat": lat,
                "lon": lon,
                "importance": 0.9,
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

/// A small fixed gazetteer; anything unknown finds nothing.
#[allow(dead_code)]
pub fn gazetteer(query: &str) -> (u16, String) {
    let body = match query {
        "Par" | "Pari" => records(&[
            ("Paris, Île-de-France, France", "48.8588897", "2.3200410"),
            ("Paris, Lamar County, Texas, United States", "33.6617962", "-95.5555130"),
        ]),
        "Paris" => records(&[("Paris, Île-de-France, France", "48.8588897", "2.3200410")]),
        "London" => records(&[("London, Greater London, England, United Kingdom", "51.5074456", "-0.1277653")]),
        "Lyon" => records(&[("Lyon, Auvergne-Rhône-Alpes, France", "45.7578137", "4.8320114")]),
        _ => records(&[]),
    };
    (200, body)
}

/// HTTP client that never goes through a system proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
