use crate::net::{HttpClient, HttpRequest, HttpResponse};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Upper bound on a buffered response body. Remote media is held in memory
/// whole before it is sniffed and handed to the client.
pub const MAX_BODY_SIZE: u64 = 512 * 1024 * 1024;

/// HTTP client implementation using `ureq` for synchronous HTTP requests.
/// Since `ureq` is blocking, all requests are wrapped in `tokio::task::spawn_blocking`.
///
/// Error statuses are returned as responses, not as errors, so callers can
/// inspect `status_code`.
#[derive(Clone)]
pub struct UreqHttpClient {
    agent: ureq::Agent,
}

impl UreqHttpClient {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqHttpClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpClient for UreqHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            let response = match request.method.as_str() {
                "GET" => {
                    let mut req = agent.get(&request.url);
                    for (key, value) in &request.headers {
                        req = req.header(key, value);
                    }
                    req.call()?
                }
                "HEAD" => {
                    let mut req = agent.head(&request.url);
                    for (key, value) in &request.headers {
                        req = req.header(key, value);
                    }
                    req.call()?
                }
                method => {
                    return Err(anyhow::anyhow!("Unsupported HTTP method: {}", method));
                }
            };

            let status_code = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
                })
                .collect();

            let body = if request.method == "HEAD" {
                Vec::new()
            } else {
                let mut body = response.into_body();
                body.with_config().limit(MAX_BODY_SIZE).read_to_vec()?
            };

            Ok(HttpResponse {
                status_code,
                headers,
                body,
            })
        })
        .await?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serves a single HTTP/1.1 response on a loopback port and returns its URL.
    pub(crate) fn serve_once(status: &str, content_type: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );

        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            let mut is_head = false;
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                is_head |= line.starts_with("HEAD ");
            }
            let mut stream = reader.into_inner();
            stream.write_all(head.as_bytes()).unwrap();
            if !is_head {
                stream.write_all(&body).unwrap();
            }
            stream.flush().unwrap();
        });

        format!("http://{addr}/media")
    }

    #[tokio::test]
    async fn test_downloads_bodies_past_the_default_limit() {
        let size = 12 * 1024 * 1024;
        let mut payload = vec![0u8; size];
        payload[4..12].copy_from_slice(b"ftypisom");
        let url = serve_once("200 OK", "video/mp4", payload);

        let response = UreqHttpClient::new()
            .execute(HttpRequest::get(url))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.content_type(), Some("video/mp4"));
        assert_eq!(response.body.len(), size);
        assert_eq!(&response.body[4..12], b"ftypisom");
    }

    #[tokio::test]
    async fn test_error_status_is_returned_as_response() {
        let url = serve_once("404 Not Found", "text/plain", b"gone".to_vec());

        let response = UreqHttpClient::new()
            .execute(HttpRequest::get(url))
            .await
            .unwrap();

        assert_eq!(response.status_code, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_head_skips_body() {
        let url = serve_once("200 OK", "image/png", b"\x89PNG".to_vec());

        let response = UreqHttpClient::new()
            .execute(HttpRequest::head(url))
            .await
            .unwrap();

        assert_eq!(response.content_type(), Some("image/png"));
        assert!(response.body.is_empty());
    }
}
