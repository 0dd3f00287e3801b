use async_trait::async_trait;
use gloo::net::http::Request;

use crate::client::{HttpRequest, HttpResponse, Method, Transport};
use crate::schema::{ClientError, Result};

/// Fetch-based transport for code running in the browser. Paths are
/// resolved against the page's origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => Request::get(&request.path),
            Method::Post => Request::post(&request.path),
        };
        let request = match request.body {
            Some(body) => builder.header("Content-Type", "application/json").body(body),
            None => builder.build(),
        }
        .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    /// reqwest-based transport for native programs, talking to the server at
    /// `base_url`.
    #[derive(Debug, Clone)]
    pub struct NativeTransport {
        client: reqwest::Client,
        base_url: String,
    }

    impl NativeTransport {
        pub fn new(base_url: &str) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }
    }

    #[async_trait(?Send)]
    impl Transport for NativeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            let url = format!("{}{}", self.base_url, request.path);
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
            };
            let mut builder = self.client.request(method, url);
            if let Some(body) = request.body {
                builder = builder.header(CONTENT_TYPE, "application/json").body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            Ok(HttpResponse { status, body })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn base_url_loses_trailing_slash() {
            assert_eq!(NativeTransport::new("http://127.0.0.1:9999/").base_url(), "http://127.0.0.1:9999");
            assert_eq!(NativeTransport::new("http://localhost").base_url(), "http://localhost");
        }

        #[tokio::test]
        async fn unreachable_server_is_a_transport_error() {
            let port = std::net::TcpListener::bind("127.0.0.1:0")
                .unwrap()
                .local_addr()
                .unwrap()
                .port();
            let transport = NativeTransport::new(&format!("http://127.0.0.1:{}", port));
            let request = HttpRequest {
                method: Method::Get,
                path: "/api/games".to_string(),
                body: None,
            };

            let err = transport.send(request).await.unwrap_err();

            assert!(matches!(err, ClientError::Transport(_)));
        }
    }
}
