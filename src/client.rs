use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::schema::{ClientError, Color, GameCreated, GameIdentifier, GameState, Result, StartGameRequest};

/// HTTP verbs used by the game API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A request as the client hands it to a [`Transport`]. `path` is relative
/// to the server root, e.g. `/api/games`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    /// JSON payload; sent with `Content-Type: application/json`.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Same rule as the fetch API's `Response.ok`.
    pub fn ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Something able to perform one HTTP exchange.
///
/// Futures are not required to be `Send`, browser fetch futures are not.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
impl<'a, T: Transport + ?Sized> Transport for &'a T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

/// Client for the chesstempo REST API.
///
/// Every call issues exactly one request. Calls are independent: nothing is
/// cached, retried or ordered, and two overlapping calls may complete in
/// any order.
#[derive(Debug, Clone)]
pub struct GameClient<T> {
    transport: T,
}

impl<T: Transport> GameClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Identifiers of every game the server knows about.
    pub async fn list_games(&self) -> Result<Vec<GameIdentifier>> {
        self.exchange(Method::Get, "/api/games".to_string(), None).await
    }

    pub async fn fetch_game(&self, id: &str) -> Result<GameState> {
        self.exchange(Method::Get, format!("/api/games/{}", id), None)
            .await
    }

    /// Resigns on behalf of the user. The acknowledgement shape is up to the
    /// server and is returned untouched.
    pub async fn resign_game(&self, id: &str) -> Result<Value> {
        self.exchange(Method::Post, format!("/api/games/{}/resign", id), None)
            .await
    }

    /// Starts a new game and returns its identifier. Omitted arguments are
    /// left for the server to pick.
    pub async fn start_game(&self, color: Option<Color>, fen: Option<&str>) -> Result<GameIdentifier> {
        let request = StartGameRequest {
            color,
            fen: fen.map(str::to_string),
        };
        let body = serde_json::to_string(&request).map_err(ClientError::Encode)?;
        let created: GameCreated = self
            .exchange(Method::Post, "/api/games".to_string(), Some(body))
            .await?;
        Ok(created.id)
    }

    /// Plays `orig` to `dest` (e.g. `"e2"`, `"e4"`). The squares are joined
    /// into the path as they are, so they must already be URL-safe.
    ///
    /// Resolves with the `id` field of the response, `None` when the server
    /// does not send one.
    pub async fn move_game(&self, id: &str, orig: &str, dest: &str) -> Result<Option<Value>> {
        let path = format!("/api/games/{}/move/{}{}", id, orig, dest);
        let mut data: Value = self.exchange(Method::Post, path, None).await?;
        Ok(data.get_mut("id").map(Value::take))
    }

    /// Sends one request and decodes the JSON body. The body must be JSON
    /// whatever the status, so a non-JSON error page is a decode error; its
    /// shape only matters once the status is ok.
    async fn exchange<R: DeserializeOwned>(&self, method: Method, path: String, body: Option<String>) -> Result<R> {
        debug!("{} {}", method.as_str(), path);
        let request = HttpRequest {
            method,
            path: path.clone(),
            body,
        };
        let response = self.transport.send(request).await?;
        let data: Value = serde_json::from_str(&response.body).map_err(ClientError::Decode)?;
        if !response.ok() {
            warn!("{} {} failed with status {}", method.as_str(), path, response.status);
            return Err(ClientError::RequestFailed {
                status: response.status,
            });
        }
        serde_json::from_value(data).map_err(ClientError::Decode)
    }
}
