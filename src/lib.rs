pub mod client;
pub mod config;
pub mod router;
pub mod schema;
pub mod transport;

pub use client::{GameClient, HttpRequest, HttpResponse, Method, Transport};
pub use config::ClientConfig;
pub use router::{LoadStrategy, RouteMatch, RouteSpec, Router, ViewId, ROUTES};
pub use schema::{ClientError, Color, GameCreated, GameIdentifier, GameState, Result, StartGameRequest, Turn};
pub use transport::BrowserTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::NativeTransport;

/// Position used by `--demo`: the final decisive game of the 2014 Carlsen vs.
/// Anand World Championship match.
pub const DEMO_FEN: &str = "8/4b3/4P3/1k4P1/8/ppK5/8/4R3 b - - 1 45";
