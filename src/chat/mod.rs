//! Chat relay service module
//!
//! Accepts a text message and an optional image, turns them into a
//! multimodal message and relays it to the agent.
//!
//! # Endpoints
//! - `POST /chat` - form fields `message` (text) and `image` (file, optional)
//!
//! # Request lifecycle
//! `Received → Validated → Encoded → Dispatched → Responded`, leaving early
//! on an empty request, an unreadable image or an agent failure.
//!
//! # Usage example
//! ```rust,ignore
//! let state = chat::AppState::new(agent);
//! let app = chat::create_router(state, 10 * 1024 * 1024);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! ```

mod encoder;
mod error;
mod extract;
mod gateway;
mod handlers;
mod mapper;
mod middleware;
mod router;
pub mod types;
mod validator;

pub use middleware::AppState;
pub use router::create_router;
