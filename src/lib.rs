//! Rotating live ticker display.
//!
//! Keeps the latest 24h ticker for a set of trading pairs, streamed over
//! a WebSocket feed, and presents one pair at a time on a fixed rotation.
//! Ingestion ([`feed`]), the shared cache ([`store`]), rotation
//! ([`rotation`]) and presentation ([`presentation`]) run on independent
//! schedules wired together by [`app`].

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod models;
pub mod presentation;
pub mod rotation;
pub mod store;

pub use error::{DecodeError, Result, TickerError};
