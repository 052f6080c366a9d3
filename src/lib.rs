//! Library crate for guess-game-back, exposing modules for binaries and integration tests.

pub mod config;
/// Persistence: entities, the store trait and its SQLite backend.
pub mod dao;
/// Forms, pages and JSON payloads exchanged with clients.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routers and handlers.
pub mod routes;
/// Business logic behind the handlers.
pub mod services;
/// Shared application state, round arithmetic and sessions.
pub mod state;
