//! HTTP server module for the night sky engine.
//!
//! This module provides an axum-based HTTP server that exposes the engine as
//! a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  SkyEngine (services/)                                    │
//! │  - Address resolution and observer frame                  │
//! │  - Transform, visibility, constellation assembly          │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  CatalogStore (catalog/)                                  │
//! │  - Read-only stars and constellation lines                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Routes:
//!
//! - `GET /health`
//! - `POST /v1/sky`

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
