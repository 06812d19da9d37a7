//! # Night Sky Engine
//!
//! Computes which stars and constellations are overhead for a place and a
//! local date/time, projected onto a zenith-centered chart.
//!
//! ## Pipeline
//!
//! 1. **Address resolution**: free text to coordinates, regional geocoder
//!    first for Korean queries, global geocoder as fallback
//! 2. **Observer frame**: timezone lookup and local-to-UTC conversion
//! 3. **Coordinate transform**: sidereal time, alt/az, stereographic x/y
//! 4. **Visibility**: magnitude cut for plotting, horizon cut for constellations
//! 5. **Constellation assembly**: visible line segments and one weighted
//!    position per constellation
//!
//! ## Architecture
//!
//! - [`api`]: shared data model
//! - [`catalog`]: Hipparcos and constellation line-table loaders
//! - [`geocoding`]: geocoding providers and the fallback resolver
//! - [`services`]: the computation stages and [`services::SkyEngine`]
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

// SkyError::AddressNotFound carries the provider attempt list
#![allow(clippy::result_large_err)]

#[macro_use]
pub mod models;

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use api::{RawQuery, SkySnapshot};
pub use error::{SkyError, SkyResult};
pub use services::SkyEngine;
