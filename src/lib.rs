// src/lib.rs

//! feedwatch Library
//!
//! Fetches remote feeds with retries, normalizes their items and tracks
//! how reliable each source has been.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};
pub use services::FeedService;
