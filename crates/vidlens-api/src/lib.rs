//! HTTP client and wire models for the video analysis service.

pub mod client;
pub mod errors;
pub mod http;
pub mod models;

pub use client::AnalysisClient;
pub use errors::ApiError;
pub use models::{AnalysisResult, Chapter, Metric, Thumbnail, VideoMetadata};
