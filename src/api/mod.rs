//! Scheduling service API.

mod client;

pub use client::{ApiClient, ApiError, ApiResult, UserInfo};
