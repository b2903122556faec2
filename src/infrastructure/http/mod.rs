//! HTTP transport shared by the backend services

mod client;

pub use client::{ApiClient, NO_QUERY};
