//! Search backend client

mod service;

pub use service::SearchService;
