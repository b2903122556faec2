//! Content backend client

mod service;

pub use service::ItemService;
