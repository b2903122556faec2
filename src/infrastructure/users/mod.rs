//! User directory client

mod service;

pub use service::UserService;
