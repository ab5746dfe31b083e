pub mod client;
pub mod models;
pub mod response;

pub use client::ChatClient;
pub use models::{ModelList, RequestBody};
