pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod deployment;
pub mod error;
pub mod models;
pub mod probe;
pub mod tools;
pub mod ui;
