pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod meter;
pub mod panel;
pub mod render;
