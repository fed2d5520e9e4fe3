pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

pub use adapters::http::{router, state::HttpState};
