pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod languages;
pub mod model;
pub mod stats;
pub mod streak;
pub mod svg;
pub mod traffic;
