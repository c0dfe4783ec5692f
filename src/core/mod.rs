pub mod api_key;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod llm;
pub mod paths;
pub mod persistence;
pub mod quiz;
pub mod util;
