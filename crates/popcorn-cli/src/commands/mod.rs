pub mod browse;
pub mod config;
pub mod context;
pub mod prompts;
pub mod search;
pub mod show;
pub mod spinner;
pub mod title;
pub mod watched;
