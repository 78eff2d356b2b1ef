pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod genres;
pub mod languages;
pub mod logging;
pub mod model;
pub mod ndjson;
pub mod pipeline;
pub mod source;
pub mod years;
