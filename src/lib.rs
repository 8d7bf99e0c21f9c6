pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod generate;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod trends;
