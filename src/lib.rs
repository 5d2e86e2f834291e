pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod observation;
pub mod output;
pub mod parser;
