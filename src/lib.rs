pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod orchestrator;
pub mod page;
pub mod report;
pub mod schema;
pub mod session;
pub mod site;
pub mod spotify;
