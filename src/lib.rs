pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod kegg;
pub mod output;
pub mod parser;
pub mod report;
pub mod tui;
