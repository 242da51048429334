// file: src/exporter/mod.rs
// description: report exporter module exports

pub mod json;

pub use json::JsonExporter;
