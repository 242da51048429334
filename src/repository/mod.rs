// file: src/repository/mod.rs
// description: Source tree discovery module exports
// reference: Internal module structure

pub mod scanner;

pub use scanner::{FileScanner, ScannedFile, dotted_extension};
