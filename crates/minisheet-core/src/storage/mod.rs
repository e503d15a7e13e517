//! File format readers and writers.

pub mod csv;

pub use csv::{parse_csv, read_csv_file, write_csv, write_csv_file};
