//! Data module - CSV loading for the analysis tools

mod loader;

pub use loader::{numeric_values, DataLoader, LoaderError};
