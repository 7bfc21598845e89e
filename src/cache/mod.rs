// src/cache/mod.rs
pub mod catalog;

pub use catalog::{join_map, MapCatalogCache};
