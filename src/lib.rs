pub mod api;
pub mod batch;
pub mod extractor;
pub mod models;
pub mod sink;
pub mod symbols;
