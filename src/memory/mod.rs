pub mod cache_store;
pub mod tracker;
