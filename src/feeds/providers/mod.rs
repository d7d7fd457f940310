// src/feeds/providers/mod.rs
pub mod json_feed;
