pub mod cache;
pub mod config;
pub mod persistence;
pub mod security;
