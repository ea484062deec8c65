//! Persistence and seeding backend for a swipe-based movie picker.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod seed;
