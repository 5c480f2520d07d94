//! Common library for the Ekklesia application
//!
//! This crate provides shared functionality used across the Ekklesia
//! services, including the PostgreSQL store connectivity, the local
//! Redis cache, and the store error taxonomy.

pub mod cache;
pub mod database;
pub mod error;
