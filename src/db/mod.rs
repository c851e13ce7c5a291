//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - A key/value repository implementing [`crate::store::KeyValueStore`]

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
