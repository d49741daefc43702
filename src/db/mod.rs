//! SQLite price store.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - The `Repository` backing the SQLite price cache

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
