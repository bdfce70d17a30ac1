//! Roster Data-Access Library
//!
//! This library provides a persistence layer for members and teams,
//! including domain entities, repositories, and a typed query layer
//! over SQLite.

pub mod domain;
pub mod infrastructure;
pub mod queries;
