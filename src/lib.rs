//! `demand_tracker` - client demand tracking library
//!
//! This crate provides the core functionality for the `demands` CLI tool.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`model`] - Data types (Demand, Client, TeamMember, Records)
//! - [`repository`] - CRUD operations over a record store
//! - [`filter`] - Filtering and ordering of demand lists
//! - [`storage`] - Memory, CSV, JSON and `SQLite` record stores
//! - [`export`] - CSV/JSON export
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON, CSV codec)
//! - [`cli`] - Command-line interface using clap

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod logging;
pub mod model;
pub mod repository;
pub mod storage;

pub use error::{DemandError, ErrorCode, Result, StructuredError};
pub use model::{Client, Demand, DemandFields, Priority, Records, Status, TeamMember};
pub use repository::Repository;
