//! # debugbar
//!
//! Demonstration host for the Debug Bar overlay: an axum server with a small
//! item store whose activity the overlay's panels report, plus a CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod facts;
pub mod page;
pub mod store;
