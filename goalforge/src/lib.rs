//! GoalForge library
//!
//! This library exposes the core functionality of GoalForge for testing
//! and for the `goalforge` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod notify;
pub mod services;
pub mod session;
pub mod views;
