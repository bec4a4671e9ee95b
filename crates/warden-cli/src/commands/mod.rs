//! CLI command handlers

pub mod access;
pub mod catalog;
pub mod common;
pub mod identity;
