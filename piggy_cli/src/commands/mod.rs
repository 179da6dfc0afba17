//! CLI subcommand implementations.

pub mod login;
pub mod repo;
pub mod transactions;
