//! CLI subcommand implementations for the Beacon binary.

pub mod keys_cmd;
pub mod recommend_cmd;
pub mod serve_cmd;
