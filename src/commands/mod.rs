//! CLI command implementations.
//!
//! - **generate**: run the pipeline and write diagrams
//! - **inspect**: show what a coverage file looks like to the parsers
//! - **init**: write a default `.covdiagram.toml`

pub mod generate;
pub mod init;
pub mod inspect;

pub use generate::{handle_generate, plan_outputs, resolve_settings, GenerateArgs, GenerateSettings};
pub use init::init_config;
pub use inspect::inspect_coverage_file;
