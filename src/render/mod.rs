//! Text output for pipeline results.
//!
//! The pipeline stops at structured descriptions; this module turns them
//! into Mermaid markup and terminal summaries.

pub mod mermaid;
pub mod summary;

pub use mermaid::{per_folder_path, render, render_combined, sanitize_filename};
pub use summary::{overall_line, render_summary, sample_files, summary_table};
