use anyhow::Result;
use clap::Parser;
use covdiagram::cli::{Cli, Commands};
use covdiagram::commands::{self, GenerateArgs};
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Generate {
            coverage_file,
            output,
            max_depth,
            min_coverage,
            base_path,
            src_only,
            exclude_paths,
            chart_type,
            separate_files,
            format,
            no_summary,
            config,
            color,
            verbosity: _,
        } => commands::handle_generate(GenerateArgs {
            coverage_file,
            output,
            max_depth,
            min_coverage,
            base_path,
            src_only,
            exclude_paths,
            chart_type,
            separate_files,
            format,
            no_summary,
            config,
            color,
        }),
        Commands::Inspect { file, .. } => commands::inspect_coverage_file(&file),
        Commands::Init { force } => commands::init_config(force),
    }
}

/// `-v` count picks the level; `RUST_LOG` wins when set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
