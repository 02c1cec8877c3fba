use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lasertime::{
    analyze_files, init_logging, load_config, render_reports, OutputFormat, StudyConfig,
    StudyOverrides, BUILD_DATE, VERSION,
};
use tracing::{debug, info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "lasertime")]
#[command(about = "Machining time study for laser/plasma NC programs")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate machining time for one or more programs
    Analyze {
        /// Program files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Config file (TOML or JSON); defaults to the user config if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: StudyOverrides,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default config file
    InitConfig {
        /// Destination; defaults to the user config location
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Analyze {
            files,
            config,
            overrides,
            format,
            output,
        } => {
            let config = load_config(config.as_deref(), &overrides)
                .context("failed to load configuration")?;
            let reports = analyze_files(&files, &config);
            let rendered = render_reports(&reports, format)?;

            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", rendered.trim_end()),
            }

            let failures = reports.iter().filter(|r| r.is_failure()).count();
            if failures > 0 {
                info!("{} of {} files failed", failures, reports.len());
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(StudyConfig::default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            StudyConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote default configuration to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;
    debug!("lasertime {} built {}", VERSION, BUILD_DATE);
    run(cli)
}
