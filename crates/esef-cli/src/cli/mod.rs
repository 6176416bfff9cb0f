//! CLI for the ESEF filing archiver.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use esef_core::config::{self, EsefConfig};
use std::path::PathBuf;

use commands::{run_completions, run_list, run_show_config, run_sync};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "esef")]
#[command(about = "Mirror ESEF filing packages from filings.xbrl.org", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Values that override `config.toml` for one invocation.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Filing service root URL (must end with '/').
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// `page[size]` for the index request.
    #[arg(long, value_name = "N")]
    pub page_size: Option<u64>,
}

impl Overrides {
    fn apply(&self, cfg: &mut EsefConfig) {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(n) = self.page_size {
            cfg.page_size = n;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the filing index and download every package not yet in the archive.
    Sync {
        /// Archive root directory (defaults to `archive_root` from the config).
        #[arg(long, value_name = "DIR")]
        archive_dir: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Fetch the filing index and print it without downloading.
    List {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Show the config file location and effective settings.
    Config,

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            // Needs no config; works before the config dir exists.
            CliCommand::Completions { shell } => run_completions(shell),
            command => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                command.run(cfg)
            }
        }
    }

    fn run(self, mut cfg: EsefConfig) -> Result<()> {
        match self {
            CliCommand::Sync {
                archive_dir,
                overrides,
            } => {
                overrides.apply(&mut cfg);
                if let Some(dir) = archive_dir {
                    cfg.archive_root = dir;
                }
                cfg.validate()?;
                run_sync(&cfg)
            }
            CliCommand::List { overrides } => {
                overrides.apply(&mut cfg);
                cfg.validate()?;
                run_list(&cfg)
            }
            CliCommand::Config => run_show_config(&cfg),
            CliCommand::Completions { shell } => run_completions(shell),
        }
    }
}
