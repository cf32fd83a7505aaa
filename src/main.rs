// Copyright 2026 Beacon Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use beacon::cli;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "beacon",
    about = "Beacon — growth-service recommendation API",
    version,
    after_help = "Run 'beacon <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on (overrides BEACON_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Keep usage counters in memory and skip the audit log
        #[arg(long)]
        ephemeral: bool,
    },
    /// Score the catalog once from the command line
    Recommend {
        /// Company industry (e.g. "publishing")
        #[arg(long)]
        industry: String,
        /// Business goal (e.g. "lead generation")
        #[arg(long)]
        goal: String,
        /// Company size bucket (e.g. "11-50", "enterprise")
        #[arg(long, default_value = "")]
        company_size: String,
        /// Website to scan for signals
        #[arg(long)]
        url: Option<String>,
        /// Maximum number of services returned
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// List configured API clients (keys are masked)
    Keys,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, ephemeral } => {
            cli::serve_cmd::run(port, ephemeral, cli.verbose).await
        }
        Commands::Recommend {
            industry,
            goal,
            company_size,
            url,
            max_results,
        } => {
            cli::recommend_cmd::run(
                &industry,
                &goal,
                &company_size,
                url.as_deref(),
                max_results,
                cli.json,
            )
            .await
        }
        Commands::Keys => cli::keys_cmd::run(cli.json),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "beacon", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
