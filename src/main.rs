//! webharness CLI
//!
//! Runs YAML browser scenarios against a headless Chrome instance, or
//! validates scenario files without launching a browser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use webharness::common::config::Config;
use webharness::common::logging;
use webharness::page::BrowserSession;
use webharness::scenario::{load_scenario, run_file, ScenarioRunner};
use webharness::{Error, Result};

#[derive(Parser)]
#[command(name = "webharness", about = "Scripted browser scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenario files against a browser
    Run {
        /// Scenario YAML files, executed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Navigation timeout in seconds (overrides the config file)
        #[arg(long)]
        timeout: Option<u64>,

        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,
    },
    /// Parse and validate scenario files without a browser
    Check {
        /// Scenario YAML files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            files,
            timeout,
            headed,
        } => run(files, timeout, headed).await,
        Commands::Check { files } => check(files),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(files: Vec<PathBuf>, timeout: Option<u64>, headed: bool) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(secs) = timeout {
        config.timeouts.navigation_secs = secs;
    }
    if headed {
        config.browser.headless = false;
    }

    let runner = ScenarioRunner::from_config(&config).with_report(true);
    let session = BrowserSession::launch(&config.browser).await?;

    let total = files.len();
    let mut failed = 0;
    for file in &files {
        // One fresh tab per scenario, closed on every path
        let mut page = session.new_page().await?;
        let report = run_file(file, &mut page, &runner).await;
        page.close().await?;

        match report {
            Ok(report) if report.passed => {}
            Ok(_) => failed += 1,
            Err(e) => {
                eprintln!("  {} {e}", "✗".red());
                failed += 1;
            }
        }
    }
    session.close().await?;

    if failed > 0 {
        return Err(Error::Config(format!(
            "{failed} of {total} scenarios failed"
        )));
    }
    println!(
        "\n{}",
        format!("{total} scenario(s) passed").green().bold()
    );
    Ok(())
}

fn check(files: Vec<PathBuf>) -> Result<()> {
    let mut failed = 0;
    for file in &files {
        match load_scenario(file) {
            Ok(scenario) => println!(
                "{} {} ({} steps)",
                "✓".green(),
                scenario.name,
                scenario.steps.len()
            ),
            Err(e) => {
                println!("{} {}: {e}", "✗".red(), file.display());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(Error::Config(format!("{failed} invalid scenario file(s)")));
    }
    Ok(())
}
