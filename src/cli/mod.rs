use anyhow::Result;
use chrono::Local;
use clap::Parser;

use crate::backup::{self, RunReport};
use crate::cli::args::Cli;
use crate::config::load::load_config;
use crate::credential::RetryPolicy;
use crate::types::{RunMode, RunStamp};

pub mod args;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    println!("borgvault {}", VERSION);
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));

    let run_mode = RunMode {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    let cfg = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            println!("failed to load config {}: {}", cli.config.display(), err);
            std::process::exit(2);
        }
    };

    let policy = match cli.auth_attempts {
        Some(attempts) => RetryPolicy::Limited(attempts),
        None => RetryPolicy::Unbounded,
    };

    let stamp = RunStamp::capture();
    if run_mode.verbose {
        println!(
            "loaded config {} with {} repositories and {} remote hosts",
            cli.config.display(),
            cfg.repositories.len(),
            cfg.remote_folders.len()
        );
        println!("run stamp: {}", stamp.local_archive());
    }

    let report = backup::run_backup(&cfg, &stamp, policy, run_mode);
    print_report(&report);

    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("archives attempted: {}", report.archives);
    println!("prune passes: {}", report.prunes);
    for repo in &report.skipped_repositories {
        println!("skipped repository: {}", repo);
    }
    for host in &report.skipped_hosts {
        println!("skipped host: {}", host);
    }
    for step in &report.failed_steps {
        println!("step failed: {}", step);
    }
    if report.has_errors() {
        println!("run completed with errors");
    } else {
        println!("run completed");
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
