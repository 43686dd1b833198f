use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "borgvault", version, about = "Borg-based backup orchestrator")]
pub struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Print the commands that would run without executing them.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Bound interactive passphrase prompts per repository; omit for
    /// unlimited retries, 0 to never prompt.
    #[arg(long)]
    pub auth_attempts: Option<u32>,
}
