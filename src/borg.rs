use std::path::PathBuf;
use std::process::Command;

use crate::config::model::PruneKeep;
use crate::credential::Passphrase;
use crate::error::Result;
use crate::types::RunMode;
use crate::util::command::{run_command, ExecOutcome, OutputMode};

/// Subtrees containing this marker file opt out of capture.
pub const NO_BACKUP_MARKER: &str = ".nobackup";

const PASSPHRASE_ENV: &str = "BORG_PASSPHRASE";

fn borg_command(args: &[String], passphrase: &Passphrase) -> Command {
    let mut cmd = Command::new("borg");
    cmd.args(args).env(PASSPHRASE_ENV, passphrase.as_str());
    cmd
}

pub fn create_args(
    options: &[String],
    repo: &str,
    archive: &str,
    folders: &[PathBuf],
    excludes: &[String],
) -> Vec<String> {
    let mut args = vec!["create".to_string()];
    args.extend(options.iter().cloned());
    args.push(format!("{}::{}", repo, archive));
    for folder in folders {
        args.push(folder.to_string_lossy().to_string());
    }
    for exclude in excludes {
        args.push("--exclude".to_string());
        args.push(exclude.clone());
    }
    args.push("--exclude-if-present".to_string());
    args.push(NO_BACKUP_MARKER.to_string());
    args
}

pub fn prune_args(repo: &str, keep: &PruneKeep, prefix: &str) -> Vec<String> {
    vec![
        "prune".to_string(),
        "--list".to_string(),
        "--stats".to_string(),
        "-v".to_string(),
        repo.to_string(),
        format!("--keep-daily={}", keep.daily),
        format!("--keep-weekly={}", keep.weekly),
        format!("--keep-monthly={}", keep.monthly),
        format!("--keep-yearly={}", keep.yearly),
        "--glob-archives".to_string(),
        format!("{}*", prefix),
    ]
}

pub fn create(
    options: &[String],
    repo: &str,
    archive: &str,
    folders: &[PathBuf],
    excludes: &[String],
    passphrase: &Passphrase,
    run_mode: RunMode,
) -> Result<ExecOutcome> {
    let args = create_args(options, repo, archive, folders, excludes);
    run_command(
        &mut borg_command(&args, passphrase),
        OutputMode::Stream,
        run_mode,
    )
}

pub fn prune(
    repo: &str,
    keep: &PruneKeep,
    prefix: &str,
    passphrase: &Passphrase,
    run_mode: RunMode,
) -> Result<ExecOutcome> {
    let args = prune_args(repo, keep, prefix);
    run_command(
        &mut borg_command(&args, passphrase),
        OutputMode::Stream,
        run_mode,
    )
}

/// Read-only reachability and passphrase probe.
pub fn probe(repo: &str, passphrase: &Passphrase, run_mode: RunMode) -> Result<bool> {
    let args = vec!["info".to_string(), repo.to_string()];
    let outcome = run_command(
        &mut borg_command(&args, passphrase),
        OutputMode::Capture,
        run_mode,
    )?;
    Ok(outcome.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_args_target_roots_and_excludes() {
        let args = create_args(
            &[],
            "/backup/r1",
            "myhost-2026-02-01T03:04:05+01:00",
            &[PathBuf::from("/home/u")],
            &["/home/u/cache".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "create",
                "/backup/r1::myhost-2026-02-01T03:04:05+01:00",
                "/home/u",
                "--exclude",
                "/home/u/cache",
                "--exclude-if-present",
                ".nobackup",
            ]
        );
    }

    #[test]
    fn create_args_keep_option_order() {
        let options = vec!["--files-cache".to_string(), "ctime,size".to_string()];
        let args = create_args(&options, "/r", "a", &[PathBuf::from("/d")], &[]);
        assert_eq!(args[..3], ["create", "--files-cache", "ctime,size"]);
        assert_eq!(args[3], "/r::a");
    }

    #[test]
    fn prune_args_glob_scopes_by_prefix() {
        let keep = PruneKeep::default();
        let args = prune_args("/backup/r1", &keep, "h1");
        assert_eq!(
            args,
            vec![
                "prune",
                "--list",
                "--stats",
                "-v",
                "/backup/r1",
                "--keep-daily=7",
                "--keep-weekly=4",
                "--keep-monthly=6",
                "--keep-yearly=0",
                "--glob-archives",
                "h1*",
            ]
        );
    }

    #[test]
    fn prune_args_empty_prefix_matches_everything() {
        let keep = PruneKeep::default();
        let args = prune_args("/backup/r1", &keep, "");
        assert_eq!(args.last().map(String::as_str), Some("*"));
    }

    #[test]
    fn probe_succeeds_in_dry_run_without_spawning() {
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        let pass = Passphrase::empty();
        assert!(probe("/backup/r1", &pass, run_mode).expect("probe"));
    }
}
