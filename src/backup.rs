use std::path::{Path, PathBuf};

use tracing::warn;

use crate::borg;
use crate::config::model::RuntimeConfig;
use crate::credential::{self, AuthOutcome, Passphrase, RetryPolicy};
use crate::error::Result;
use crate::mount;
use crate::types::{RunMode, RunStamp};
use crate::util::command::ExecOutcome;

/// Outcome bookkeeping for one run. Step failures are reported here instead
/// of altering control flow.
#[derive(Debug, Default)]
pub struct RunReport {
    pub archives: usize,
    pub prunes: usize,
    pub skipped_repositories: Vec<String>,
    pub skipped_hosts: Vec<String>,
    pub failed_steps: Vec<String>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.skipped_repositories.is_empty()
            || !self.skipped_hosts.is_empty()
            || !self.failed_steps.is_empty()
    }
}

fn record_step(report: &mut RunReport, step: &str, result: Result<ExecOutcome>) {
    match result {
        Ok(outcome) if outcome.success() => {}
        Ok(outcome) => {
            warn!("{} exited with code {}", step, outcome.code);
            report.failed_steps.push(format!("{} (exit {})", step, outcome.code));
        }
        Err(err) => {
            warn!("{} failed: {}", step, err);
            report.failed_steps.push(format!("{} ({})", step, err));
        }
    }
}

/// Repositories are processed sequentially and independently; a missing path
/// or an exhausted passphrase contributes zero archives and zero prunes.
pub fn run_backup(
    cfg: &RuntimeConfig,
    stamp: &RunStamp,
    policy: RetryPolicy,
    run_mode: RunMode,
) -> RunReport {
    let mut report = RunReport::default();
    for repo in &cfg.repositories {
        if !Path::new(repo).exists() {
            warn!("{} does not exist, skipping repository", repo);
            report.skipped_repositories.push(repo.clone());
            continue;
        }
        let passphrase = match credential::authenticate(
            repo,
            cfg.password.as_deref(),
            cfg.password_store.as_ref(),
            policy,
            run_mode,
        ) {
            Ok(AuthOutcome::Authenticated(passphrase)) => passphrase,
            Ok(AuthOutcome::GaveUp) => {
                warn!("no accepted passphrase for {}, skipping repository", repo);
                report.skipped_repositories.push(repo.clone());
                continue;
            }
            Err(err) => {
                warn!("cannot probe {}: {}, skipping repository", repo, err);
                report.skipped_repositories.push(repo.clone());
                continue;
            }
        };

        local_backup(cfg, repo, stamp, &passphrase, run_mode, &mut report);
        prune_repo(cfg, repo, stamp.host(), &passphrase, run_mode, &mut report);
        remote_backup(cfg, repo, stamp, &passphrase, run_mode, &mut report);
    }
    report
}

fn local_backup(
    cfg: &RuntimeConfig,
    repo: &str,
    stamp: &RunStamp,
    passphrase: &Passphrase,
    run_mode: RunMode,
    report: &mut RunReport,
) {
    let archive = stamp.local_archive();
    report.archives += 1;
    let result = borg::create(
        &cfg.options,
        repo,
        &archive,
        &cfg.backup_folders,
        &cfg.excludes,
        passphrase,
        run_mode,
    );
    record_step(report, &format!("create {}::{}", repo, archive), result);
}

fn remote_backup(
    cfg: &RuntimeConfig,
    repo: &str,
    stamp: &RunStamp,
    passphrase: &Passphrase,
    run_mode: RunMode,
    report: &mut RunReport,
) {
    for (host, folders) in &cfg.remote_folders {
        if let Err(err) = mount::mount_remote(host, run_mode) {
            warn!("skipping {}: {}", host, err);
            report.skipped_hosts.push(host.identity().to_string());
            continue;
        }

        let roots = rebase_folders(&host.mount_path(), folders);
        // ctime,size instead of content hashing: remote mounts are slow.
        let mut options = vec!["--files-cache".to_string(), "ctime,size".to_string()];
        options.extend(cfg.options.iter().cloned());
        let archive = stamp.remote_archive(host);
        report.archives += 1;
        let result = borg::create(
            &options,
            repo,
            &archive,
            &roots,
            &cfg.excludes,
            passphrase,
            run_mode,
        );
        record_step(report, &format!("create {}::{}", repo, archive), result);

        if let Err(err) = mount::unmount_remote(host, run_mode) {
            warn!("release {}: {}", host, err);
            report.failed_steps.push(format!("umount {} ({})", host, err));
        }

        prune_repo(cfg, repo, host.short_name(), passphrase, run_mode, report);
    }
}

fn prune_repo(
    cfg: &RuntimeConfig,
    repo: &str,
    prefix: &str,
    passphrase: &Passphrase,
    run_mode: RunMode,
    report: &mut RunReport,
) {
    report.prunes += 1;
    let result = borg::prune(repo, &cfg.prune, prefix, passphrase, run_mode);
    record_step(report, &format!("prune {} (prefix {})", repo, prefix), result);
}

fn rebase_folders(mountpoint: &Path, folders: &[PathBuf]) -> Vec<PathBuf> {
    folders
        .iter()
        .map(|f| mountpoint.join(f.strip_prefix("/").unwrap_or(f)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::PruneKeep;
    use crate::types::RemoteHost;

    fn config(repositories: Vec<String>) -> RuntimeConfig {
        RuntimeConfig {
            options: Vec::new(),
            repositories,
            backup_folders: vec![PathBuf::from("/home/u")],
            excludes: vec!["/home/u/cache".to_string()],
            remote_folders: Vec::new(),
            password: None,
            password_store: None,
            prune: PruneKeep::default(),
        }
    }

    fn stamp() -> RunStamp {
        RunStamp::new("myhost", "2026-02-01T03:04:05+01:00")
    }

    #[test]
    fn remote_folders_are_rebased_under_the_mountpoint() {
        let host: RemoteHost = "u@h1".parse().expect("parse");
        let roots = rebase_folders(
            &host.mount_path(),
            &[PathBuf::from("/data"), PathBuf::from("var/log")],
        );
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/tmp/backup/u@h1/data"),
                PathBuf::from("/tmp/backup/u@h1/var/log"),
            ]
        );
    }

    #[test]
    fn empty_repositories_means_an_empty_run() {
        let cfg = config(Vec::new());
        let report = run_backup(&cfg, &stamp(), RetryPolicy::Unbounded, RunMode::default());
        assert_eq!(report.archives, 0);
        assert_eq!(report.prunes, 0);
        assert!(!report.has_errors());
    }

    #[test]
    fn missing_repository_is_skipped_without_any_invocation() {
        let cfg = config(vec!["/nonexistent/borgvault-test-repo".to_string()]);
        let report = run_backup(&cfg, &stamp(), RetryPolicy::Limited(0), RunMode::default());
        assert_eq!(report.archives, 0);
        assert_eq!(report.prunes, 0);
        assert_eq!(
            report.skipped_repositories,
            vec!["/nonexistent/borgvault-test-repo"]
        );
    }

    #[test]
    fn missing_repository_does_not_stop_the_iteration() {
        let existing = tempfile::tempdir().expect("tempdir");
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        let mut cfg = config(vec![
            "/nonexistent/borgvault-test-repo".to_string(),
            existing.path().to_string_lossy().to_string(),
        ]);
        cfg.remote_folders = Vec::new();
        let report = run_backup(&cfg, &stamp(), RetryPolicy::Unbounded, run_mode);
        assert_eq!(report.skipped_repositories.len(), 1);
        assert_eq!(report.archives, 1);
        assert_eq!(report.prunes, 1);
    }

    #[test]
    fn dry_run_sequences_local_and_remote_flows() {
        let repo = tempfile::tempdir().expect("tempdir");
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        let mut cfg = config(vec![repo.path().to_string_lossy().to_string()]);
        cfg.remote_folders = vec![(
            "u@h1".parse().expect("parse"),
            vec![PathBuf::from("/data")],
        )];
        let report = run_backup(&cfg, &stamp(), RetryPolicy::Unbounded, run_mode);
        // One local archive plus one per remote host, and a prune for each.
        assert_eq!(report.archives, 2);
        assert_eq!(report.prunes, 2);
        assert!(report.skipped_hosts.is_empty());
        assert!(report.failed_steps.is_empty());
    }
}
