use std::fs;
use std::process::Command;

use crate::error::{RemoteError, Result};
use crate::types::{RemoteHost, RunMode};
use crate::util::command::{run_command, OutputMode};

/// Binds the remote host's root filesystem at the identity's mount path.
/// Creating the directory is idempotent.
pub fn mount_remote(host: &RemoteHost, run_mode: RunMode) -> Result<()> {
    let mountpoint = host.mount_path();
    if !run_mode.dry_run {
        fs::create_dir_all(&mountpoint)?;
    }
    let mut cmd = Command::new("sshfs");
    cmd.arg(format!("{}:/", host.identity())).arg(&mountpoint);
    let outcome = run_command(&mut cmd, OutputMode::Stream, run_mode)
        .map_err(|e| RemoteError::MountFailure(format!("{}: {}", host, e)))?;
    if !outcome.success() {
        return Err(RemoteError::MountFailure(format!(
            "{} failed with exit code {}",
            host, outcome.code
        ))
        .into());
    }
    Ok(())
}

/// Releases a previously established mount. Callers invoke this exactly once
/// per successful mount and treat failure as reportable, not fatal.
pub fn unmount_remote(host: &RemoteHost, run_mode: RunMode) -> Result<()> {
    let mountpoint = host.mount_path();
    let mut cmd = Command::new("fusermount");
    cmd.arg("-u").arg(&mountpoint);
    let outcome = run_command(&mut cmd, OutputMode::Stream, run_mode)
        .map_err(|e| RemoteError::UmountFailure(format!("{}: {}", mountpoint.display(), e)))?;
    if !outcome.success() {
        return Err(RemoteError::UmountFailure(format!(
            "{} failed with exit code {}",
            mountpoint.display(),
            outcome.code
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_mount_does_not_touch_the_filesystem() {
        let host: RemoteHost = "u@borgvault-test-host".parse().expect("parse");
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        mount_remote(&host, run_mode).expect("mount");
        assert!(!host.mount_path().exists());
        unmount_remote(&host, run_mode).expect("umount");
    }
}
