use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;

pub const MOUNT_BASE: &str = "/tmp/backup";

#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    pub dry_run: bool,
    pub verbose: bool,
}

/// A remote identity as configured, usually `user@host`. A bare name without
/// `@` is accepted and treated as an ssh config alias.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemoteHost(String);

impl RemoteHost {
    pub fn identity(&self) -> &str {
        &self.0
    }

    /// The part after `@`, used for archive names and prune prefixes.
    pub fn short_name(&self) -> &str {
        match self.0.split_once('@') {
            Some((_user, host)) => host,
            None => &self.0,
        }
    }

    pub fn mount_path(&self) -> PathBuf {
        Path::new(MOUNT_BASE).join(&self.0)
    }
}

impl FromStr for RemoteHost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("remote identity is empty".to_string());
        }
        if s.starts_with('-') {
            return Err("remote identity must not start with '-'".to_string());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        {
            return Err(
                "remote identity must use only letters, digits, '.', '-', '_', '@'".to_string(),
            );
        }
        if s.matches('@').count() > 1 {
            return Err("remote identity has more than one '@'".to_string());
        }
        if let Some((user, host)) = s.split_once('@') {
            if user.is_empty() || host.is_empty() {
                return Err("remote identity must be user@host".to_string());
            }
        }
        Ok(RemoteHost(s.to_string()))
    }
}

impl fmt::Display for RemoteHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Captured exactly once at process start so every archive created during the
/// run carries the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    host: String,
    timestamp: String,
}

impl RunStamp {
    pub fn capture() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "localhost".to_string());
        Self {
            host,
            timestamp: Local::now().to_rfc3339(),
        }
    }

    pub fn new(host: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn local_archive(&self) -> String {
        format!("{}-{}", self.host, self.timestamp)
    }

    pub fn remote_archive(&self, remote: &RemoteHost) -> String {
        format!("{}-{}", remote.short_name(), self.local_archive())
    }
}
