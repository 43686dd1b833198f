use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::RemoteHost;

/// Raw settings document. Every field is optional; unknown fields are
/// ignored.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub backup_folders: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub remote_folders: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_store: Option<PasswordStore>,
    #[serde(default)]
    pub prune: PruneKeep,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordStore {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PruneKeep {
    #[serde(default = "default_keep_daily")]
    pub daily: u32,
    #[serde(default = "default_keep_weekly")]
    pub weekly: u32,
    #[serde(default = "default_keep_monthly")]
    pub monthly: u32,
    #[serde(default = "default_keep_yearly")]
    pub yearly: u32,
}

impl Default for PruneKeep {
    fn default() -> Self {
        Self {
            daily: default_keep_daily(),
            weekly: default_keep_weekly(),
            monthly: default_keep_monthly(),
            yearly: default_keep_yearly(),
        }
    }
}

fn default_keep_daily() -> u32 {
    7
}

fn default_keep_weekly() -> u32 {
    4
}

fn default_keep_monthly() -> u32 {
    6
}

fn default_keep_yearly() -> u32 {
    0
}

/// Validated form used by the run. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub options: Vec<String>,
    pub repositories: Vec<String>,
    pub backup_folders: Vec<PathBuf>,
    pub excludes: Vec<String>,
    pub remote_folders: Vec<(RemoteHost, Vec<PathBuf>)>,
    pub password: Option<String>,
    pub password_store: Option<PasswordStore>,
    pub prune: PruneKeep,
}
