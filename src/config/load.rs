use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::model::{Config, RuntimeConfig};
use crate::error::{ConfigError, Result};
use crate::types::RemoteHost;

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    let cfg: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    parse_runtime(cfg)
}

fn parse_runtime(cfg: Config) -> Result<RuntimeConfig> {
    let mut seen = HashSet::new();
    for repo in &cfg.repositories {
        if repo.trim().is_empty() {
            return Err(ConfigError::Invalid("repository path is empty".to_string()).into());
        }
        if !seen.insert(repo.clone()) {
            return Err(ConfigError::Invalid(format!("duplicate repository {}", repo)).into());
        }
    }

    let mut remote_folders = Vec::new();
    for (identity, folders) in cfg.remote_folders {
        let host = identity
            .parse::<RemoteHost>()
            .map_err(|e| ConfigError::Invalid(format!("remote {}: {}", identity, e)))?;
        remote_folders.push((host, folders.into_iter().map(PathBuf::from).collect()));
    }

    Ok(RuntimeConfig {
        options: cfg.options.split_whitespace().map(str::to_string).collect(),
        repositories: cfg.repositories,
        backup_folders: cfg.backup_folders.into_iter().map(PathBuf::from).collect(),
        excludes: cfg.excludes,
        remote_folders,
        password: cfg.password,
        password_store: cfg.password_store,
        prune: cfg.prune,
    })
}
