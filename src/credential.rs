use std::fmt;
use std::process::Command;

use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::borg;
use crate::config::model::PasswordStore;
use crate::error::{BorgvaultError, Result};
use crate::types::RunMode;
use crate::util::command::{run_command, OutputMode};

/// Threaded by value into every create/prune/probe invocation; never held as
/// ambient process state.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Passphrase(value.into())
    }

    pub fn empty() -> Self {
        Passphrase(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Unbounded,
    Limited(u32),
}

#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(Passphrase),
    GaveUp,
}

/// Literal config value wins over the credential store; with neither, start
/// from an empty passphrase.
pub fn initial_passphrase(
    password: Option<&str>,
    store: Option<&PasswordStore>,
    run_mode: RunMode,
) -> Passphrase {
    if let Some(literal) = password {
        return Passphrase::new(literal);
    }
    if let Some(store) = store {
        if let Some(secret) = lookup_secret(store, run_mode) {
            return secret;
        }
    }
    Passphrase::empty()
}

fn lookup_secret(store: &PasswordStore, run_mode: RunMode) -> Option<Passphrase> {
    let mut cmd = Command::new("secret-tool");
    cmd.arg("lookup").arg(&store.system).arg(&store.user);
    match run_command(&mut cmd, OutputMode::Capture, run_mode) {
        Ok(outcome) if outcome.success() && !outcome.stdout.is_empty() => {
            Some(Passphrase::new(outcome.stdout))
        }
        Ok(_) => None,
        Err(err) => {
            debug!("secret-tool lookup failed: {err}");
            None
        }
    }
}

/// Probes the repository and prompts until it accepts a passphrase, or until
/// the policy is exhausted. The caller has already checked the repository
/// path exists.
pub fn authenticate(
    repo: &str,
    password: Option<&str>,
    store: Option<&PasswordStore>,
    policy: RetryPolicy,
    run_mode: RunMode,
) -> Result<AuthOutcome> {
    let mut passphrase = initial_passphrase(password, store, run_mode);
    let mut prompts: u32 = 0;
    loop {
        if borg::probe(repo, &passphrase, run_mode)? {
            return Ok(AuthOutcome::Authenticated(passphrase));
        }
        if let RetryPolicy::Limited(max) = policy {
            if prompts >= max {
                return Ok(AuthOutcome::GaveUp);
            }
        }
        let entered = rpassword::prompt_password(format!(
            "Enter passphrase for repository {}: ",
            repo
        ))
        .map_err(|e| BorgvaultError::message(format!("read passphrase: {}", e)))?;
        passphrase = Passphrase::new(entered);
        prompts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_password_wins_over_store() {
        // With a literal configured the provider must never be queried, so
        // this resolves without spawning anything.
        let store = PasswordStore {
            system: "borg".to_string(),
            user: "me".to_string(),
        };
        let pass = initial_passphrase(Some("secret"), Some(&store), RunMode::default());
        assert_eq!(pass.as_str(), "secret");
    }

    #[test]
    fn store_miss_falls_back_to_empty() {
        let store = PasswordStore {
            system: "borg".to_string(),
            user: "me".to_string(),
        };
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        let pass = initial_passphrase(None, Some(&store), run_mode);
        assert_eq!(pass.as_str(), "");
    }

    #[test]
    fn no_sources_means_empty_passphrase() {
        let pass = initial_passphrase(None, None, RunMode::default());
        assert_eq!(pass.as_str(), "");
    }

    #[test]
    fn debug_output_is_redacted() {
        let pass = Passphrase::new("secret");
        assert_eq!(format!("{:?}", pass), "Passphrase(<redacted>)");
    }

    #[test]
    fn dry_run_authenticates_without_prompting() {
        let run_mode = RunMode {
            dry_run: true,
            verbose: false,
        };
        let outcome =
            authenticate("/backup/r1", None, None, RetryPolicy::Limited(0), run_mode).expect("auth");
        assert!(matches!(outcome, AuthOutcome::Authenticated(_)));
    }
}
