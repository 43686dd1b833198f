pub mod backup;
pub mod borg;
pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod mount;
pub mod types;
pub mod util;

pub use error::{BorgvaultError, Result};
pub use types::{RemoteHost, RunMode, RunStamp};
