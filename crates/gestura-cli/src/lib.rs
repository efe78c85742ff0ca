#![forbid(unsafe_code)]

pub mod check;
pub mod cli;
pub mod error;
pub mod gestures;
pub mod replay;
pub mod util;

pub use cli::{Cli, run, run_with_stdout};
pub use error::{CliError, Result};
