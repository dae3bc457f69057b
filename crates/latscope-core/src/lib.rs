pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod log;
pub mod parse;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{RunOutcome, run};
