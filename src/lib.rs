//! LTS Reduce
//!
//! Reduces labeled transition systems with interactive, Markovian and timed
//! transitions to the continuous-time Markov chains they describe.
//!
//! This library provides functionality for:
//! - Reading automata in the Aldebaran (`.aut`) format
//! - Removing delays preempted by immediate transitions (maximal progress)
//! - Collapsing immediate transitions into redirects and propagating
//!   failure/repair labels along the remaining delays
//! - Writing the result as `.aut`, `.tra`/`.lab` or JANI

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod lts;
pub mod parser;
pub mod reduction;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
