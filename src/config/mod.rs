//! Configuration loading and validation
//!
//! The harvester ships with a fixed default configuration (local automation
//! endpoint, Android capability set, wait timeouts and save cadence) and
//! optionally overlays a TOML file on top. Loaded files are content-hashed
//! so runs can log exactly which configuration they executed under.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{BackendConfig, Config, CrawlConfig, OutputConfig};
pub use validation::validate;
