pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpPredictionClient;
pub use config::{cli::LocalStorage, toml_config::FormConfig};
pub use core::controller::{FormController, SubmitOutcome};
pub use core::page::{Document, Page, PageLayout};
pub use domain::preset::Preset;
pub use utils::error::{FormError, Result};
