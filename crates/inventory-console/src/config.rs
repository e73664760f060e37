//! # Configuration
//!
//! Command-line flags with environment fallbacks, validated into a [`Config`].
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--api-url <URL>` | `INVENTORY_API_URL` | `http://localhost:3000` |
//! | `--memory` | | off; serve from an in-process store instead of HTTP |
//! | `--seed` | | off; with `--memory`, start with sample products |

use clap::Parser;
use inventory_api::{ProductDraft, Url};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Terminal inventory console.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "inventory", version)]
#[command(about = "Browse and edit a product inventory from the terminal")]
pub struct Cli {
    /// Base URL of the product API
    #[arg(long, env = "INVENTORY_API_URL", default_value = DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// Use an in-memory store instead of the HTTP API
    #[arg(long)]
    pub memory: bool,

    /// Seed the in-memory store with sample products
    #[arg(long, requires = "memory")]
    pub seed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Http(Url),
    Memory { seed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.memory {
            return Ok(Self {
                backend: Backend::Memory { seed: cli.seed },
            });
        }

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: cli.api_url.clone(),
            reason,
        };
        let url = Url::parse(cli.api_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(Self {
            backend: Backend::Http(url),
        })
    }
}

/// Products the `--seed` flag starts the in-memory store with.
pub fn sample_products() -> Vec<ProductDraft> {
    vec![
        ProductDraft::new("Bolt M6", "Hardware", 120, 0.15),
        ProductDraft::new("Hex Key Set", "Tools", 8, 12.5),
        ProductDraft::new("Claw Hammer", "Tools", 5, 24.99),
        ProductDraft::new("Wood Glue", "Adhesives", 14, 6.75),
    ]
}
