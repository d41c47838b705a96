//! Runtime settings shared by the command line, the menu and the
//! gallery.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::error::{Result, RouterError};
use crate::utils::loader::HeaderPolicy;

/// Default network file, relative to the working directory.
pub const DEFAULT_INPUT: &str = "isp_network.csv";
/// Default directory for rendered images, also served by the gallery.
pub const DEFAULT_OUTPUT_DIR: &str = "renders";
/// Default gallery address.
pub const DEFAULT_GALLERY_BIND: &str = "0.0.0.0:8080";

/// Settings of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV file the network is loaded from.
    pub input: PathBuf,
    /// How the first row of `input` is treated.
    pub header: HeaderPolicy,
    /// Where images are written and served from.
    pub output_dir: PathBuf,
    /// Address the gallery listens on.
    pub gallery_bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            header: HeaderPolicy::Auto,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            gallery_bind: DEFAULT_GALLERY_BIND.to_string(),
        }
    }
}

impl Config {
    /// Reads settings from a JSON file. Missing keys keep their
    /// defaults.
    pub fn from_file(path: &std::path::Path) -> Result<Config> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|err| {
            RouterError::Configuration(format!("{}: {err}", path.display()))
        })
    }

    /// Parses the gallery address.
    ///
    /// # Errors
    /// [`RouterError::Configuration`] if it is not a socket address.
    pub fn gallery_addr(&self) -> Result<SocketAddr> {
        self.gallery_bind.parse().map_err(|_| {
            RouterError::Configuration(format!(
                "invalid gallery address '{}'",
                self.gallery_bind
            ))
        })
    }
}
