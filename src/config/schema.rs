//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization.

use serde::{Deserialize, Serialize};

use crate::layout::{Direction, LayoutOptions};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace discovery runs in when none is given on the command line
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// Use the annotation summary cache before running a full discovery
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Layout direction: TB, BT, LR, or RL
    #[serde(default)]
    pub direction: Direction,

    #[serde(default = "default_node_width")]
    pub node_width: f64,

    #[serde(default = "default_node_height")]
    pub node_height: f64,

    #[serde(default = "default_rank_sep")]
    pub rank_sep: f64,

    #[serde(default = "default_node_sep")]
    pub node_sep: f64,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Log level when --debug is not given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LayoutConfig {
    /// Convert into the engine's options struct
    pub fn to_options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction,
            node_width: self.node_width,
            node_height: self.node_height,
            rank_sep: self.rank_sep,
            node_sep: self.node_sep,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            discovery: DiscoveryConfig::default(),
            layout: LayoutConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            direction: options.direction,
            node_width: options.node_width,
            node_height: options.node_height,
            rank_sep: options.rank_sep,
            node_sep: options.node_sep,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_node_width() -> f64 {
    LayoutOptions::default().node_width
}

fn default_node_height() -> f64 {
    LayoutOptions::default().node_height
}

fn default_rank_sep() -> f64 {
    LayoutOptions::default().rank_sep
}

fn default_node_sep() -> f64 {
    LayoutOptions::default().node_sep
}

fn default_log_level() -> String {
    "warn".to_string()
}
