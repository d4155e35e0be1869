//! Cross-platform directory path resolution
//!
//! Resolves the configuration directory, honoring `DEVGRAPH_CONFIG_DIR`
//! first and the platform conventions otherwise:
//! - Linux/macOS: XDG Base Directory specification (~/.config/devgraph)
//! - Windows: Known Folder API (AppData\Roaming\devgraph)

use std::path::PathBuf;

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    std::env::var("DEVGRAPH_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", "devgraph")
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join("devgraph"))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join("devgraph")
            }
        })
}

/// Get the configuration file path
pub fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}
