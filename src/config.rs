//! Configuration system for kubrun.
//!
//! This module provides the configuration structures and CLI definitions for
//! the kubrun application. Configuration loading and precedence merging is
//! handled by the `ortho_config` crate. Intended precedence: CLI flags
//! override environment variables, which override configuration files, which
//! override defaults.
//!
//! The configuration file is expected at `~/.config/kubrun/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! kubeconfig = "/home/user/.kube/config"
//! namespace = "ci-scratch"
//! image = "docker.io/library/alpine:latest"
//! timeout_secs = 120
//! cleanup = true
//!
//! [auth]
//! api_server = "https://k8s.example.net:6443"
//! token = "eyJhbGciOi..."
//! insecure = false
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, AuthConfig};
