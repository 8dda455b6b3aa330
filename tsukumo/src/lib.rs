//! Tsukumo - a minimal archive package manager.
//!
//! Packages are `.tar.gz` or `.tar` archives served by a repository over
//! HTTP. Installing a package fetches its archive, extracts it into a local
//! store, and recursively installs the dependencies its `metadata.json`
//! declares. A companion HTTP service exposes the same store for uploads,
//! downloads, listing, deletion, and bundling.
//!
//! # Modules
//!
//! - [`package`] - naming rules, archive entries, and metadata
//! - [`manager`] - fetcher, codec, local store, and the installer
//! - [`server`] - the HTTP repository service
//! - [`config`] - the `~/.tsukumo/config.ini` file
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod logging;
pub mod manager;
pub mod package;
pub mod server;

pub use manager::checksum;
