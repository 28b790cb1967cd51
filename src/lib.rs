//! Lingo: Chunked i18n Tree Synchronization
//!
//! Synchronizes localization string trees between a local chunked file layout
//! and a remote translation-management service, across multiple languages and
//! named revision tags.

pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod remote;
pub mod snapshot;
pub mod store;
pub mod tree;
