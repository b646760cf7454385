//! Liturgy server — HTTP front end for bilingual DOCX generation.
//!
//! A single endpoint accepts a JSON liturgy (title, subtitle, sections with
//! parallel Latin and Slovenian text) and answers with a DOCX attachment
//! laid out in two columns. Composition and rendering live in
//! `liturgy_docs`; this crate adds configuration, logging and the HTTP
//! boundary.
//!
//! ```rust,no_run
//! use liturgy_server::{ServerConfig, server};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! server::run_server(config).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
