//! `liturgy` binary - serve the DOCX endpoint or render a payload file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use liturgy_docs::{generate_liturgy_docx, payload};
use liturgy_server::{ServerConfig, logging, server};

#[derive(Parser, Debug)]
#[command(name = "liturgy")]
#[command(about = "Bilingual Latin/Slovenian liturgy documents as DOCX")]
struct Args {
    /// JSON config file (defaults are used when missing)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:3000
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Render a JSON payload file to a DOCX file
    Render {
        /// Payload in the same JSON shape the endpoint accepts
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (defaults to the payload's filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Output path when `--output` is not given: the file-name part of the
/// payload's `filename`, always in the current directory.
fn default_output_path(request: &payload::LiturgyRequest, default_filename: &str) -> PathBuf {
    let name = request.attachment_name(default_filename);
    Path::new(&name)
        .file_name()
        .or_else(|| Path::new(default_filename).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("liturgy.docx"))
}

fn render(config: &ServerConfig, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let data = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&data).with_context(|| format!("Invalid JSON in {}", input.display()))?;
    let request = payload::validate(&value)?;

    let output =
        output.unwrap_or_else(|| default_output_path(&request, &config.default_filename));
    let bytes = generate_liturgy_docx(&request, &config.style)?;
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(output = %output.display(), bytes = bytes.len(), "Wrote document");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = ServerConfig::load(args.config.as_deref());
    let _guard = logging::init_logging(&loaded.config)?;
    loaded.log_warnings();
    let config = loaded.config;

    match args.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Serve { listen } => {
            let mut config = config;
            if let Some(addr) = listen {
                config.listen_addr = addr;
            }
            server::run_server(config).await
        }
        Command::Render { input, output } => render(&config, input, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_filename(filename: Option<&str>) -> payload::LiturgyRequest {
        payload::LiturgyRequest {
            title: None,
            subtitle: "S".to_string(),
            filename: filename.map(str::to_string),
            sections: Vec::new(),
        }
    }

    #[test]
    fn test_default_output_uses_payload_filename() {
        let req = request_with_filename(Some("masa.docx"));
        assert_eq!(default_output_path(&req, "liturgy.docx"), PathBuf::from("masa.docx"));
    }

    #[test]
    fn test_default_output_falls_back_to_configured_name() {
        let req = request_with_filename(None);
        assert_eq!(default_output_path(&req, "liturgy.docx"), PathBuf::from("liturgy.docx"));
    }

    #[test]
    fn test_default_output_never_leaves_current_directory() {
        for name in ["../x.docx", "sub/../x.docx", "/tmp/x.docx", "a/b/x.docx"] {
            let req = request_with_filename(Some(name));
            assert_eq!(
                default_output_path(&req, "liturgy.docx"),
                PathBuf::from("x.docx"),
                "filename {name:?}"
            );
        }
    }

    #[test]
    fn test_default_output_with_no_file_name_part() {
        for name in ["..", "/", "sub/.."] {
            let req = request_with_filename(Some(name));
            assert_eq!(
                default_output_path(&req, "liturgy.docx"),
                PathBuf::from("liturgy.docx"),
                "filename {name:?}"
            );
        }
    }
}
