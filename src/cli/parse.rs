//! CLI parse: clap types for lingo. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Lingo CLI - chunked i18n tree synchronization
#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "Chunked i18n tree synchronization with translation services")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working language (repeat for multiple)
    #[arg(long = "lang", short = 'l', required = true)]
    pub langs: Vec<String>,

    /// Directory with i18n JSON files
    #[arg(long, short = 'd')]
    pub i18n_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split whole-tree files into per-directory chunks
    Split {
        /// Source file to split (repeat; must match --lang count)
        #[arg(long, short = 'f', conflicts_with = "string")]
        file: Vec<PathBuf>,

        /// Inline JSON input (an array when more than one language is given)
        #[arg(long, short = 's')]
        string: Option<String>,
    },
    /// Join all chunks into one tree per language
    Join {
        /// Destination file (repeat; must match --lang count; stdout when omitted)
        #[arg(long, short = 'f')]
        file: Vec<PathBuf>,
    },
    /// Print a content fingerprint of the joined trees
    Hash,
    /// Download translations from the remote service
    Download {
        #[command(flatten)]
        api: ApiArgs,

        /// Print to stdout instead of writing i18n files
        #[arg(long, short = 'W')]
        no_write: bool,

        /// Destination file (repeat; must match --lang count; chunked layout when omitted)
        #[arg(long, short = 'f')]
        file: Vec<PathBuf>,
    },
    /// Upload translations to the remote service
    Upload {
        #[command(flatten)]
        api: ApiArgs,

        /// Source file to upload (repeat; must match --lang count; joined layout when omitted)
        #[arg(long, short = 'f')]
        file: Vec<PathBuf>,

        /// Seconds to wait between per-language uploads
        #[arg(long)]
        throttle: Option<u64>,
    },
}

/// Remote service arguments shared by download and upload.
#[derive(Args)]
pub struct ApiArgs {
    /// API token (default: POEDITOR_TOKEN environment variable)
    #[arg(long, short = 't')]
    pub api_token: Option<String>,

    /// Project id (default: POEDITOR_ID environment variable)
    #[arg(long, short = 'i')]
    pub api_id: Option<String>,

    /// API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Translation tag (default: current git branch)
    #[arg(long, short = 'T')]
    pub tag: Option<String>,

    /// Fallback tag merged beneath the current tag
    #[arg(long)]
    pub main_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_multiple_languages() {
        let cli = Cli::try_parse_from([
            "lingo", "--lang", "en", "--lang", "fr", "--i18n-dir", "i18n", "join",
        ])
        .unwrap();
        assert_eq!(cli.langs, vec!["en", "fr"]);
        assert!(matches!(cli.command, Commands::Join { .. }));
    }

    #[test]
    fn test_parse_requires_language() {
        assert!(Cli::try_parse_from(["lingo", "hash"]).is_err());
    }

    #[test]
    fn test_parse_split_string_conflicts_with_file() {
        let result = Cli::try_parse_from([
            "lingo", "--lang", "en", "split", "--file", "en.json", "--string", "{}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_upload_api_args() {
        let cli = Cli::try_parse_from([
            "lingo",
            "--lang",
            "en",
            "upload",
            "--api-token",
            "tok",
            "--api-id",
            "42",
            "--tag",
            "feature/x",
            "--throttle",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Upload { api, throttle, .. } => {
                assert_eq!(api.api_token.as_deref(), Some("tok"));
                assert_eq!(api.api_id.as_deref(), Some("42"));
                assert_eq!(api.tag.as_deref(), Some("feature/x"));
                assert_eq!(throttle, Some(5));
            }
            _ => panic!("expected upload command"),
        }
    }
}
