//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::message::MessageKind;

/// Copy commands.
#[derive(Debug, Subcommand)]
pub enum CopyCommand {
    /// Copy a request with excluded headers removed
    Request {
        /// File holding the raw request ("-" or omitted for stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        flags: PatternFlags,
    },

    /// Copy a response with excluded headers removed
    Response {
        /// File holding the raw response ("-" or omitted for stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        flags: PatternFlags,
    },

    /// Copy a request and its response, separated by a blank line
    Both {
        /// File holding the raw request ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        request: Option<PathBuf>,

        /// File holding the raw response ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        response: Option<PathBuf>,

        #[command(flatten)]
        flags: PatternFlags,
    },
}

impl CopyCommand {
    /// Which message this command copies.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Request { .. } => MessageKind::Request,
            Self::Response { .. } => MessageKind::Response,
            Self::Both { .. } => MessageKind::Exchange,
        }
    }

    /// Pattern adjustments for this run.
    #[must_use]
    pub fn flags(&self) -> &PatternFlags {
        match self {
            Self::Request { flags, .. } | Self::Response { flags, .. } | Self::Both { flags, .. } => {
                flags
            }
        }
    }
}

/// Per-run pattern adjustments.
#[derive(Debug, Default, Args)]
pub struct PatternFlags {
    /// Also exclude headers matching this pattern (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Keep headers this pattern would exclude by removing it (repeatable)
    #[arg(short = 'k', long = "keep", value_name = "PATTERN")]
    pub keep: Vec<String>,

    /// Copy to the system clipboard instead of printing
    #[arg(long)]
    pub clipboard: bool,
}

/// Pattern commands.
#[derive(Debug, Subcommand)]
pub enum PatternsCommand {
    /// List the excluded header patterns
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show which patterns exclude a header name
    Test {
        /// Header name to check
        name: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_command_kind() {
        let request = CopyCommand::Request {
            file: None,
            flags: PatternFlags::default(),
        };
        let both = CopyCommand::Both {
            request: None,
            response: None,
            flags: PatternFlags::default(),
        };
        assert_eq!(request.kind(), MessageKind::Request);
        assert_eq!(both.kind(), MessageKind::Exchange);
    }

    #[test]
    fn test_copy_command_flags() {
        let cmd = CopyCommand::Response {
            file: None,
            flags: PatternFlags {
                exclude: vec!["x-.*".to_string()],
                keep: Vec::new(),
                clipboard: true,
            },
        };
        assert_eq!(cmd.kind(), MessageKind::Response);
        assert!(cmd.flags().clipboard);
        assert_eq!(cmd.flags().exclude, vec!["x-.*"]);
    }
}
