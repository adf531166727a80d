//! Error types for yeet-core

use std::fmt::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Remediation command for resolving an error
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RemediationCommand {
    /// Short label describing the command purpose
    pub label: String,
    /// Command to run
    pub command: String,
}

/// Actionable remediation guidance for an error
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Remediation {
    /// One-line summary of how to fix the issue
    pub summary: String,
    /// Suggested commands to resolve or diagnose the issue
    pub commands: Vec<RemediationCommand>,
    /// Additional alternative guidance
    pub alternatives: Vec<String>,
}

impl Remediation {
    /// Create a new remediation with a summary
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            commands: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// Add a suggested command
    #[must_use]
    pub fn command(mut self, label: impl Into<String>, command: impl Into<String>) -> Self {
        self.commands.push(RemediationCommand {
            label: label.into(),
            command: command.into(),
        });
        self
    }

    /// Add an alternative suggestion
    #[must_use]
    pub fn alternative(mut self, alternative: impl Into<String>) -> Self {
        self.alternatives.push(alternative.into());
        self
    }

    /// Render remediation text for human-readable output
    #[must_use]
    pub fn render_plain(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "To fix:");
        let _ = writeln!(output, "  {}", self.summary);

        if !self.commands.is_empty() {
            let _ = writeln!(output, "  Commands:");
            for cmd in &self.commands {
                let _ = writeln!(output, "    - {}: {}", cmd.label, cmd.command);
            }
        }

        if !self.alternatives.is_empty() {
            let _ = writeln!(output, "  Alternatives:");
            for alt in &self.alternatives {
                let _ = writeln!(output, "    - {alt}");
            }
        }

        output
    }
}

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for yeet-core
#[derive(Error, Debug)]
pub enum Error {
    /// Mistakes in a requested trash operation
    #[error(transparent)]
    Trash(#[from] TrashError),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a user mistake that is reported without failing
    /// the process.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Trash(_))
    }

    /// Return remediation guidance when available.
    #[must_use]
    pub fn remediation(&self) -> Option<Remediation> {
        match self {
            Self::Trash(_) => None,
            Self::Store(err) => Some(err.remediation()),
            Self::Config(err) => Some(err.remediation()),
            Self::Io(_) => Some(
                Remediation::new("Check filesystem permissions and paths, then retry.")
                    .command("Inspect bin", "ls -la ~/.yeet")
                    .alternative("Verify the yeet bin directory exists and is writable."),
            ),
            Self::Json(_) => Some(
                Remediation::new("The record store could not be encoded. Retry the command.")
                    .alternative("Check for file names that are not valid UTF-8."),
            ),
        }
    }
}

/// User-facing failures of yeet, restore and friends.
///
/// None of these leave a side effect behind: the check happens before any
/// file is moved or the store is touched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TrashError {
    #[error("File {} does not exist, and is therefore unyeetable.", .0.display())]
    NotFound(PathBuf),

    #[error("File {0} has already been yeeted.")]
    AlreadyTracked(String),

    #[error("File {0} has not been yeeted.")]
    NotTracked(String),

    #[error("File {name} already exists in its original location.")]
    DestinationOccupied { name: String, path: PathBuf },

    #[error("Cannot yeet {0}: it has no file name.")]
    InvalidName(String),

    #[error("Cannot yeet {}: it contains the yeet bin.", .0.display())]
    ContainsBin(PathBuf),

    #[error("Cannot yeet {}: it is part of the yeet bin.", .0.display())]
    InsideBin(PathBuf),
}

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record store {} is corrupt: {details}", .path.display())]
    Corrupt { path: PathBuf, details: String },

    #[error("Failed to read record store {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write record store {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    #[must_use]
    pub fn remediation(&self) -> Remediation {
        match self {
            Self::Corrupt { path, .. } => Remediation::new(format!(
                "The record store at {} is not a valid yeet store. Repair or move it aside.",
                path.display()
            ))
            .alternative("Every key must be a plain file name such as \"notes.txt\", with no '/' or '..'.")
            .command("Inspect store", format!("cat \"{}\"", path.display()))
            .command(
                "Move it aside",
                format!("mv \"{0}\" \"{0}.bak\"", path.display()),
            )
            .alternative("Moving the store aside forgets every record; held files stay in the bin."),
            Self::ReadFailed { path, .. } => Remediation::new(format!(
                "Failed to read {}. Check permissions.",
                path.display()
            ))
            .command("Check permissions", format!("ls -l \"{}\"", path.display()))
            .alternative("Ensure the file is readable by the current user."),
            Self::WriteFailed { path, .. } => Remediation::new(format!(
                "Failed to write {}. Check free space and permissions.",
                path.display()
            ))
            .command("Check permissions", format!("ls -ld \"{}\"", path.display()))
            .alternative("Ensure the yeet bin directory is writable."),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadFailed(String, String),

    #[error("Failed to parse config {0}: {1}")]
    ParseFailed(String, String),

    #[error("Could not determine the home directory")]
    NoHomeDir,
}

impl ConfigError {
    #[must_use]
    pub fn remediation(&self) -> Remediation {
        match self {
            Self::ReadFailed(path, _) => Remediation::new(format!(
                "Failed to read config file: {path}. Check permissions."
            ))
            .command("Check permissions", format!("ls -l \"{path}\""))
            .alternative("Unset YEET_CONFIG to use the default location."),
            Self::ParseFailed(path, _) => {
                Remediation::new("Config parse failed. Fix the syntax and retry.")
                    .command("Show config", format!("cat \"{path}\""))
                    .alternative("Delete the file to fall back to defaults.")
            }
            Self::NoHomeDir => Remediation::new("Set HOME or point YEET_HOME at a directory.")
                .command("Use an explicit bin", "YEET_HOME=/path/to/bin yeet --list"),
        }
    }
}
