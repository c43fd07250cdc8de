use std::io;

/// Reasons a single listing line could not be turned into a [`crate::FileMetadata`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not have the fixed columns followed by a name.
    #[error("malformed listing line: {0}")]
    MalformedLine(String),

    /// The size column is not a non-negative integer.
    #[error("invalid size field: {0}")]
    InvalidSize(String),

    /// The date, time and offset columns do not form a timestamp.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl ParseError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedLine(message.into())
    }
}

/// Error type for everything above the pure parser: running commands and
/// interpreting their output.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// A listing line was rejected while the malformed-line policy is `Abort`.
    #[error("unable to parse listing line {line:?}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },

    /// The command ran but exited with a non-zero code.
    #[error("command `{command}` failed with exit code {exit_code}: {}", .stderr.join("; "))]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: Vec<String>,
    },

    /// The command succeeded but printed something we cannot interpret.
    #[error("unexpected output from `{command}`: {message}")]
    UnexpectedOutput { command: String, message: String },

    /// None of the utilbox candidates answered `--version`.
    #[error("no usable utilbox, tried: {}", .0.join(", "))]
    UtilboxUnavailable(Vec<String>),

    /// The shell process itself could not be spawned.
    #[error("I/O error while running {0}")]
    Io(String, #[source] io::Error),

    /// A configuration value is not acceptable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    pub fn parse(line: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            line: line.into(),
            source,
        }
    }

    pub fn unexpected(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn io(program: impl Into<String>, error: io::Error) -> Self {
        Self::Io(program.into(), error)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
