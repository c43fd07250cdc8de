use chrono::{DateTime, Utc};

/// File type as encoded by the first character of a listing permission string.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FileType {
    RegularFile,
    Directory,
    SymbolicLink,
    BlockDevice,
    CharacterDevice,
    Fifo,
    Socket,
    Unknown,
}

impl FileType {
    pub fn from_type_char(c: char) -> Self {
        match c {
            '-' => Self::RegularFile,
            'd' => Self::Directory,
            'l' => Self::SymbolicLink,
            'b' => Self::BlockDevice,
            'c' => Self::CharacterDevice,
            'p' => Self::Fifo,
            's' => Self::Socket,
            _ => Self::Unknown,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::RegularFile => '-',
            Self::Directory => 'd',
            Self::SymbolicLink => 'l',
            Self::BlockDevice => 'b',
            Self::CharacterDevice => 'c',
            Self::Fifo => 'p',
            Self::Socket => 's',
            Self::Unknown => '?',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegularFile => "regular file",
            Self::Directory => "directory",
            Self::SymbolicLink => "symbolic link",
            Self::BlockDevice => "block device",
            Self::CharacterDevice => "character device",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed listing line.
///
/// Records are values: every field is set once by the parser and only exposed
/// through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub(crate) file_path: String,
    pub(crate) absolute_path: String,
    pub(crate) owner: String,
    pub(crate) group: String,
    pub(crate) file_size: u64,
    pub(crate) file_mod_time: DateTime<Utc>,
    pub(crate) file_mode: u32,
    pub(crate) file_type: FileType,
    pub(crate) link_target: Option<String>,
}

impl FileMetadata {
    /// Name relative to the containing directory, verbatim from the listing.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Modification instant, truncated to millisecond precision.
    pub fn file_mod_time(&self) -> DateTime<Utc> {
        self.file_mod_time
    }

    /// Permission bits, including setuid/setgid/sticky (`0o7777` mask).
    pub fn file_mode(&self) -> u32 {
        self.file_mode
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Target of a symbolic link when the listing carried `name -> target`.
    pub fn link_target(&self) -> Option<&str> {
        self.link_target.as_deref()
    }

    pub fn is_directory(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Path of this record below `root`, e.g. `sub/dir/file` for a record found
    /// by a recursive listing of `root`.
    pub fn path_relative_to(&self, root: &str) -> Option<&str> {
        let root = root.trim_end_matches('/');
        self.absolute_path
            .strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }
}

/// Numeric owner and group of a path, as reported by `stat -c '%u %g'`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl std::fmt::Display for Ownership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

/// Captured result of one command run through a [`crate::CommandExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: Vec<String>,
    /// Stdout lines that are not valid UTF-8, kept as raw bytes and left out of
    /// `stdout`.
    pub undecodable_stdout: Vec<Vec<u8>>,
    pub stderr: Vec<String>,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(command: impl Into<String>, stdout: impl Into<Vec<String>>) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            undecodable_stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: 0,
        }
    }

    /// Splits raw process output into lines.
    ///
    /// Lines end at `\n` only, so a `\r` that belongs to a file name is kept.
    /// Stderr is diagnostic text and is decoded lossily.
    pub fn from_raw(command: impl Into<String>, stdout: &[u8], stderr: &[u8], exit_code: i32) -> Self {
        let mut lines = Vec::new();
        let mut undecodable_stdout = Vec::new();
        for raw in raw_lines(stdout) {
            match String::from_utf8(raw.to_vec()) {
                Ok(line) => lines.push(line),
                Err(err) => undecodable_stdout.push(err.into_bytes()),
            }
        }
        Self {
            command: command.into(),
            stdout: lines,
            undecodable_stdout,
            stderr: raw_lines(stderr)
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .collect(),
            exit_code,
        }
    }

    pub fn with_error(command: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            stdout: Vec::new(),
            undecodable_stdout: Vec::new(),
            stderr: vec![stderr.into()],
            exit_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

fn raw_lines(raw: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = raw.strip_suffix(b"\n").unwrap_or(raw);
    let mut pieces = body.split(|&b| b == b'\n');
    if raw.is_empty() {
        pieces.next();
    }
    pieces
}
