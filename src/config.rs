use std::collections::HashMap;

use crate::errors::CoreError;
use crate::helpers::LISTING_FLAGS;

/// Environment variable naming the utilbox binary to prefix commands with.
pub const ENV_UTILBOX: &str = "ROOTSHELL_UTILBOX";
/// Environment variable overriding the flags passed to `ls`.
pub const ENV_LS_FLAGS: &str = "ROOTSHELL_LS_FLAGS";
/// Environment variable selecting the malformed line policy (`skip` or `abort`).
pub const ENV_MALFORMED: &str = "ROOTSHELL_MALFORMED";

/// What a listing does with a line the parser rejects.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MalformedLinePolicy {
    /// Log a warning and keep going.
    #[default]
    Skip,
    /// Fail the whole listing.
    Abort,
}

impl MalformedLinePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

impl std::str::FromStr for MalformedLinePolicy {
    type Err = CoreError;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(CoreError::invalid_config(format!(
                "{ENV_MALFORMED} must be `skip` or `abort`, got {other:?}"
            ))),
        }
    }
}

/// Settings for [`crate::RootShell`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShellConfig {
    pub utilbox: Option<String>,
    pub listing_flags: String,
    pub malformed_lines: MalformedLinePolicy,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            utilbox: None,
            listing_flags: LISTING_FLAGS.to_string(),
            malformed_lines: MalformedLinePolicy::default(),
        }
    }
}

impl ShellConfig {
    /// Reads overrides from an environment map; unset or empty variables keep
    /// the defaults.
    pub fn from_environ(environ: &HashMap<String, String>) -> crate::Result<Self> {
        let mut config = Self::default();
        if let Some(utilbox) = non_empty(environ, ENV_UTILBOX) {
            config.utilbox = Some(utilbox.to_string());
        }
        if let Some(flags) = non_empty(environ, ENV_LS_FLAGS) {
            config.listing_flags = flags.to_string();
        }
        if let Some(policy) = non_empty(environ, ENV_MALFORMED) {
            config.malformed_lines = policy.parse()?;
        }
        Ok(config)
    }

    pub fn with_utilbox(mut self, utilbox: impl Into<String>) -> Self {
        self.utilbox = Some(utilbox.into());
        self
    }

    pub fn with_listing_flags(mut self, flags: impl Into<String>) -> Self {
        self.listing_flags = flags.into();
        self
    }

    pub fn with_malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }
}

fn non_empty<'a>(environ: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    environ
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
