//! Orchestration over a [`CommandExecutor`]: runs listing and stat commands,
//! parses their output and applies the configured malformed-line policy.

use tracing::{debug, info, warn};

use crate::commands::CommandBuilder;
use crate::config::{MalformedLinePolicy, ShellConfig};
use crate::errors::{CoreError, ParseError};
use crate::executor::CommandExecutor;
use crate::helpers::is_listing_noise;
use crate::listing::parse_line;
use crate::models::{CommandOutput, FileMetadata, Ownership};

/// Utilbox binaries tried by [`probe_utilbox`] when the caller has no preference.
pub const DEFAULT_UTILBOX_CANDIDATES: [&str; 3] = ["toybox", "/system/bin/toybox", "busybox"];

/// Returns the first candidate that answers `--version` successfully.
pub fn probe_utilbox<E, I, S>(executor: &E, candidates: I) -> crate::Result<String>
where
    E: CommandExecutor + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tried = Vec::new();
    for candidate in candidates {
        let candidate = candidate.into();
        let command = CommandBuilder::version_check(&candidate);
        match executor.execute(&command) {
            Ok(output) if output.is_success() => {
                let version = output
                    .stdout
                    .first()
                    .map(String::as_str)
                    .unwrap_or("not returned");
                info!(utilbox = %candidate, version, "using utilbox");
                return Ok(candidate);
            }
            Ok(output) => {
                debug!(utilbox = %candidate, exit_code = output.exit_code, "utilbox not available");
            }
            Err(err) => {
                debug!(utilbox = %candidate, error = %err, "utilbox not available");
            }
        }
        tried.push(candidate);
    }
    Err(CoreError::UtilboxUnavailable(tried))
}

/// Privileged shell session wrapper.
#[derive(Debug)]
pub struct RootShell<E> {
    executor: E,
    config: ShellConfig,
}

impl<E: CommandExecutor> RootShell<E> {
    pub fn new(executor: E, config: ShellConfig) -> Self {
        Self { executor, config }
    }

    /// Probes `candidates` and stores the first working utilbox in the config.
    pub fn with_probed_utilbox<I, S>(executor: E, config: ShellConfig, candidates: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let utilbox = probe_utilbox(&executor, candidates)?;
        Ok(Self::new(executor, config.with_utilbox(utilbox)))
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Builder for follow-on commands sharing this shell's utilbox prefix.
    pub fn commands(&self) -> CommandBuilder {
        CommandBuilder::new(self.config.utilbox.clone())
    }

    /// Runs `command`; a non-zero exit code becomes [`CoreError::CommandFailed`].
    pub fn run(&self, command: &str) -> crate::Result<CommandOutput> {
        debug!(command, "running command");
        let output = self.executor.execute(command)?;
        debug!(command, exit_code = output.exit_code, "command finished");
        if !output.is_success() {
            return Err(CoreError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }

    /// Detailed listing of `directory`, one record per entry.
    pub fn list_directory(&self, directory: &str) -> crate::Result<Vec<FileMetadata>> {
        let command = self
            .commands()
            .list_detailed(directory, &self.config.listing_flags);
        let output = self.run(&command)?;
        self.reject_undecodable(directory, &output)?;

        let mut entries = Vec::with_capacity(output.stdout.len());
        for line in output.stdout.iter().filter(|line| !is_listing_noise(line)) {
            match parse_line(line, directory) {
                Ok(meta) => entries.push(meta),
                Err(err) => self.malformed_line(directory, line, err)?,
            }
        }
        Ok(entries)
    }

    /// Applies the malformed-line policy to stdout lines that are not valid UTF-8.
    fn reject_undecodable(&self, directory: &str, output: &CommandOutput) -> crate::Result<()> {
        for raw in &output.undecodable_stdout {
            let line = String::from_utf8_lossy(raw);
            let err = ParseError::malformed(format!("not valid UTF-8: {}", raw.escape_ascii()));
            self.malformed_line(directory, &line, err)?;
        }
        Ok(())
    }

    fn malformed_line(&self, directory: &str, line: &str, err: ParseError) -> crate::Result<()> {
        match self.config.malformed_lines {
            MalformedLinePolicy::Skip => {
                warn!(directory, line = %line, error = %err, "skipping listing line");
                Ok(())
            }
            MalformedLinePolicy::Abort => Err(CoreError::parse(line, err)),
        }
    }

    /// Detailed listing of `directory` and every directory below it. Symbolic
    /// links are reported but never followed.
    pub fn list_directory_recursive(&self, directory: &str) -> crate::Result<Vec<FileMetadata>> {
        let mut result = Vec::new();
        let mut pending = vec![directory.to_string()];
        while let Some(current) = pending.pop() {
            let entries = self.list_directory(&current)?;
            pending.extend(
                entries
                    .iter()
                    .rev()
                    .filter(|meta| meta.is_directory())
                    .map(|meta| meta.absolute_path().to_string()),
            );
            result.extend(entries);
        }
        Ok(result)
    }

    /// Bare entry names of `directory`.
    pub fn directory_names(&self, directory: &str) -> crate::Result<Vec<String>> {
        let output = self.run(&self.commands().list_names(directory))?;
        self.reject_undecodable(directory, &output)?;
        Ok(output
            .stdout
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Numeric owner and group of `path`.
    pub fn owner_and_group(&self, path: &str) -> crate::Result<Ownership> {
        let command = self.commands().stat_owner_group(path);
        let output = self.run(&command)?;
        let line = output
            .stdout
            .first()
            .ok_or_else(|| CoreError::unexpected(&command, "no output"))?;

        let fields: Vec<&str> = line.split(' ').collect();
        let [uid, gid] = fields.as_slice() else {
            return Err(CoreError::unexpected(
                &command,
                format!("expected 2 values, got {}", fields.len()),
            ));
        };
        let parse_id = |value: &str, what: &str| {
            value
                .parse::<u32>()
                .map_err(|_| CoreError::unexpected(&command, format!("invalid {what} {value:?}")))
        };
        Ok(Ownership {
            uid: parse_id(*uid, "uid")?,
            gid: parse_id(*gid, "gid")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Scripted(HashMap<String, CommandOutput>);

    impl CommandExecutor for Scripted {
        fn execute(&self, command: &str) -> crate::Result<CommandOutput> {
            Ok(self
                .0
                .get(command)
                .cloned()
                .unwrap_or_else(|| CommandOutput::with_error(command, 127, "not found")))
        }
    }

    fn scripted(pairs: &[(&str, &[&str])]) -> Scripted {
        Scripted(
            pairs
                .iter()
                .map(|(cmd, out)| {
                    let stdout: Vec<String> = out.iter().map(|s| s.to_string()).collect();
                    (cmd.to_string(), CommandOutput::success(*cmd, stdout))
                })
                .collect(),
        )
    }

    #[test]
    fn failing_command_is_an_error() {
        let shell = RootShell::new(scripted(&[]), ShellConfig::default());
        let err = shell.run("false").unwrap_err();
        assert!(matches!(
            err,
            CoreError::CommandFailed { exit_code: 127, ref stderr, .. } if stderr == &["not found"]
        ));
    }

    #[test]
    fn owner_and_group_parses_two_ids() {
        let shell = RootShell::new(
            scripted(&[(r#"stat -c '%u %g' "/data/data/app""#, &["10074 10075"])]),
            ShellConfig::default(),
        );
        assert_eq!(
            shell.owner_and_group("/data/data/app").unwrap(),
            Ownership { uid: 10074, gid: 10075 }
        );
    }

    #[test]
    fn owner_and_group_rejects_odd_output() {
        for out in ["10074", "10074 ", "a b", "1 2 3"] {
            let shell = RootShell::new(
                scripted(&[(r#"stat -c '%u %g' "/p""#, &[out])]),
                ShellConfig::default(),
            );
            assert!(
                matches!(shell.owner_and_group("/p"), Err(CoreError::UnexpectedOutput { .. })),
                "{out:?}"
            );
        }
    }

    #[test]
    fn first_working_candidate_wins() {
        let executor = scripted(&[(r#""busybox" --version"#, &["BusyBox v1.36"])]);
        let found = probe_utilbox(&executor, DEFAULT_UTILBOX_CANDIDATES).unwrap();
        assert_eq!(found, "busybox");
    }

    #[test]
    fn unavailable_utilbox_reports_all_tried() {
        let err = probe_utilbox(&scripted(&[]), ["a", "b"]).unwrap_err();
        assert!(matches!(err, CoreError::UtilboxUnavailable(ref tried) if tried == &["a", "b"]));
    }
}
