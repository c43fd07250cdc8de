#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use rootshell_core::{CommandExecutor, CommandOutput, Result};

pub const FDROID_DIR: &str = "/data/data/org.fdroid.fdroid/files";

pub const AURORA_LINE: &str =
    "-rw------- 1 user0_a247 group0_a247 15951095 2021-01-19 01:03:29.000000000 +0100 Aurora Store-3.2.8.apk";
pub const SPACES_LINE: &str =
    "-rw------- 1 user0_a247 group0_a247 15951095 2021-01-19 01:03:29.000000000 +0100 111   333.file";
pub const SPECIAL_LINE: &str = r#"-rw------- 1 user0_a247 group0_a247 15951095 2021-01-19 01:03:29.000000000 +0100 My|#$%^&*[](){}'"`:;?<~>,.file"#;

/// Executor answering from a fixed command table and recording every command
/// it was asked to run. Unknown commands exit with 127.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, stdout: &[&str]) -> Self {
        let stdout: Vec<String> = stdout.iter().map(|line| line.to_string()).collect();
        self.responses
            .insert(command.to_string(), CommandOutput::success(command, stdout));
        self
    }

    /// Answers with raw bytes, split the way a real process's output is.
    pub fn respond_raw(mut self, command: &str, stdout: &[u8]) -> Self {
        self.responses
            .insert(command.to_string(), CommandOutput::from_raw(command, stdout, b"", 0));
        self
    }

    pub fn fail(mut self, command: &str, exit_code: i32, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput::with_error(command, exit_code, stderr),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, command: &str) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok(self
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| CommandOutput::with_error(command, 127, "command not found")))
    }
}
