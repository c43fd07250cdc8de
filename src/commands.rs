//! Builders for the follow-on commands run against listed paths.
//!
//! Every path goes through [`quote`]; nothing is interpolated raw.

use crate::models::Ownership;
use crate::quote::{quote, quote_all};

/// Builds command lines, optionally prefixed with a utilbox binary
/// (`toybox ls ...` instead of `ls ...`).
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CommandBuilder {
    utilbox: Option<String>,
}

impl CommandBuilder {
    pub fn new(utilbox: Option<String>) -> Self {
        Self { utilbox }
    }

    pub fn utilbox(&self) -> Option<&str> {
        self.utilbox.as_deref()
    }

    /// `<utilbox> <tool> <args>`; `args` must already be quoted. The utilbox
    /// path comes from configuration and is quoted here.
    pub fn tool(&self, tool: &str, args: &str) -> String {
        let mut command = String::new();
        if let Some(utilbox) = &self.utilbox {
            command.push_str(&quote(utilbox));
            command.push(' ');
        }
        command.push_str(tool);
        if !args.is_empty() {
            command.push(' ');
            command.push_str(args);
        }
        command
    }

    pub fn list_detailed(&self, directory: &str, flags: &str) -> String {
        let args = if flags.is_empty() {
            quote(directory)
        } else {
            format!("{flags} {}", quote(directory))
        };
        self.tool("ls", &args)
    }

    pub fn list_names(&self, directory: &str) -> String {
        self.tool("ls", &format!("-A {}", quote(directory)))
    }

    pub fn stat_owner_group(&self, path: &str) -> String {
        self.tool("stat", &format!("-c '%u %g' {}", quote(path)))
    }

    /// `<candidate> --version`, used to check a utilbox before relying on it.
    pub fn version_check(candidate: &str) -> String {
        format!("{} --version", quote(candidate))
    }

    pub fn remove(&self, path: &str) -> String {
        self.tool("rm", &quote(path))
    }

    pub fn remove_all<I, S>(&self, paths: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tool("rm", &quote_all(paths))
    }

    pub fn remove_recursive(&self, path: &str) -> String {
        self.tool("rm", &format!("-r {}", quote(path)))
    }

    pub fn move_path(&self, source: &str, target: &str) -> String {
        self.tool("mv", &format!("{} {}", quote(source), quote(target)))
    }

    pub fn copy(&self, source: &str, target: &str) -> String {
        self.tool("cp", &format!("{} {}", quote(source), quote(target)))
    }

    pub fn touch(&self, path: &str) -> String {
        self.tool("touch", &quote(path))
    }

    pub fn make_dir(&self, path: &str) -> String {
        self.tool("mkdir", &quote(path))
    }

    pub fn make_fifo(&self, path: &str) -> String {
        self.tool("mkfifo", &quote(path))
    }

    /// `ln -s <target> <link>`: creates `link` pointing at `target`.
    pub fn symlink(&self, target: &str, link: &str) -> String {
        self.tool("ln", &format!("-s {} {}", quote(target), quote(link)))
    }

    pub fn chown_recursive<I, S>(&self, ownership: Ownership, paths: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tool("chown", &format!("-R {ownership} {}", quote_all(paths)))
    }

    pub fn chmod_recursive(&self, mode: u32, path: &str) -> String {
        self.tool("chmod", &format!("-R {mode:o} {}", quote(path)))
    }
}
