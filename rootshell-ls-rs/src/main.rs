use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use chrono::SecondsFormat;
use clap::Parser;
use rootshell_core::listing::mode_string;
use rootshell_core::prelude::*;
use rootshell_core::print_size;

/// List a directory through a (root) shell and print the parsed records.
#[derive(Debug, Parser)]
#[command(name = "rootshell-ls", version)]
struct Args {
    /// Directory to list.
    directory: String,

    /// Run commands through `su -c` instead of `sh -c`.
    #[arg(long)]
    su: bool,

    /// Utilbox binary to prefix commands with; `auto` tries the usual candidates.
    #[arg(long)]
    utilbox: Option<String>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// Fail on the first line that cannot be parsed.
    #[arg(long)]
    strict: bool,

    /// Print paths shell-quoted.
    #[arg(long)]
    quoted: bool,

    /// Human readable sizes.
    #[arg(short = 'H', long)]
    human: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn format_entry(meta: &FileMetadata, root: &str, args: &Args) -> String {
    let path = if args.recursive {
        meta.path_relative_to(root).unwrap_or(meta.file_path())
    } else {
        meta.file_path()
    };
    let path = if args.quoted { quote(path) } else { path.to_string() };
    let size = if args.human {
        print_size(meta.file_size())
    } else {
        meta.file_size().to_string()
    };

    let mut line = format!(
        "{}{} {:04o} {}:{} {} {} {}",
        meta.file_type().as_char(),
        mode_string(meta.file_mode()),
        meta.file_mode(),
        meta.owner(),
        meta.group(),
        size,
        meta.file_mod_time().to_rfc3339_opts(SecondsFormat::Millis, true),
        path,
    );
    if let Some(target) = meta.link_target() {
        let target = if args.quoted { quote(target) } else { target.to_string() };
        line.push_str(" -> ");
        line.push_str(&target);
    }
    line
}

fn build_shell(args: &Args, environ: &HashMap<String, String>) -> Result<RootShell<ProcessExecutor>> {
    let mut config = ShellConfig::from_environ(environ)?;
    if args.strict {
        config = config.with_malformed_lines(MalformedLinePolicy::Abort);
    }
    let executor = if args.su {
        ProcessExecutor::su()
    } else {
        ProcessExecutor::sh()
    };

    match args.utilbox.as_deref() {
        Some("auto") => RootShell::with_probed_utilbox(executor, config, DEFAULT_UTILBOX_CANDIDATES),
        Some(utilbox) => Ok(RootShell::new(executor, config.with_utilbox(utilbox))),
        None => Ok(RootShell::new(executor, config)),
    }
}

fn run(args: &Args) -> Result<()> {
    let environ: HashMap<String, String> = env::vars().collect();
    let shell = build_shell(args, &environ)?;
    let entries = if args.recursive {
        shell.list_directory_recursive(&args.directory)?
    } else {
        shell.list_directory(&args.directory)?
    };
    tracing::info!(directory = %args.directory, count = entries.len(), "listing complete");

    for meta in &entries {
        println!("{}", format_entry(meta, &args.directory, args));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rootshell-ls: {err}");
            ExitCode::FAILURE
        }
    }
}
