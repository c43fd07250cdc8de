//! Shell output interpretation and argument quoting for root-shell driven
//! backup tooling.
//! The parser and quoter are pure functions; everything that touches a shell
//! goes through the [`CommandExecutor`] boundary.

pub mod commands;
pub mod config;
pub mod errors;
pub mod executor;
pub mod helpers;
pub mod listing;
pub mod models;
pub mod quote;
pub mod shell;

pub use commands::CommandBuilder;
pub use config::{MalformedLinePolicy, ShellConfig};
pub use errors::{CoreError, ParseError, Result};
pub use executor::{CommandExecutor, ProcessExecutor};
pub use helpers::{
    is_listing_noise,
    join_absolute,
    print_size,
    LISTING_FLAGS,
    LISTING_TIME_FORMAT,
};
pub use listing::{parse_line, render_line};
pub use models::{CommandOutput, FileMetadata, FileType, Ownership};
pub use quote::{quote, quote_all};
pub use shell::{probe_utilbox, RootShell, DEFAULT_UTILBOX_CANDIDATES};

/// Re-export a small stable API surface for command crates.
pub mod prelude {
    pub use crate::{
        commands::CommandBuilder,
        config::*,
        errors::{CoreError, ParseError, Result},
        executor::{CommandExecutor, ProcessExecutor},
        listing::{parse_line, render_line},
        models::*,
        quote::{quote, quote_all},
        shell::{probe_utilbox, RootShell, DEFAULT_UTILBOX_CANDIDATES},
    };
}
