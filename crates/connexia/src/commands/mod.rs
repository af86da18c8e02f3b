//! Command dispatch: bridges CLI args -> core derivations -> output formatting.

pub mod activity;
pub mod cases;
pub mod completions;
pub mod config_cmd;
pub mod dashboard;
pub mod invoices;
pub mod orders;
pub mod providers;
pub mod sites;
pub mod util;

use chrono::{DateTime, Utc};

use connexia_core::{Scope, Snapshot};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, Palette};

/// One captured snapshot plus the settings every handler reads.
#[derive(Debug)]
pub struct Context {
    pub snapshot: Snapshot,
    /// Pinned once per invocation so every view agrees on "now".
    pub now: DateTime<Utc>,
    pub settings: Settings,
}

impl Context {
    pub fn scope(&self) -> Scope<'_> {
        Scope::new(&self.snapshot, self.now, self.settings.policy)
    }

    pub fn output(&self) -> OutputFormat {
        self.settings.output
    }

    pub fn palette(&self) -> Palette {
        Palette::new(output::should_color(self.settings.color))
    }
}

/// Dispatch a snapshot-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Dashboard => dashboard::handle(ctx, global),
        Command::Sites(args) => sites::handle(ctx, args, global),
        Command::Providers(args) => providers::handle(ctx, args, global),
        Command::Orders(args) => orders::handle(ctx, args, global),
        Command::Cases(args) => cases::handle(ctx, args, global),
        Command::Invoices(args) => invoices::handle(ctx, args, global),
        Command::Activity(args) => activity::handle(ctx, &args, global),
        // Config and Completions are handled before a snapshot is loaded
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions::handle(args.shell);
            Ok(())
        }
    }
}
