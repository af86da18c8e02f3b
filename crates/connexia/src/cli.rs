//! Clap derive structures for the `connexia` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Filter values stay plain strings here; the command handlers parse them
//! through the core criteria so flags and `--where` queries validate alike.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// connexia -- service delivery metrics from the command line
#[derive(Debug, Parser)]
#[command(
    name = "connexia",
    version,
    about = "Service delivery metrics: order status, case SLAs, billing",
    long_about = "Derives dashboard metrics from a Connexia dataset.\n\n\
        Orders get their status from their milestones, chips count records\n\
        by category, and at-risk lists flag blocked or late work.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "CONNEXIA_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dataset file (.json, .yaml, .toml); the built-in sample when unset
    #[arg(long, short = 'd', env = "CONNEXIA_DATA", global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Evaluate as of this instant (RFC 3339 or YYYY-MM-DD) instead of now
    #[arg(long, env = "CONNEXIA_NOW", global = true, value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// Output format (overrides the config default)
    #[arg(long, short = 'o', env = "CONNEXIA_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Landing dashboard: totals, chips, at-risk lists, recent activity
    #[command(alias = "dash")]
    Dashboard,

    /// Customer sites
    Sites(SitesArgs),

    /// Access and transit providers
    Providers(ProvidersArgs),

    /// Service orders and their derived status
    #[command(alias = "o")]
    Orders(OrdersArgs),

    /// Support cases and SLA risk
    #[command(alias = "c")]
    Cases(CasesArgs),

    /// Invoices and billing totals
    Invoices(InvoicesArgs),

    /// Recent activity, newest first
    #[command(alias = "events")]
    Activity(ActivityArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Filter Arguments ──────────────────────────────────────────

/// Drill-through query merged under the explicit filter flags.
#[derive(Debug, Default, Args)]
pub struct WhereArg {
    /// Query string such as "status=blocked&region=EMEA" (flags win)
    #[arg(long = "where", short = 'w', value_name = "QUERY")]
    pub query: Option<String>,
}

/// Provider, region, and free-text filters shared by every list.
#[derive(Debug, Default, Args)]
pub struct ScopeFilter {
    /// Provider ID
    #[arg(long)]
    pub provider: Option<String>,

    /// Region (UK, EMEA, APAC, AMER)
    #[arg(long)]
    pub region: Option<String>,

    /// Case-insensitive free-text search
    #[arg(long = "search", short = 's', value_name = "TEXT")]
    pub search: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Default, Args)]
pub struct SiteFilter {
    #[command(flatten)]
    pub scope: ScopeFilter,

    /// Criticality (critical, standard)
    #[arg(long)]
    pub criticality: Option<String>,

    #[command(flatten)]
    pub where_clause: WhereArg,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List sites
    #[command(alias = "ls")]
    List(SiteFilter),

    /// Site overview: orders, open cases, outstanding billing, activity
    Get {
        /// Site ID
        site: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROVIDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    pub command: ProvidersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProvidersCommand {
    /// List providers with their delivery footprint
    #[command(alias = "ls")]
    List,

    /// Show one provider's footprint
    Get {
        /// Provider ID
        provider: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Default, Args)]
pub struct OrderFilter {
    /// Site ID
    #[arg(long)]
    pub site: Option<String>,

    #[command(flatten)]
    pub scope: ScopeFilter,

    /// Service type (internet, sd-wan, security)
    #[arg(long)]
    pub service_type: Option<String>,

    /// Derived status (planned, in_progress, blocked, done)
    #[arg(long)]
    pub status: Option<String>,

    /// Derived blocked reason
    #[arg(long)]
    pub blocked_reason: Option<String>,

    /// Team owning a blocked milestone
    #[arg(long)]
    pub owner_team: Option<String>,

    /// Only orders that are blocked or inside the risk window
    #[arg(long)]
    pub at_risk: bool,

    #[command(flatten)]
    pub where_clause: WhereArg,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders, soonest target date first
    #[command(alias = "ls")]
    List(OrderFilter),

    /// Order details with milestones and derived status
    Get {
        /// Order ID
        order: String,
    },

    /// Orders that are blocked or due inside the risk window
    AtRisk(OrderFilter),

    /// Count orders by one dimension
    Counts {
        /// Dimension: status, service-type, blocked-reason, blocked-owner, region, provider
        #[arg(long, short = 'b', default_value = "status")]
        by: String,

        #[command(flatten)]
        filter: OrderFilter,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CASES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CasesArgs {
    #[command(subcommand)]
    pub command: CasesCommand,
}

#[derive(Debug, Default, Args)]
pub struct CaseFilter {
    /// Site ID
    #[arg(long)]
    pub site: Option<String>,

    #[command(flatten)]
    pub scope: ScopeFilter,

    /// Severity (sev1, sev2, sev3)
    #[arg(long)]
    pub severity: Option<String>,

    /// Status (open, investigating, waiting, resolved)
    #[arg(long)]
    pub status: Option<String>,

    /// Owner team (NOC, "Service Delivery", Provider)
    #[arg(long)]
    pub owner_team: Option<String>,

    /// Only cases that are not resolved
    #[arg(long)]
    pub open: bool,

    /// Only open cases inside the SLA threshold
    #[arg(long)]
    pub sla_risk: bool,

    #[command(flatten)]
    pub where_clause: WhereArg,
}

#[derive(Debug, Subcommand)]
pub enum CasesCommand {
    /// List cases, earliest SLA due first
    #[command(alias = "ls")]
    List(CaseFilter),

    /// Case details with hours left on the SLA
    Get {
        /// Case ID
        case: String,
    },

    /// Open cases inside the SLA threshold, most urgent first
    SlaRisk(CaseFilter),

    /// Count cases by one dimension
    Counts {
        /// Dimension: severity, status, owner-team, region, provider
        #[arg(long, short = 'b', default_value = "severity")]
        by: String,

        #[command(flatten)]
        filter: CaseFilter,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVOICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InvoicesArgs {
    #[command(subcommand)]
    pub command: InvoicesCommand,
}

#[derive(Debug, Default, Args)]
pub struct InvoiceFilter {
    /// Site ID
    #[arg(long)]
    pub site: Option<String>,

    #[command(flatten)]
    pub scope: ScopeFilter,

    /// Status (paid, due, disputed)
    #[arg(long)]
    pub status: Option<String>,

    /// Billing period (YYYY-MM)
    #[arg(long)]
    pub period: Option<String>,

    #[command(flatten)]
    pub where_clause: WhereArg,
}

#[derive(Debug, Subcommand)]
pub enum InvoicesCommand {
    /// List invoices, newest period first
    #[command(alias = "ls")]
    List(InvoiceFilter),

    /// Amount and count per status plus the outstanding amount
    Totals(InvoiceFilter),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACTIVITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Default, Args)]
pub struct ActivityArgs {
    /// Site ID
    #[arg(long)]
    pub site: Option<String>,

    #[command(flatten)]
    pub scope: ScopeFilter,

    /// Order ID
    #[arg(long)]
    pub order: Option<String>,

    /// Case ID
    #[arg(long)]
    pub case: Option<String>,

    /// Event kind (e.g. milestone_blocked, case_opened)
    #[arg(long)]
    pub kind: Option<String>,

    /// Only events at or after this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "TIMESTAMP")]
    pub since: Option<String>,

    /// Max events to show (defaults to the dashboard activity limit)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub where_clause: WhereArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
