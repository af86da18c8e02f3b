//! Provider command handlers.

use tabled::Tabled;

use connexia_core::ProviderOverview;
use connexia_core::metrics;

use crate::cli::{GlobalOpts, ProvidersArgs, ProvidersCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sites")]
    sites: usize,
    #[tabled(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Blocked")]
    blocked: usize,
}

impl From<&ProviderOverview> for ProviderRow {
    fn from(p: &ProviderOverview) -> Self {
        Self {
            id: p.provider.id.to_string(),
            name: p.provider.name.clone(),
            sites: p.sites,
            orders: p.orders,
            blocked: p.blocked_orders,
        }
    }
}

fn detail(p: &ProviderOverview) -> String {
    [
        format!("ID:      {}", p.provider.id),
        format!("Name:    {}", p.provider.name),
        format!("Sites:   {}", p.sites),
        format!("Orders:  {}", p.orders),
        format!("Blocked: {}", p.blocked_orders),
    ]
    .join("\n")
}

pub fn handle(ctx: &Context, args: ProvidersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        ProvidersCommand::List => output::render_list(
            ctx.output(),
            &metrics::provider_overviews(&ctx.scope()),
            |p| ProviderRow::from(p),
            |p| p.provider.id.to_string(),
        )?,
        ProvidersCommand::Get { provider } => output::render_single(
            ctx.output(),
            &metrics::provider_overview(&ctx.scope(), &provider)?,
            detail,
            |p| p.provider.id.to_string(),
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
