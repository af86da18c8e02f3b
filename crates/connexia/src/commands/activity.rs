//! Activity feed handler.

use std::sync::Arc;

use tabled::Tabled;

use connexia_core::{Event, EventCriteria, Snapshot};

use crate::cli::{ActivityArgs, GlobalOpts, WhereArg};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util::{self, FilterFlags};

impl FilterFlags for ActivityArgs {
    type Criteria = EventCriteria;

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        util::pair(&mut pairs, "site", self.site.as_ref());
        util::scope_pairs(&mut pairs, &self.scope);
        util::pair(&mut pairs, "order", self.order.as_ref());
        util::pair(&mut pairs, "case", self.case.as_ref());
        util::pair(&mut pairs, "kind", self.kind.as_ref());
        util::pair(&mut pairs, "since", self.since.as_ref());
        pairs
    }

    fn where_clause(&self) -> &WhereArg {
        &self.where_clause
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl EventRow {
    fn new(snapshot: &Snapshot, e: &Arc<Event>) -> Self {
        Self {
            time: util::timestamp(e.timestamp),
            kind: e.kind.label().to_owned(),
            site: e
                .site_id
                .as_ref()
                .map(|id| snapshot.site_name(id).to_owned())
                .unwrap_or_default(),
            summary: e.summary.clone(),
        }
    }
}

pub fn handle(ctx: &Context, args: &ActivityArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let criteria = util::criteria(args)?;
    let mut events = ctx.scope().events(&criteria);
    events.truncate(args.limit.unwrap_or(ctx.settings.activity_limit));

    let out = output::render_list(
        ctx.output(),
        &events,
        |e| EventRow::new(&ctx.snapshot, e),
        |e| e.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
