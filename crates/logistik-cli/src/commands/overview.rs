//! Dashboard summary command.

use anyhow::Result;
use logistik_core::shipment;

use super::Context;
use crate::output;

pub fn execute(ctx: &Context) -> Result<()> {
    let pool = ctx.pool()?;
    let overview = shipment::overview(&pool, ctx.rule())?;
    output::print_overview(&overview, ctx.rule());
    Ok(())
}
