//! Status command

use super::Context;
use crate::cli::StatusArgs;
use crate::error::Result;
use crate::ui::display;

pub fn run(ctx: &Context, args: StatusArgs) -> Result<()> {
    let installer = ctx.installer()?;
    let report = installer.status()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::display_status(&report);
    }
    Ok(())
}
