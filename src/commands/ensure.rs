//! Ensure command: install the scripts on first use

use super::Context;
use crate::error::Result;
use crate::ui::display;

pub fn run(ctx: &Context) -> Result<()> {
    let installer = ctx.installer()?;
    let outcome = installer.ensure_installed()?;
    display::display_outcome(&outcome);
    Ok(())
}
