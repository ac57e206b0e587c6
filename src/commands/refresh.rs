//! Refresh command: remove and reinstall the scripts

use super::Context;
use crate::error::Result;
use crate::ui::display;

pub fn run(ctx: &Context) -> Result<()> {
    let installer = ctx.installer()?;
    let report = installer.force_refresh()?;
    display::display_install_report(&report);
    Ok(())
}
