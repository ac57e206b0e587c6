//! Command implementations for the DeskyMode CLI

pub mod completions;
pub mod ensure;
pub mod refresh;
pub mod status;
pub mod version;

use std::path::{Path, PathBuf};

use crate::cli::{Cli, ProbeArgs};
use crate::config::{self, DeskyConfig, Manifest};
use crate::error::Result;
use crate::installer::{Hosts, Installer};
use crate::probe::{CapabilityProbe, ChainedProbe, SourceTreeProbe, StaticProbe};
use crate::refresh::{self as asset_refresh, AssetRefresher};
use crate::ui::TerminalDialog;

/// Everything a project command needs, resolved from the global flags
pub struct Context {
    pub project_root: PathBuf,
    pub config: DeskyConfig,
    probe: Box<dyn CapabilityProbe>,
    dialogs: TerminalDialog,
    refresher: Box<dyn AssetRefresher>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = config::resolve_project_root(cli.project.clone())?;
        let config = DeskyConfig::load(&project_root, cli.config.as_deref())?;
        tracing::debug!(project = %project_root.display(), "resolved project");

        let probe = build_probe(&cli.probe, &config, &project_root);
        let refresher = asset_refresh::from_command(config.refresh_command.as_deref());

        Ok(Self {
            project_root,
            config,
            probe,
            dialogs: TerminalDialog::detect(cli.no_input),
            refresher,
        })
    }

    /// Resolve the manifest and wire up an installer
    pub fn installer(&self) -> Result<Installer<'_>> {
        let manifest = Manifest::resolve(&self.config, &self.project_root)?;
        Ok(Installer::new(
            self.project_root.clone(),
            &self.config,
            manifest,
            Hosts {
                probe: self.probe.as_ref(),
                dialogs: &self.dialogs,
                refresher: self.refresher.as_ref(),
            },
        ))
    }
}

fn build_probe(
    args: &ProbeArgs,
    config: &DeskyConfig,
    project_root: &Path,
) -> Box<dyn CapabilityProbe> {
    let declared = StaticProbe::new(args.present.iter().map(|name| name.trim()));
    if args.no_scan {
        return Box::new(declared);
    }

    Box::new(
        ChainedProbe::new()
            .with(declared)
            .with(SourceTreeProbe::new(config.scan_paths(project_root))),
    )
}
