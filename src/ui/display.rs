//! Display functions for install outcomes and status

use console::Style;

use crate::installer::{EnsureOutcome, FileState, InstallReport, StatusReport};
use crate::probe::PresenceFlags;

fn yes_no(value: bool) -> console::StyledObject<&'static str> {
    if value {
        Style::new().green().apply_to("yes")
    } else {
        Style::new().dim().apply_to("no")
    }
}

/// Print what `ensure` did
pub fn display_outcome(outcome: &EnsureOutcome) {
    match outcome {
        EnsureOutcome::AlreadyInstalled => {
            println!("DeskyMode scripts are already installed.");
        }
        EnsureOutcome::UnexpectedLocation => {
            println!("DeskyMode scripts are loaded from an unexpected location; nothing changed.");
        }
        EnsureOutcome::MissingDependency => {
            println!("Final IK is not installed; nothing changed.");
        }
        EnsureOutcome::Installed(report) => display_install_report(report),
    }
}

/// Print the files written by an install or refresh
pub fn display_install_report(report: &InstallReport) {
    if report.removed > 0 {
        println!(
            "{} {} previously installed file(s)",
            Style::new().bold().apply_to("Removed"),
            report.removed
        );
    }

    println!(
        "{} {} file(s):",
        Style::new().bold().green().apply_to("Installed"),
        report.copied.len()
    );
    for path in &report.copied {
        println!("  {}", path.display());
    }

    if report.patched {
        println!(
            "{}",
            Style::new()
                .cyan()
                .apply_to("Full Final IK detected: enabled the Final IK code path")
        );
    }
}

fn display_presence(presence: &PresenceFlags) {
    println!("{}", Style::new().bold().apply_to("Detected:"));
    println!("  DeskyMode scripts:  {}", yes_no(presence.scripts_installed));
    println!("  Final IK (any):     {}", yes_no(presence.any_dependency()));
    println!(
        "  Final IK (full):    {}",
        yes_no(presence.full_dependency_present)
    );
}

/// Print a status report
pub fn display_status(report: &StatusReport) {
    display_presence(&report.presence);
    println!();
    println!(
        "{} {}",
        Style::new().bold().apply_to("Install directory:"),
        report.install_dir.display()
    );

    for file in &report.files {
        let style = match file.state {
            FileState::Current | FileState::Patched => Style::new().green(),
            FileState::Modified => Style::new().yellow(),
            FileState::Missing => Style::new().red(),
        };
        let meta = match file.meta_present {
            Some(false) => Style::new().red().apply_to(" (meta missing)").to_string(),
            _ => String::new(),
        };
        println!(
            "  {:<10} {}{}",
            style.apply_to(file.state.label()),
            file.path.display(),
            meta
        );
    }

    if !report.all_present() {
        println!();
        println!(
            "Run {} to install the missing files.",
            Style::new().cyan().apply_to("deskymode refresh")
        );
    }
}
