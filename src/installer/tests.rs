//! Installer tests
//!
//! Each test lays out a small Unity project in a temp dir with the staged
//! DeskyMode package and drives the installer with canned probes.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use super::*;
use crate::config::DeskyConfig;
use crate::error::DeskyError;
use crate::probe::StaticProbe;
use crate::refresh::CountingRefresher;
use crate::ui::RecordingDialog;

const SETUP_SOURCE: &str = "using UnityEngine;\n\nnamespace DeskyMode\n{\n    public class DeskyModeSetup { }\n}\n";
const EDITOR_SOURCE: &str = "namespace DeskyMode\n{\n    public class DeskyModeEditor { }\n}\n";

const SCRIPTS: &str = "DeskyMode.DeskyModeSetup";
const STUB: &str = "RootMotion.FinalIK.AimIK";
const FULL: &str = "RootMotion.FinalIK.IKInspector";

struct Project {
    temp: TempDir,
    config: DeskyConfig,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let package = temp.path().join("Packages/ksmg.vrcft.deskymode/Editor");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::create_dir_all(temp.path().join("Assets")).unwrap();
        std::fs::write(package.join("DeskyModeSetup.cs.no"), SETUP_SOURCE).unwrap();
        std::fs::write(package.join("DeskyModeSetup.cs.meta.no"), "guid: setup\n").unwrap();
        std::fs::write(package.join("DeskyModeEditor.cs.no"), EDITOR_SOURCE).unwrap();
        std::fs::write(package.join("DeskyModeEditor.cs.meta.no"), "guid: editor\n").unwrap();

        Self {
            temp,
            config: DeskyConfig::default(),
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn installed(&self, relative: &str) -> PathBuf {
        self.root().join("Assets/Gimmicks/DeskyMode").join(relative)
    }

    fn read_installed(&self, relative: &str) -> String {
        std::fs::read_to_string(self.installed(relative)).unwrap()
    }

    fn place_installed(&self, relative: &str, content: &str) {
        let path = self.installed(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Every file under the project with its content
    fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = WalkDir::new(self.root())
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| (e.path().to_path_buf(), std::fs::read(e.path()).unwrap()))
            .collect();
        files.sort();
        files
    }

    fn run<T>(
        &self,
        probe: &StaticProbe,
        f: impl FnOnce(&Installer<'_>) -> T,
    ) -> (T, Vec<crate::ui::Dialog>, usize) {
        let dialogs = RecordingDialog::default();
        let refresher = CountingRefresher::default();
        let manifest = Manifest::resolve(&self.config, self.root()).unwrap();
        let installer = Installer::new(
            self.root(),
            &self.config,
            manifest,
            Hosts {
                probe,
                dialogs: &dialogs,
                refresher: &refresher,
            },
        );
        let result = f(&installer);
        (result, dialogs.shown(), refresher.count())
    }
}

#[test]
fn test_already_installed_is_noop() {
    let project = Project::new();
    project.place_installed("Editor/DeskyModeSetup.cs", SETUP_SOURCE);
    project.place_installed("Editor/DeskyModeEditor.cs", EDITOR_SOURCE);
    let before = project.snapshot();

    let probe = StaticProbe::new([SCRIPTS, STUB]);
    let (outcome, dialogs, refreshes) = project.run(&probe, |i| i.ensure_installed());

    assert_eq!(outcome.unwrap(), EnsureOutcome::AlreadyInstalled);
    assert!(dialogs.is_empty());
    assert_eq!(refreshes, 0);
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_one_installed_file_is_enough() {
    let project = Project::new();
    project.place_installed("Editor/DeskyModeEditor.cs", EDITOR_SOURCE);

    let probe = StaticProbe::new([SCRIPTS]);
    let (outcome, dialogs, _) = project.run(&probe, |i| i.ensure_installed());

    assert_eq!(outcome.unwrap(), EnsureOutcome::AlreadyInstalled);
    assert!(dialogs.is_empty());
}

#[test]
fn test_scripts_loaded_elsewhere_warns_once() {
    let project = Project::new();
    let before = project.snapshot();

    let probe = StaticProbe::new([SCRIPTS, STUB]);
    let (outcome, dialogs, refreshes) = project.run(&probe, |i| i.ensure_installed());

    assert_eq!(outcome.unwrap(), EnsureOutcome::UnexpectedLocation);
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, "DeskyMode in unexpected location");
    assert_eq!(dialogs[0].ok, "Cancel");
    assert_eq!(refreshes, 0);
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_missing_dependency_warns_once() {
    let project = Project::new();
    let before = project.snapshot();

    let probe = StaticProbe::default();
    let (outcome, dialogs, refreshes) = project.run(&probe, |i| i.ensure_installed());

    assert_eq!(outcome.unwrap(), EnsureOutcome::MissingDependency);
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, "Missing Final IK");
    assert_eq!(dialogs[0].message, "Please install Final IK or Final IK Stub");
    assert_eq!(refreshes, 0);
    assert_eq!(project.snapshot(), before);
    assert!(!project.installed("Editor").exists());
}

#[test]
fn test_stub_installs_without_patch() {
    let project = Project::new();

    let probe = StaticProbe::new([STUB]);
    let (outcome, dialogs, refreshes) = project.run(&probe, |i| i.ensure_installed());

    let EnsureOutcome::Installed(report) = outcome.unwrap() else {
        panic!("expected an install");
    };
    assert_eq!(
        report.copied,
        vec![
            PathBuf::from("Editor/DeskyModeSetup.cs"),
            PathBuf::from("Editor/DeskyModeEditor.cs"),
        ]
    );
    assert!(!report.patched);
    assert!(dialogs.is_empty());
    assert_eq!(refreshes, 1);

    assert_eq!(project.read_installed("Editor/DeskyModeSetup.cs"), SETUP_SOURCE);
    assert_eq!(project.read_installed("Editor/DeskyModeEditor.cs"), EDITOR_SOURCE);
    assert_eq!(
        project.read_installed("Editor/DeskyModeSetup.cs.meta"),
        "guid: setup\n"
    );
    assert_eq!(
        project.read_installed("Editor/DeskyModeEditor.cs.meta"),
        "guid: editor\n"
    );
}

#[test]
fn test_full_final_ik_patches_primary() {
    let project = Project::new();

    let probe = StaticProbe::new([STUB, FULL]);
    let (outcome, _, _) = project.run(&probe, |i| i.ensure_installed());

    let EnsureOutcome::Installed(report) = outcome.unwrap() else {
        panic!("expected an install");
    };
    assert!(report.patched);

    let setup = project.read_installed("Editor/DeskyModeSetup.cs");
    let mut lines = setup.lines();
    assert_eq!(lines.next(), Some("#define ActualFinalIK"));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(setup, format!("#define ActualFinalIK\n\n{SETUP_SOURCE}"));

    // only the primary file is patched
    assert_eq!(project.read_installed("Editor/DeskyModeEditor.cs"), EDITOR_SOURCE);
}

#[test]
fn test_full_variant_without_stub_marker_still_installs() {
    let project = Project::new();

    let probe = StaticProbe::new([FULL]);
    let (outcome, _, _) = project.run(&probe, |i| i.ensure_installed());

    assert!(matches!(outcome.unwrap(), EnsureOutcome::Installed(_)));
}

#[test]
fn test_force_refresh_never_stacks_directive() {
    let project = Project::new();
    let probe = StaticProbe::new([STUB, FULL]);

    let (first, _, _) = project.run(&probe, |i| i.force_refresh());
    assert_eq!(first.unwrap().removed, 0);

    let (second, _, refreshes) = project.run(&probe, |i| i.force_refresh());
    let report = second.unwrap();
    assert_eq!(report.removed, 2);
    assert!(report.patched);
    assert_eq!(refreshes, 1);

    assert_eq!(
        project.read_installed("Editor/DeskyModeSetup.cs"),
        format!("#define ActualFinalIK\n\n{SETUP_SOURCE}")
    );
}

#[test]
fn test_force_refresh_replaces_local_edits() {
    let project = Project::new();
    project.place_installed("Editor/DeskyModeSetup.cs", "// edited\n");
    project.place_installed("Editor/DeskyModeSetup.cs.meta", "guid: stale\n");

    let probe = StaticProbe::new([STUB]);
    let (result, dialogs, _) = project.run(&probe, |i| i.force_refresh());

    assert_eq!(result.unwrap().removed, 1);
    assert!(dialogs.is_empty());
    assert_eq!(project.read_installed("Editor/DeskyModeSetup.cs"), SETUP_SOURCE);
    assert_eq!(
        project.read_installed("Editor/DeskyModeSetup.cs.meta"),
        "guid: setup\n"
    );
}

#[test]
fn test_force_refresh_then_ensure_is_noop() {
    let project = Project::new();
    let mut probe = StaticProbe::new([STUB]);

    let (refreshed, _, _) = project.run(&probe, |i| i.force_refresh());
    refreshed.unwrap();

    // the editor now compiles the installed scripts
    probe.insert(SCRIPTS);
    let before = project.snapshot();
    let (outcome, dialogs, refreshes) = project.run(&probe, |i| i.ensure_installed());

    assert_eq!(outcome.unwrap(), EnsureOutcome::AlreadyInstalled);
    assert!(dialogs.is_empty());
    assert_eq!(refreshes, 0);
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_missing_source_fails_before_writing() {
    let project = Project::new();
    std::fs::remove_file(
        project
            .root()
            .join("Packages/ksmg.vrcft.deskymode/Editor/DeskyModeEditor.cs.no"),
    )
    .unwrap();
    let before = project.snapshot();

    let probe = StaticProbe::new([STUB]);
    let (outcome, _, refreshes) = project.run(&probe, |i| i.ensure_installed());

    assert!(matches!(
        outcome.unwrap_err(),
        DeskyError::FileNotFound { .. }
    ));
    assert_eq!(refreshes, 0);
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_missing_meta_fails_refresh_and_keeps_install() {
    let project = Project::new();
    let probe = StaticProbe::new([STUB]);
    let (installed, _, _) = project.run(&probe, |i| i.copy_files());
    installed.unwrap();
    let before = project.snapshot();

    std::fs::remove_file(
        project
            .root()
            .join("Packages/ksmg.vrcft.deskymode/Editor/DeskyModeEditor.cs.meta.no"),
    )
    .unwrap();
    let (result, _, _) = project.run(&probe, |i| i.force_refresh());

    assert!(result.is_err());
    let after: Vec<_> = project
        .snapshot()
        .into_iter()
        .filter(|(p, _)| p.starts_with(project.installed("")))
        .collect();
    let expected: Vec<_> = before
        .into_iter()
        .filter(|(p, _)| p.starts_with(project.installed("")))
        .collect();
    assert_eq!(after, expected);
}

#[test]
fn test_copy_without_meta_tracking() {
    let mut project = Project::new();
    project.config.copy_meta = false;

    let probe = StaticProbe::new([STUB]);
    let (report, _, _) = project.run(&probe, |i| i.copy_files());

    assert_eq!(report.unwrap().copied.len(), 2);
    assert!(!project.installed("Editor/DeskyModeSetup.cs.meta").exists());
}

#[test]
fn test_remove_files() {
    let project = Project::new();
    let probe = StaticProbe::new([STUB]);
    let (copied, _, _) = project.run(&probe, |i| i.copy_files());
    copied.unwrap();

    let (removed, _, _) = project.run(&probe, |i| i.remove_files());
    assert_eq!(removed.unwrap(), 2);
    assert!(!project.installed("Editor/DeskyModeSetup.cs").exists());
    assert!(!project.installed("Editor/DeskyModeSetup.cs.meta").exists());
    assert!(!project.installed("Editor/DeskyModeEditor.cs.meta").exists());

    let (again, _, _) = project.run(&probe, |i| i.remove_files());
    assert_eq!(again.unwrap(), 0);
}

#[test]
fn test_status_reports_file_states() {
    let project = Project::new();
    let probe = StaticProbe::new([STUB, FULL]);
    let (copied, _, _) = project.run(&probe, |i| i.copy_files());
    copied.unwrap();

    let (status, _, _) = project.run(&probe, |i| i.status());
    let status = status.unwrap();
    assert!(status.presence.full_dependency_present);
    assert!(status.all_present());
    assert_eq!(status.files[0].state, FileState::Patched);
    assert_eq!(status.files[1].state, FileState::Current);
    assert_eq!(status.files[1].meta_present, Some(true));

    project.place_installed("Editor/DeskyModeEditor.cs", "// local edit\n");
    std::fs::remove_file(project.installed("Editor/DeskyModeSetup.cs")).unwrap();

    let (status, _, _) = project.run(&probe, |i| i.status());
    let status = status.unwrap();
    assert_eq!(status.files[0].state, FileState::Missing);
    assert_eq!(status.files[1].state, FileState::Modified);
    assert!(!status.all_present());
}

#[test]
fn test_staged_glob_patches_setup_not_first_match() {
    let mut project = Project::new();
    project.config.staged = Some("Editor/*.no".to_string());

    let probe = StaticProbe::new([STUB, FULL]);
    let (outcome, _, _) = project.run(&probe, |i| i.ensure_installed());

    let EnsureOutcome::Installed(report) = outcome.unwrap() else {
        panic!("expected an install");
    };
    assert_eq!(report.copied.len(), 2);
    assert!(report.patched);

    // DeskyModeEditor.cs sorts first but Setup carries the directive
    assert_eq!(
        project.read_installed("Editor/DeskyModeSetup.cs"),
        format!("#define ActualFinalIK\n\n{SETUP_SOURCE}")
    );
    assert_eq!(project.read_installed("Editor/DeskyModeEditor.cs"), EDITOR_SOURCE);
    assert_eq!(
        project.read_installed("Editor/DeskyModeSetup.cs.meta"),
        "guid: setup\n"
    );
    assert!(!project.installed("Editor/DeskyModeSetup.cs.meta.meta").exists());
}

#[cfg(unix)]
#[test]
fn test_installed_files_keep_source_mode() {
    use std::os::unix::fs::PermissionsExt;

    let project = Project::new();
    let package = project.root().join("Packages/ksmg.vrcft.deskymode/Editor");
    for name in ["DeskyModeSetup.cs.no", "DeskyModeEditor.cs.no"] {
        std::fs::set_permissions(package.join(name), std::fs::Permissions::from_mode(0o644))
            .unwrap();
    }

    let probe = StaticProbe::new([STUB, FULL]);
    let (outcome, _, _) = project.run(&probe, |i| i.ensure_installed());
    assert!(matches!(outcome.unwrap(), EnsureOutcome::Installed(_)));

    for relative in ["Editor/DeskyModeSetup.cs", "Editor/DeskyModeEditor.cs"] {
        let mode = std::fs::metadata(project.installed(relative))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o644, "{relative}");
    }
}
