//! Common test utilities for DeskyMode integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub const PACKAGE_DIR: &str = "Packages/ksmg.vrcft.deskymode";
pub const INSTALL_DIR: &str = "Assets/Gimmicks/DeskyMode";

pub const SETUP_SOURCE: &str = "namespace DeskyMode\n{\n    public class DeskyModeSetup\n    {\n    }\n}\n";
pub const EDITOR_SOURCE: &str =
    "namespace DeskyMode\n{\n    public class DeskyModeEditor : UnityEditor.Editor\n    {\n    }\n}\n";

pub const STUB_MARKER: &str = "RootMotion.FinalIK.AimIK";
pub const FULL_MARKER: &str = "RootMotion.FinalIK.IKInspector";
pub const SCRIPTS_MARKER: &str = "DeskyMode.DeskyModeSetup";

/// A fake Unity project in a temporary directory
pub struct TestProject {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Empty project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("Assets")).expect("Failed to create Assets");
        Self { temp, path }
    }

    /// Project with the DeskyMode package and its staged scripts
    pub fn with_package() -> Self {
        let project = Self::new();
        project.write_file(
            &format!("{PACKAGE_DIR}/Editor/DeskyModeSetup.cs.no"),
            SETUP_SOURCE,
        );
        project.write_file(
            &format!("{PACKAGE_DIR}/Editor/DeskyModeSetup.cs.meta.no"),
            "guid: 1111\n",
        );
        project.write_file(
            &format!("{PACKAGE_DIR}/Editor/DeskyModeEditor.cs.no"),
            EDITOR_SOURCE,
        );
        project.write_file(
            &format!("{PACKAGE_DIR}/Editor/DeskyModeEditor.cs.meta.no"),
            "guid: 2222\n",
        );
        project
    }

    /// Add a Final IK stub declaring only the stub marker
    pub fn add_final_ik_stub(&self) {
        self.write_file(
            "Packages/com.vrlabs.final-ik-stub/Runtime/AimIK.cs",
            "namespace RootMotion.FinalIK\n{\n    public class AimIK { }\n}\n",
        );
    }

    /// Add the full Final IK package
    pub fn add_full_final_ik(&self) {
        self.write_file(
            "Assets/Plugins/RootMotion/FinalIK/IK Components/AimIK.cs",
            "namespace RootMotion.FinalIK {\n    public class AimIK : IK { }\n}\n",
        );
        self.write_file(
            "Assets/Plugins/RootMotion/Editor/FinalIK/IKInspector.cs",
            "namespace RootMotion.FinalIK {\n    public class IKInspector : Editor { }\n}\n",
        );
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Path of an installed file, relative to the project root
    pub fn installed(&self, name: &str) -> String {
        format!("{INSTALL_DIR}/Editor/{name}")
    }

    /// The binary, pointed at this project and never prompting
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("deskymode").expect("Failed to find deskymode binary");
        cmd.env_remove("DESKYMODE_PROJECT");
        cmd.env_remove("RUST_LOG");
        cmd.arg("--project").arg(&self.path).arg("--no-input");
        cmd
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
