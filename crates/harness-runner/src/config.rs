use std::path::PathBuf;

pub const DEFAULT_JAVA: &str = "java";
pub const DEFAULT_HARNESS_JAR: &str = "dist/mmtk-harness.jar";
pub const DEFAULT_SCRIPTS_DIR: &str = "MMTk/harness/test-scripts";
pub const SCRIPT_EXTENSION: &str = "script";
pub const DEFAULT_BUILDIT: &str = "./bin/buildit";
pub const BUILD_HOST: &str = "localhost";

/// Locations of the external collaborators. All paths are used as given,
/// relative ones resolve against the working directory of the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub java: String,
    pub harness_jar: String,
    pub scripts_dir: PathBuf,
    pub script_extension: String,
    pub buildit: String,
    pub host: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            java: DEFAULT_JAVA.to_string(),
            harness_jar: DEFAULT_HARNESS_JAR.to_string(),
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
            script_extension: SCRIPT_EXTENSION.to_string(),
            buildit: DEFAULT_BUILDIT.to_string(),
            host: BUILD_HOST.to_string(),
        }
    }
}

impl LauncherConfig {
    /// `<scripts_dir>/<name>.<ext>`, always joined with `/` so the forwarded
    /// argument is identical across platforms.
    pub fn script_path(&self, name: &str) -> String {
        let dir = self.scripts_dir.to_string_lossy();
        let dir = dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}.{}", name, self.script_extension)
        } else {
            format!("{}/{}.{}", dir, name, self.script_extension)
        }
    }
}
