//! Turns a [`RawConfig`] into a [`JobSpec`], or into every reason it can't be.

use crate::error::{ConfigError, ConfigResult, ValidationIssue};
use crate::types::{ImageTarget, JobSpec, RawConfig};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

impl RawConfig {
    /// Check every rule and build the job.
    ///
    /// All rules are evaluated; the returned `ConfigError::Invalid` carries
    /// one issue per violation, in rule order (tool, output, images).
    pub fn validate(self) -> ConfigResult<JobSpec> {
        let mut issues = Vec::new();

        if let Some(issue) = check_tool(&self.tool_path) {
            issues.push(issue);
        }

        if self.output_dir.as_os_str().is_empty() {
            issues.push(ValidationIssue::OutputPathEmpty);
        }

        for image in &self.images {
            if std::fs::metadata(&image.path).is_err() {
                issues.push(ValidationIssue::ImageMissing(image.path.clone()));
            }
        }

        if !issues.is_empty() {
            return Err(ConfigError::Invalid(issues));
        }

        for name in shared_base_names(&self.images) {
            warn!(
                "Several images are named '{}'; they share output files, so later ones will be treated as already run",
                name
            );
        }

        Ok(JobSpec {
            tool_path: launchable_path(self.tool_path),
            output_dir: self.output_dir,
            use_summary_dir: self.use_summary_dir,
            images: self.images,
            plugins: self.plugins,
        })
    }
}

fn check_tool(path: &Path) -> Option<ValidationIssue> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Some(ValidationIssue::ToolMissing(path.to_path_buf())),
    };

    if !meta.is_file() || !is_executable(&meta) {
        return Some(ValidationIssue::ToolNotExecutable(path.to_path_buf()));
    }
    None
}

/// A bare file name is looked up on `PATH` by the process launcher, so pin
/// it to the directory it was checked in.
fn launchable_path(path: PathBuf) -> PathBuf {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Path::new(".").join(path),
        _ => path,
    }
}

/// Base names used by more than one image, in first-seen order.
fn shared_base_names(images: &[ImageTarget]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::new();
    for image in images {
        let name = image.base_name();
        let count = counts.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(name);
        }
    }
    order
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PluginSpec;
    use tempfile::TempDir;

    /// Helper: a temp dir holding an executable tool and one image.
    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("vol");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let image = dir.path().join("mem.raw");
        std::fs::write(&image, b"\x00\x01").unwrap();
        (dir, tool, image)
    }

    fn raw(tool: PathBuf, output: &str, images: Vec<ImageTarget>) -> RawConfig {
        RawConfig {
            tool_path: tool,
            output_dir: PathBuf::from(output),
            use_summary_dir: false,
            plugins: vec![PluginSpec::new("pslist", true)],
            images,
        }
    }

    #[test]
    fn test_valid_config() {
        let (_dir, tool, image) = fixture();
        let spec = raw(tool.clone(), "/out", vec![ImageTarget::new(&image, "Win10x64")])
            .validate()
            .unwrap();
        assert_eq!(spec.tool_path(), tool.as_path());
        assert_eq!(spec.images().len(), 1);
        assert_eq!(spec.plugins()[0].name, "pslist");
    }

    #[test]
    fn test_missing_tool() {
        let (dir, _tool, image) = fixture();
        let missing = dir.path().join("no-such-vol");
        let err = raw(missing.clone(), "/out", vec![ImageTarget::new(&image, "p")])
            .validate()
            .unwrap_err();
        assert_eq!(err.issues(), [ValidationIssue::ToolMissing(missing)]);
    }

    #[test]
    fn test_tool_is_directory() {
        let (dir, _tool, image) = fixture();
        let err = raw(dir.path().to_path_buf(), "/out", vec![ImageTarget::new(&image, "p")])
            .validate()
            .unwrap_err();
        assert!(matches!(err.issues(), [ValidationIssue::ToolNotExecutable(_)]));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_without_exec_bit() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, _tool, image) = fixture();
        let plain = dir.path().join("plain");
        std::fs::write(&plain, "not a program").unwrap();
        std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).unwrap();
        let err = raw(plain.clone(), "/out", vec![ImageTarget::new(&image, "p")])
            .validate()
            .unwrap_err();
        assert_eq!(err.issues(), [ValidationIssue::ToolNotExecutable(plain)]);
    }

    #[test]
    fn test_empty_output_path() {
        let (_dir, tool, image) = fixture();
        let err = raw(tool, "", vec![ImageTarget::new(&image, "p")])
            .validate()
            .unwrap_err();
        assert_eq!(err.issues(), [ValidationIssue::OutputPathEmpty]);
    }

    #[test]
    fn test_all_issues_reported_together() {
        let (dir, _tool, image) = fixture();
        let missing_tool = dir.path().join("gone");
        let missing_a = dir.path().join("a.raw");
        let missing_b = dir.path().join("b.raw");
        let err = raw(
            missing_tool.clone(),
            "",
            vec![
                ImageTarget::new(&missing_a, "p"),
                ImageTarget::new(&image, "p"),
                ImageTarget::new(&missing_b, "p"),
            ],
        )
        .validate()
        .unwrap_err();

        assert_eq!(
            err.issues(),
            [
                ValidationIssue::ToolMissing(missing_tool),
                ValidationIssue::OutputPathEmpty,
                ValidationIssue::ImageMissing(missing_a),
                ValidationIssue::ImageMissing(missing_b),
            ]
        );
    }

    #[test]
    fn test_bare_tool_name_pinned_to_current_dir() {
        assert_eq!(launchable_path(PathBuf::from("vol")), PathBuf::from("./vol"));
        assert_eq!(launchable_path(PathBuf::from("vol.py")), PathBuf::from("./vol.py"));
        assert_eq!(launchable_path(PathBuf::from("bin/vol")), PathBuf::from("bin/vol"));
        assert_eq!(launchable_path(PathBuf::from("./vol")), PathBuf::from("./vol"));
        assert_eq!(
            launchable_path(PathBuf::from("/opt/vol/vol.py")),
            PathBuf::from("/opt/vol/vol.py")
        );
    }

    #[test]
    fn test_shared_base_names() {
        let images = vec![
            ImageTarget::new("/a/mem.raw", "p"),
            ImageTarget::new("/b/other.raw", "p"),
            ImageTarget::new("/b/mem.raw", "p"),
            ImageTarget::new("/c/mem.raw", "p"),
        ];
        assert_eq!(shared_base_names(&images), ["mem.raw"]);
        assert!(shared_base_names(&images[..2]).is_empty());
    }

    #[test]
    fn test_shared_base_names_still_valid() {
        let (dir, tool, image) = fixture();
        let other = dir.path().join("copy");
        std::fs::create_dir(&other).unwrap();
        let twin = other.join("mem.raw");
        std::fs::write(&twin, b"\x00").unwrap();

        let spec = raw(
            tool,
            "/out",
            vec![ImageTarget::new(&image, "p"), ImageTarget::new(&twin, "p")],
        )
        .validate()
        .unwrap();
        assert_eq!(spec.images().len(), 2);
    }

    #[test]
    fn test_no_images_is_valid() {
        let (_dir, tool, _image) = fixture();
        let spec = raw(tool, "/out", Vec::new()).validate().unwrap();
        assert!(spec.images().is_empty());
    }
}
