//! Post-render pruning of optional file groups.
//!
//! Every optional file is rendered unconditionally; afterwards each
//! [`FileGroup`] whose predicate is false for the resolved context is
//! deleted. Deciding what to delete ([`plan_removals`], [`prune_paths`]) is
//! pure; [`materialize`] applies the decision to a project directory and
//! treats already-absent paths as done, so running it again is a no-op.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{CiTool, License};
use crate::context::ResolvedContext;
use crate::error::{DagcutterError, Result};

/// A set of generated paths gated by one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileGroup {
    /// Contributor list and license text, dropped for closed-source projects.
    LicenseMetadata,
    /// GPL copying notice, kept only for GPLv3.
    CopyleftLicense,
    GitlabCi,
    /// The whole `.github/` tree.
    GithubWorkflows,
}

impl FileGroup {
    pub const ALL: [FileGroup; 4] = [
        FileGroup::LicenseMetadata,
        FileGroup::CopyleftLicense,
        FileGroup::GitlabCi,
        FileGroup::GithubWorkflows,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FileGroup::LicenseMetadata => "license metadata",
            FileGroup::CopyleftLicense => "copyleft license",
            FileGroup::GitlabCi => "gitlab ci",
            FileGroup::GithubWorkflows => "github workflows",
        }
    }

    /// Paths relative to the project root.
    pub fn paths(self) -> &'static [&'static str] {
        match self {
            FileGroup::LicenseMetadata => &["CONTRIBUTORS.txt", "LICENSE"],
            FileGroup::CopyleftLicense => &["COPYING"],
            FileGroup::GitlabCi => &[".gitlab-ci.yml"],
            FileGroup::GithubWorkflows => &[".github"],
        }
    }

    /// Whether the group's paths are directories removed with their contents.
    pub fn is_recursive(self) -> bool {
        matches!(self, FileGroup::GithubWorkflows)
    }

    pub fn is_kept(self, ctx: &ResolvedContext) -> bool {
        match self {
            FileGroup::LicenseMetadata => ctx.open_source_license.is_open_source(),
            FileGroup::CopyleftLicense => ctx.open_source_license == License::GplV3,
            FileGroup::GitlabCi => ctx.ci_tool == CiTool::Gitlab,
            FileGroup::GithubWorkflows => ctx.ci_tool == CiTool::Github,
        }
    }
}

impl fmt::Display for FileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One path scheduled for deletion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Removal {
    pub group: FileGroup,
    /// Relative to the project root.
    pub path: PathBuf,
    pub recursive: bool,
}

impl Removal {
    /// Whether `candidate` (relative to the project root) goes away with this removal.
    pub fn covers(&self, candidate: &Path) -> bool {
        if self.recursive {
            candidate.starts_with(&self.path)
        } else {
            candidate == self.path
        }
    }
}

/// Every path to delete for this context, grouped in [`FileGroup::ALL`] order.
pub fn plan_removals(ctx: &ResolvedContext) -> Vec<Removal> {
    FileGroup::ALL
        .into_iter()
        .filter(|group| !group.is_kept(ctx))
        .flat_map(|group| {
            group.paths().iter().map(move |p| Removal {
                group,
                path: PathBuf::from(p),
                recursive: group.is_recursive(),
            })
        })
        .collect()
}

/// The subset of `candidates` (project-relative) that the plan deletes.
pub fn prune_paths<'a, I>(ctx: &ResolvedContext, candidates: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let removals = plan_removals(ctx);
    candidates
        .into_iter()
        .filter(|c| removals.iter().any(|r| r.covers(c)))
        .map(Path::to_path_buf)
        .collect()
}

/// Check that rendering produced every path a file group owns.
///
/// Runs before any deletion so a corrupt render aborts with nothing removed.
pub fn verify_rendered(project_dir: &Path) -> Result<()> {
    for group in FileGroup::ALL {
        for rel in group.paths() {
            let path = project_dir.join(rel);
            if !path.exists() {
                return Err(DagcutterError::MissingPath { path });
            }
        }
    }
    Ok(())
}

/// Delete the file groups this context does not select.
///
/// Returns the project-relative paths actually removed.
pub fn materialize(ctx: &ResolvedContext, project_dir: &Path) -> Result<Vec<PathBuf>> {
    apply_removals(project_dir, &plan_removals(ctx))
}

pub fn apply_removals(project_dir: &Path, removals: &[Removal]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for removal in removals {
        let target = project_dir.join(&removal.path);
        let metadata = match std::fs::symlink_metadata(&target) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %removal.path.display(), "already absent");
                continue;
            }
            Err(e) => {
                return Err(DagcutterError::Io {
                    context: format!("inspecting {}", target.display()),
                    source: e,
                })
            }
        };

        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(&target)
        } else {
            std::fs::remove_file(&target)
        };
        result.map_err(|e| DagcutterError::Io {
            context: format!("removing {}", target.display()),
            source: e,
        })?;

        tracing::debug!(group = %removal.group, path = %removal.path.display(), "removed");
        removed.push(removal.path.clone());
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{resolve, RawContext};
    use rstest::rstest;
    use std::fs;

    fn context(license: &str, ci: &str) -> ResolvedContext {
        let raw: RawContext = [("open_source_license", license), ("ci_tool", ci)]
            .into_iter()
            .collect();
        resolve(&raw).unwrap()
    }

    fn planned(ctx: &ResolvedContext) -> Vec<String> {
        let mut paths: Vec<_> = plan_removals(ctx)
            .iter()
            .map(|r| r.path.to_string_lossy().into_owned())
            .collect();
        paths.sort_unstable();
        paths
    }

    fn scaffold_tree(dir: &Path) {
        for file in ["CONTRIBUTORS.txt", "LICENSE", "COPYING", ".gitlab-ci.yml", "README.md"] {
            fs::write(dir.join(file), "x").unwrap();
        }
        fs::create_dir_all(dir.join(".github/workflows")).unwrap();
        fs::write(dir.join(".github/workflows/ci.yml"), "name: ci").unwrap();
    }

    #[rstest]
    #[case("MIT", "Github", vec![".gitlab-ci.yml", "COPYING"])]
    #[case("GPLv3", "Gitlab", vec![".github"])]
    #[case("Not open source", "None", vec![".github", ".gitlab-ci.yml", "CONTRIBUTORS.txt", "COPYING", "LICENSE"])]
    #[case("BSD", "Gitlab", vec![".github", "COPYING"])]
    fn test_plan_removals(
        #[case] license: &str,
        #[case] ci: &str,
        #[case] expected: Vec<&'static str>,
    ) {
        assert_eq!(planned(&context(license, ci)), expected);
    }

    #[test]
    fn test_license_and_ci_rules_are_independent() {
        for license in License::ALL {
            for ci in CiTool::ALL {
                let ctx = context(license.as_str(), ci.as_str());
                let removals = plan_removals(&ctx);
                let removed = |p: &str| removals.iter().any(|r| r.path == Path::new(p));

                assert_eq!(removed("LICENSE"), license == License::NotOpenSource);
                assert_eq!(removed("CONTRIBUTORS.txt"), license == License::NotOpenSource);
                assert_eq!(removed("COPYING"), license != License::GplV3);
                assert_eq!(removed(".gitlab-ci.yml"), ci != CiTool::Gitlab);
                assert_eq!(removed(".github"), ci != CiTool::Github);
            }
        }
    }

    #[test]
    fn test_prune_paths_covers_directory_contents() {
        let ctx = context("GPLv3", "Gitlab");
        let candidates = [
            Path::new("README.md"),
            Path::new("COPYING"),
            Path::new(".github/workflows/ci.yml"),
            Path::new(".gitlab-ci.yml"),
        ];
        let pruned = prune_paths(&ctx, candidates);
        assert_eq!(
            pruned.into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from(".github/workflows/ci.yml")]
        );
    }

    #[test]
    fn test_materialize_removes_unselected_groups() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_tree(dir.path());

        let removed = materialize(&context("MIT", "Github"), dir.path()).unwrap();

        assert_eq!(
            removed,
            vec![PathBuf::from("COPYING"), PathBuf::from(".gitlab-ci.yml")]
        );
        assert!(dir.path().join("LICENSE").exists());
        assert!(dir.path().join("CONTRIBUTORS.txt").exists());
        assert!(dir.path().join(".github/workflows/ci.yml").exists());
        assert!(!dir.path().join("COPYING").exists());
        assert!(!dir.path().join(".gitlab-ci.yml").exists());
    }

    #[test]
    fn test_materialize_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_tree(dir.path());
        let ctx = context("Not open source", "None");

        let first = materialize(&ctx, dir.path()).unwrap();
        assert_eq!(first.len(), 5);
        let second = materialize(&ctx, dir.path()).unwrap();
        assert!(second.is_empty());

        assert!(dir.path().join("README.md").exists());
        assert!(!dir.path().join(".github").exists());
    }

    #[test]
    fn test_verify_rendered_reports_first_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_tree(dir.path());
        assert!(verify_rendered(dir.path()).is_ok());

        fs::remove_file(dir.path().join("COPYING")).unwrap();
        match verify_rendered(dir.path()) {
            Err(DagcutterError::MissingPath { path }) => {
                assert_eq!(path, dir.path().join("COPYING"))
            }
            other => panic!("expected MissingPath, got {other:?}"),
        }
    }
}
