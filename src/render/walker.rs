use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::config::ResolvedTemplate;
use crate::error::{DagcutterError, Result};

pub struct GeneratedProject {
    pub output_dir: PathBuf,
    pub files_created: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
}

/// A file that would be created during generation.
pub struct PlannedFile {
    /// Path relative to the output directory.
    pub relative_path: PathBuf,
    /// The file content (rendered template or copied bytes).
    pub content: Vec<u8>,
    /// Whether this file was copied verbatim (true) or rendered from a template (false).
    pub is_copy: bool,
}

/// The result of planning a generation without writing to disk.
pub struct GenerationPlan {
    pub files: Vec<PlannedFile>,
}

/// Walk the template directory and collect rendered/copied files into memory without writing.
///
/// Files ending in the templates suffix are rendered through Tera (suffix
/// stripped); everything else is copied byte for byte. Path components are
/// always rendered.
pub fn plan_render(resolved: &ResolvedTemplate, context: &Context) -> Result<GenerationPlan> {
    let content_dir = &resolved.content_dir;
    if !content_dir.exists() {
        return Err(DagcutterError::TemplateDirectoryMissing {
            path: content_dir.clone(),
        });
    }

    let config = &resolved.config;
    let suffix = &config.template.templates_suffix;
    let exclude_set = build_glob_set(&config.files.exclude)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(content_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            continue;
        }

        let src_path = entry.path();
        let rel_path = src_path
            .strip_prefix(content_dir)
            .expect("entry must be under content_dir");
        let rel_str = rel_path.to_string_lossy();

        if exclude_set.is_match(rel_str.as_ref()) {
            tracing::trace!(path = %rel_str, "excluded");
            continue;
        }

        let rendered_rel = render_relative_path(rel_path, context, suffix)?;

        let bytes = std::fs::read(src_path).map_err(|e| DagcutterError::Io {
            context: format!("reading {}", src_path.display()),
            source: e,
        })?;

        let is_template = suffix.is_empty() || rel_str.ends_with(suffix.as_str());
        if !is_template || looks_binary(&bytes) {
            if is_template {
                tracing::warn!(path = %rel_str, "binary file carries the templates suffix; copied verbatim");
            }
            files.push(PlannedFile {
                relative_path: rendered_rel,
                content: bytes,
                is_copy: true,
            });
            continue;
        }

        let content = String::from_utf8(bytes).map_err(|e| DagcutterError::Io {
            context: format!("decoding {}", src_path.display()),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let mut tera = Tera::default();
        let template_name = rel_str.to_string();
        let rendered = tera
            .add_raw_template(&template_name, &content)
            .and_then(|_| tera.render(&template_name, context))
            .map_err(|e| DagcutterError::RenderError {
                file: template_name.clone(),
                source: e,
            })?;

        files.push(PlannedFile {
            relative_path: rendered_rel,
            content: rendered.into_bytes(),
            is_copy: false,
        });
    }

    Ok(GenerationPlan { files })
}

/// Write the files from a generation plan to disk.
pub fn execute_plan(plan: &GenerationPlan, output_dir: &Path) -> Result<GeneratedProject> {
    let mut files_created = Vec::new();
    let mut files_copied = Vec::new();

    for file in &plan.files {
        let dest_path = output_dir.join(&file.relative_path);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DagcutterError::Io {
                context: format!("creating directory {}", parent.display()),
                source: e,
            })?;
        }
        std::fs::write(&dest_path, &file.content).map_err(|e| DagcutterError::Io {
            context: format!("writing {}", dest_path.display()),
            source: e,
        })?;
        if file.is_copy {
            files_copied.push(file.relative_path.clone());
        } else {
            files_created.push(file.relative_path.clone());
        }
    }

    Ok(GeneratedProject {
        output_dir: output_dir.to_path_buf(),
        files_created,
        files_copied,
    })
}

/// Render `{{ }}` expressions in a template-relative path and drop the
/// templates suffix from the file name.
fn render_relative_path(rel_path: &Path, context: &Context, suffix: &str) -> Result<PathBuf> {
    let raw = rel_path.to_string_lossy();
    let mut rendered = if raw.contains("{{") || raw.contains("{%") {
        Tera::one_off(&raw, context, false).map_err(|e| DagcutterError::FilenameRenderError {
            filename: raw.to_string(),
            source: e,
        })?
    } else {
        raw.into_owned()
    };

    if !suffix.is_empty() && rendered.ends_with(suffix) {
        rendered.truncate(rendered.len() - suffix.len());
    }
    Ok(PathBuf::from(rendered))
}

/// Images, archives and compiled files are never fed to Tera.
pub(crate) fn looks_binary(bytes: &[u8]) -> bool {
    content_inspector::inspect(bytes).is_binary()
}

pub(crate) fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| DagcutterError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| DagcutterError::GlobPattern {
        pattern: "<combined>".into(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AnswersConfig, FilesConfig, TemplateConfig, TemplateMetadata};
    use rstest::rstest;
    use std::fs;

    fn template_in(dir: &Path, exclude: &[&str]) -> ResolvedTemplate {
        ResolvedTemplate {
            config: TemplateConfig {
                template: TemplateMetadata {
                    name: "walker-test".to_string(),
                    version: None,
                    description: None,
                    templates_suffix: ".tera".to_string(),
                },
                variables: Default::default(),
                files: FilesConfig {
                    exclude: exclude.iter().map(|s| s.to_string()).collect(),
                },
                answers: AnswersConfig::default(),
            },
            content_dir: dir.to_path_buf(),
        }
    }

    fn context() -> Context {
        let mut context = Context::new();
        context.insert("project_slug", "etl");
        context.insert("project_name", "ETL");
        context
    }

    #[test]
    fn test_plan_render_renders_and_copies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("{{project_slug}}");
        fs::create_dir_all(root.join("dags")).unwrap();
        fs::write(root.join("README.md.tera"), "# {{ project_name }}").unwrap();
        fs::write(root.join("dags/job.py"), "x = '{{ not rendered }}'").unwrap();

        let plan = plan_render(&template_in(dir.path(), &[]), &context()).unwrap();
        assert_eq!(plan.files.len(), 2);

        let readme = &plan.files[0];
        assert_eq!(readme.relative_path, PathBuf::from("etl/README.md"));
        assert_eq!(readme.content, b"# ETL");
        assert!(!readme.is_copy);

        let dag = &plan.files[1];
        assert_eq!(dag.relative_path, PathBuf::from("etl/dags/job.py"));
        assert_eq!(dag.content, b"x = '{{ not rendered }}'");
        assert!(dag.is_copy);
    }

    #[test]
    fn test_plan_render_honours_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("{{project_slug}}");
        fs::create_dir_all(root.join("__pycache__")).unwrap();
        fs::write(root.join("__pycache__/x.pyc"), "junk").unwrap();
        fs::write(root.join("keep.txt"), "kept").unwrap();

        let plan = plan_render(&template_in(dir.path(), &["**/__pycache__/**"]), &context())
            .unwrap();
        let paths: Vec<_> = plan.files.iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("etl/keep.txt")]);
    }

    #[test]
    fn test_plan_render_reports_bad_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.md.tera"), "{% if %}").unwrap();

        let result = plan_render(&template_in(dir.path(), &[]), &context());
        assert!(matches!(result, Err(DagcutterError::RenderError { .. })));
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = plan_render(&template_in(&dir.path().join("nope"), &[]), &context());
        assert!(matches!(
            result,
            Err(DagcutterError::TemplateDirectoryMissing { .. })
        ));
    }

    #[test]
    fn test_plan_render_copies_binary_templates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("{{project_slug}}/docs");
        fs::create_dir_all(&root).unwrap();
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, b'{', b'{'];
        fs::write(root.join("logo.png.tera"), png).unwrap();

        let plan = plan_render(&template_in(dir.path(), &[]), &context()).unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].relative_path, PathBuf::from("etl/docs/logo.png"));
        assert_eq!(plan.files[0].content, png);
        assert!(plan.files[0].is_copy);
    }

    #[test]
    fn test_path_expressions_are_rendered() {
        let rendered = render_relative_path(
            Path::new("{{project_slug}}/sql/{{ project_slug }}_init.sql.tera"),
            &context(),
            ".tera",
        )
        .unwrap();
        assert_eq!(rendered, PathBuf::from("etl/sql/etl_init.sql"));
    }

    #[test]
    fn test_path_with_unknown_variable_fails() {
        let result = render_relative_path(Path::new("{{ team }}/README.md"), &context(), ".tera");
        assert!(matches!(
            result,
            Err(DagcutterError::FilenameRenderError { .. })
        ));
    }

    #[rstest]
    #[case(b"FROM python:3.12-slim\n".as_slice(), false)]
    #[case(b"".as_slice(), false)]
    #[case(b"\x00\x01\x02binary".as_slice(), true)]
    fn test_looks_binary(#[case] bytes: &[u8], #[case] expected: bool) {
        assert_eq!(looks_binary(bytes), expected);
    }

    #[test]
    fn test_execute_plan_writes_files() {
        let plan = GenerationPlan {
            files: vec![PlannedFile {
                relative_path: PathBuf::from("etl/nested/file.txt"),
                content: b"hello".to_vec(),
                is_copy: false,
            }],
        };
        let out = tempfile::tempdir().unwrap();
        let result = execute_plan(&plan, out.path()).unwrap();
        assert_eq!(result.files_created.len(), 1);
        assert_eq!(
            fs::read_to_string(out.path().join("etl/nested/file.txt")).unwrap(),
            "hello"
        );
    }
}
