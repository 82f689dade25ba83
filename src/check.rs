use std::path::{Path, PathBuf};

use crate::config::resolve_template;
use crate::context::{resolve, RawContext};
use crate::error::Result;
use crate::materialize::FileGroup;
use crate::render::walker::looks_binary;
use crate::render::{build_context, plan_render};

/// Result of validating a template.
pub struct CheckResult {
    pub template_name: String,
    pub variable_count: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a template directory.
///
/// Parses the manifest, checks Tera syntax of every template file, then does
/// a dry render with the manifest defaults and confirms every optional file
/// group is produced, since pruning relies on those paths existing.
pub fn check_template(template_dir: &Path) -> Result<CheckResult> {
    let resolved = resolve_template(template_dir)?;
    let config = &resolved.config;

    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if config.template.version.is_none() {
        warnings.push("No 'version' specified in [template] section".to_string());
    }
    if config.template.description.is_none() {
        warnings.push("No 'description' specified in [template] section".to_string());
    }

    if !resolved.content_dir.exists() {
        errors.push(format!(
            "Template content directory not found: {}",
            resolved.content_dir.display()
        ));
        return Ok(CheckResult {
            template_name: config.template.name.clone(),
            variable_count: config.variables.len(),
            warnings,
            errors,
        });
    }

    let suffix = &config.template.templates_suffix;
    validate_tera_files(&resolved.content_dir, suffix, &mut warnings, &mut errors);

    let defaults: RawContext = config.defaults().into_iter().collect();
    match resolve(&defaults) {
        Ok(ctx) => {
            let context = build_context(&ctx.to_variables());
            match plan_render(&resolved, &context) {
                Ok(plan) => {
                    let root = PathBuf::from(&ctx.project_slug);
                    let planned: Vec<&Path> = plan
                        .files
                        .iter()
                        .filter_map(|f| f.relative_path.strip_prefix(&root).ok())
                        .collect();
                    for group in FileGroup::ALL {
                        for rel in group.paths() {
                            let produced = planned.iter().any(|p| {
                                if group.is_recursive() {
                                    p.starts_with(rel)
                                } else {
                                    *p == Path::new(rel)
                                }
                            });
                            if !produced {
                                errors.push(format!(
                                    "Template does not produce '{rel}' ({group}) under the project directory"
                                ));
                            }
                        }
                    }
                }
                Err(e) => errors.push(format!("Render with defaults failed: {e}")),
            }
        }
        Err(e) => errors.push(format!("Defaults do not resolve: {e}")),
    }

    Ok(CheckResult {
        template_name: config.template.name.clone(),
        variable_count: config.variables.len(),
        warnings,
        errors,
    })
}

fn validate_tera_files(
    dir: &Path,
    suffix: &str,
    warnings: &mut Vec<String>,
    errors: &mut Vec<String>,
) {
    let walker = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok());
    for entry in walker {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(dir).unwrap_or(path);

        if !suffix.is_empty() && !path.to_string_lossy().ends_with(suffix) {
            continue;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warnings.push(format!("Could not read {}: {e}", rel.display()));
                continue;
            }
        };

        if looks_binary(&bytes) {
            warnings.push(format!(
                "{} is binary but carries the '{suffix}' suffix; it will be copied verbatim",
                rel.display()
            ));
            continue;
        }

        match String::from_utf8(bytes) {
            Ok(content) => {
                let mut tera = tera::Tera::default();
                if let Err(e) = tera.add_raw_template(&rel.to_string_lossy(), &content) {
                    errors.push(format!("Tera syntax error in {}: {e}", rel.display()));
                }
            }
            Err(_) => errors.push(format!("{} is not valid UTF-8", rel.display())),
        }
    }
}
