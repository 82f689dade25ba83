pub mod answers;
pub mod check;
pub mod config;
pub mod context;
pub mod error;
pub mod materialize;
pub mod prompt;
pub mod render;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use console::style;

use crate::config::schema::TemplateConfig;
use crate::config::user::load_config_file;
use crate::config::{load_user_config, resolve_template, EnvSettings, TemplateDir};
use crate::context::{resolve, ResolvedContext};
use crate::error::{DagcutterError, Result};
use crate::materialize::{plan_removals, prune_paths, Removal};
use crate::prompt::{collect_answers, PromptOptions};
use crate::render::{build_context, execute_plan, plan_render, GeneratedProject, GenerationPlan};

pub struct GenerateOptions {
    /// Template directory (containing `dagcutter.toml`); the bundled template when `None`.
    pub template: Option<PathBuf>,
    /// Directory the project directory is created in.
    pub output_dir: PathBuf,
    /// Pre-supplied key=value answers.
    pub data: Vec<(String, String)>,
    /// Replaces the user config as the source of default answers.
    pub config_file: Option<PathBuf>,
    /// Answers file (or generated project) to take answers from.
    pub replay: Option<PathBuf>,
    /// Never prompt.
    pub no_input: bool,
    /// Generate into an existing, non-empty project directory.
    pub overwrite: bool,
}

/// Everything needed to execute a generation that has been planned but not yet written.
pub struct FullGenerationPlan {
    pub render_plan: GenerationPlan,
    pub output_dir: PathBuf,
    /// `output_dir/<project_slug>`.
    pub project_dir: PathBuf,
    pub config: TemplateConfig,
    pub context: ResolvedContext,
    /// Deletions applied once the plan has been written.
    pub removals: Vec<Removal>,
}

pub struct GenerationReport {
    pub project_dir: PathBuf,
    pub rendered: GeneratedProject,
    /// Project-relative paths pruned after rendering.
    pub removed: Vec<PathBuf>,
}

/// Plan a project generation: load the template, collect and resolve
/// answers, render in memory. Nothing is written.
pub fn plan_generation(options: GenerateOptions, env: &EnvSettings) -> Result<FullGenerationPlan> {
    let template_dir = TemplateDir::open(options.template.as_deref())?;
    let resolved = resolve_template(template_dir.path())?;

    let user_config = match &options.config_file {
        Some(path) => Some(load_config_file(path)?),
        None => load_user_config()?,
    };

    // Later sources win: replayed answers, then environment, then -d.
    let mut data_overrides: HashMap<String, String> = HashMap::new();
    if let Some(replay) = &options.replay {
        let saved = answers::load_answers(replay, &resolved.config.answers.file)?;
        warn_on_template_drift(&saved, &resolved.config);
        data_overrides.extend(saved.answers.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if !env.is_empty() {
        tracing::debug!(count = env.iter().count(), "applying environment answers");
        data_overrides.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    data_overrides.extend(options.data);

    let prompt_options = PromptOptions {
        default_context: user_config.map(|c| c.default_context).unwrap_or_default(),
        data_overrides,
        no_input: options.no_input,
    };
    let raw = collect_answers(&resolved.config, &prompt_options)?;
    let context = resolve(&raw)?;

    let project_dir = options.output_dir.join(&context.project_slug);
    if project_dir.exists() && !options.overwrite {
        let has_contents = std::fs::read_dir(&project_dir)
            .map(|mut d| d.next().is_some())
            .unwrap_or(false);
        if has_contents {
            return Err(DagcutterError::OutputExists { path: project_dir });
        }
    }

    let tera_context = build_context(&context.to_variables());
    let render_plan = plan_render(&resolved, &tera_context)?;
    let removals = plan_removals(&context);

    Ok(FullGenerationPlan {
        render_plan,
        output_dir: options.output_dir,
        project_dir,
        config: resolved.config,
        context,
        removals,
    })
}

fn warn_on_template_drift(saved: &answers::SavedAnswers, config: &TemplateConfig) {
    tracing::debug!(
        template = %saved.template,
        version = saved.template_version.as_deref().unwrap_or("-"),
        dagcutter_version = %saved.dagcutter_version,
        "replaying answers"
    );

    if !saved.template.is_empty() && saved.template != config.template.name {
        eprintln!(
            "{} answers were recorded for template '{}', replaying them into '{}'",
            style("warning:").yellow().bold(),
            saved.template,
            config.template.name
        );
    } else if saved.template_version.is_some()
        && saved.template_version != config.template.version
    {
        eprintln!(
            "{} answers were recorded with template version {}, current is {}",
            style("warning:").yellow().bold(),
            saved.template_version.as_deref().unwrap_or("-"),
            config.template.version.as_deref().unwrap_or("unversioned")
        );
    }
}

/// Execute a previously planned generation: write files, prune unselected
/// file groups, record the answers.
///
/// If the project directory did not exist beforehand it is removed again on
/// failure, so a failed run leaves nothing behind.
pub fn execute_generation(plan: FullGenerationPlan) -> Result<GenerationReport> {
    let existed = plan.project_dir.exists();

    let result = write_project(&plan);
    if result.is_err() && !existed && plan.project_dir.exists() {
        tracing::debug!(path = %plan.project_dir.display(), "removing partial project");
        if let Err(e) = std::fs::remove_dir_all(&plan.project_dir) {
            tracing::warn!(error = %e, "could not remove partial project");
        }
    }
    let report = result?;

    println!(
        "\n{} Project generated at {}",
        style("✓").green().bold(),
        style(report.project_dir.display()).cyan()
    );
    println!(
        "  {} files rendered, {} files copied, {} pruned",
        report.rendered.files_created.len(),
        report.rendered.files_copied.len(),
        report.removed.len()
    );

    Ok(report)
}

fn write_project(plan: &FullGenerationPlan) -> Result<GenerationReport> {
    std::fs::create_dir_all(&plan.output_dir).map_err(|e| DagcutterError::Io {
        context: format!("creating output directory {}", plan.output_dir.display()),
        source: e,
    })?;

    let rendered = execute_plan(&plan.render_plan, &plan.output_dir)?;

    materialize::verify_rendered(&plan.project_dir)?;
    let removed = materialize::apply_removals(&plan.project_dir, &plan.removals)?;

    answers::write_answers(&plan.project_dir, &plan.config, &plan.context)?;

    Ok(GenerationReport {
        project_dir: plan.project_dir.clone(),
        rendered,
        removed,
    })
}

/// Generate a project from a template.
pub fn generate(options: GenerateOptions, env: &EnvSettings) -> Result<GenerationReport> {
    let plan = plan_generation(options, env)?;
    execute_generation(plan)
}

/// Project-relative paths of the planned files that pruning deletes.
///
/// Files rendered outside the project directory are never pruned.
pub fn pruned_files(plan: &FullGenerationPlan) -> BTreeSet<PathBuf> {
    prune_paths(&plan.context, project_files(plan))
}

/// Project-relative paths of the files a plan leaves behind after pruning.
pub fn surviving_files(plan: &FullGenerationPlan) -> Vec<&Path> {
    let pruned = pruned_files(plan);
    project_files(plan)
        .filter(|p| !pruned.contains(*p))
        .collect()
}

fn project_files(plan: &FullGenerationPlan) -> impl Iterator<Item = &Path> {
    let root = Path::new(&plan.context.project_slug);
    plan.render_plan
        .files
        .iter()
        .filter_map(move |f| f.relative_path.strip_prefix(root).ok())
}
