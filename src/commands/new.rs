use std::path::PathBuf;

use console::style;
use miette::Result;

use dagcutter::config::EnvSettings;
use dagcutter::prompt::parse_data_pairs;
use dagcutter::GenerateOptions;

pub struct NewArgs {
    pub template: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub data: Vec<String>,
    pub no_input: bool,
    pub config_file: Option<PathBuf>,
    pub replay: Option<PathBuf>,
    pub overwrite: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

pub fn run(args: NewArgs, env: &EnvSettings) -> Result<()> {
    let options = GenerateOptions {
        template: args.template,
        output_dir: args.output_dir,
        data: parse_data_pairs(&args.data)?,
        config_file: args.config_file,
        replay: args.replay,
        no_input: args.no_input,
        overwrite: args.overwrite,
    };

    if !args.dry_run {
        dagcutter::generate(options, env)?;
        println!(
            "{} Project initialized, keep up the good work!",
            style("success:").green().bold()
        );
        return Ok(());
    }

    let plan = dagcutter::plan_generation(options, env)?;
    let surviving = dagcutter::surviving_files(&plan);

    println!(
        "\n{} Dry run: files that would be generated in {}:",
        style("==>").cyan().bold(),
        style(plan.project_dir.display()).cyan()
    );

    let root = PathBuf::from(&plan.context.project_slug);
    for file in &plan.render_plan.files {
        let Ok(rel) = file.relative_path.strip_prefix(&root) else {
            continue;
        };
        if !surviving.contains(&rel) {
            continue;
        }

        let action = if file.is_copy { "copy  " } else { "create" };
        println!("  {} {}", style(action).green(), rel.display());

        if args.verbose {
            println!("  {}", style("──────").dim());
            let content = String::from_utf8_lossy(&file.content);
            for line in content.lines() {
                println!("  {}", line);
            }
            println!("  {}", style("──────").dim());
            println!();
        }
    }

    for removal in &plan.removals {
        println!(
            "  {} {} ({})",
            style("prune ").yellow(),
            removal.path.display(),
            removal.group
        );
    }

    let pruned = dagcutter::pruned_files(&plan);
    println!(
        "\nSummary: {} files kept, {} pruned",
        surviving.len(),
        pruned.len()
    );
    println!(
        "\n{} Dry run, no files written.",
        style("\u{2139}").blue().bold()
    );

    Ok(())
}
