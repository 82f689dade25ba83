use std::path::PathBuf;

use console::style;
use miette::Result;

use dagcutter::check::check_template;
use dagcutter::config::TemplateDir;

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let template_dir = TemplateDir::open(path.as_deref())?;

    let location = if template_dir.is_bundled() {
        "<bundled>".to_string()
    } else {
        template_dir.path().display().to_string()
    };
    println!(
        "{} {}",
        style("Checking template at").bold(),
        style(location).cyan()
    );

    let result = check_template(template_dir.path())?;

    println!("  Name: {}", result.template_name);
    println!("  Variables: {}", result.variable_count);

    if !result.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &result.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if !result.errors.is_empty() {
        println!("\n{}", style("Errors:").red().bold());
        for e in &result.errors {
            println!("  {} {}", style("✗").red(), e);
        }
        println!(
            "\n{} Template has {} error(s)",
            style("✗").red().bold(),
            result.errors.len()
        );
        drop(template_dir);
        std::process::exit(1);
    }

    println!("\n{} Template is valid!", style("✓").green().bold());
    Ok(())
}
