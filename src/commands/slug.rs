use miette::Result;

pub fn run(project_name: &str) -> Result<()> {
    let slug = dagcutter::context::slugify(project_name)?;
    println!("{slug}");
    Ok(())
}
