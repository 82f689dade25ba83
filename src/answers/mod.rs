use std::path::Path;

use crate::config::options::flag_str;
use crate::config::schema::TemplateConfig;
use crate::context::{RawContext, ResolvedContext};
use crate::error::{DagcutterError, Result};

/// Answers recorded by a previous generation.
#[derive(Debug, Clone)]
pub struct SavedAnswers {
    pub template: String,
    pub template_version: Option<String>,
    pub dagcutter_version: String,
    pub answers: RawContext,
}

/// Load answers from a generated project directory or directly from an answers file.
///
/// For a directory, `answers_file` names the file inside it (the template's
/// `[answers] file`).
pub fn load_answers(path: &Path, answers_file: &str) -> Result<SavedAnswers> {
    let answers_path = if path.is_dir() {
        path.join(answers_file)
    } else {
        path.to_path_buf()
    };
    if !answers_path.exists() {
        return Err(DagcutterError::NoAnswerFile {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(&answers_path).map_err(|e| DagcutterError::Io {
        context: format!("reading answers file {}", answers_path.display()),
        source: e,
    })?;

    let table: toml::Value =
        toml::from_str(&content).map_err(|e| DagcutterError::AnswerFileParse {
            path: answers_path.clone(),
            source: e,
        })?;

    let empty_table = toml::map::Map::new();
    let meta = table
        .get("_dagcutter")
        .and_then(toml::Value::as_table)
        .unwrap_or(&empty_table);
    let get_str = |key: &str| -> Option<&str> { meta.get(key).and_then(toml::Value::as_str) };

    let answers: RawContext = table
        .get("variables")
        .and_then(toml::Value::as_table)
        .map(|vars| {
            vars.iter()
                .filter_map(|(k, v)| toml_value_to_answer(v).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    Ok(SavedAnswers {
        template: get_str("template").unwrap_or("").to_string(),
        template_version: get_str("version").map(String::from),
        dagcutter_version: get_str("dagcutter_version").unwrap_or("0.0.0").to_string(),
        answers,
    })
}

/// Record the resolved answers in `<project_dir>/<answers file>`.
pub fn write_answers(
    project_dir: &Path,
    config: &TemplateConfig,
    context: &ResolvedContext,
) -> Result<()> {
    let answers_path = project_dir.join(&config.answers.file);

    let mut meta = toml::map::Map::new();
    meta.insert(
        "template".to_string(),
        toml::Value::String(config.template.name.clone()),
    );
    if let Some(version) = &config.template.version {
        meta.insert("version".to_string(), toml::Value::String(version.clone()));
    }
    meta.insert(
        "dagcutter_version".to_string(),
        toml::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );

    let vars: toml::map::Map<String, toml::Value> = context
        .to_raw()
        .iter()
        .map(|(k, v)| (k.clone(), toml::Value::String(v.clone())))
        .collect();

    let mut table = toml::map::Map::new();
    table.insert("_dagcutter".to_string(), toml::Value::Table(meta));
    table.insert("variables".to_string(), toml::Value::Table(vars));

    let content = toml::to_string_pretty(&table).map_err(|e| DagcutterError::Io {
        context: format!("serializing answers to {}", answers_path.display()),
        source: std::io::Error::other(e),
    })?;

    std::fs::write(&answers_path, content).map_err(|e| DagcutterError::Io {
        context: format!("writing answers file {}", answers_path.display()),
        source: e,
    })
}

fn toml_value_to_answer(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Boolean(b) => Some(flag_str(*b).to_string()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        _ => None,
    }
}
