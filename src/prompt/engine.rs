use std::collections::{BTreeMap, HashMap};

use crate::config::options::{flag_str, parse_flag};
use crate::config::schema::TemplateConfig;
use crate::config::variable::{VariableConfig, VariableType};
use crate::context::{slugify, RawContext};
use crate::error::{DagcutterError, Result};

#[derive(Default)]
pub struct PromptOptions {
    /// Defaults that replace the manifest's (user config or `--config-file`).
    pub default_context: BTreeMap<String, String>,
    /// Answers that skip prompting entirely.
    pub data_overrides: HashMap<String, String>,
    /// Never prompt; fall back to defaults.
    pub no_input: bool,
}

/// Collect one raw answer per manifest variable, in declaration order.
///
/// Overrides win, then (in no-input mode) the effective default; otherwise
/// the user is prompted with that default pre-filled. Override keys the
/// manifest does not declare are passed through.
pub fn collect_answers(config: &TemplateConfig, options: &PromptOptions) -> Result<RawContext> {
    let mut answers = RawContext::new();

    for (name, var) in &config.variables {
        if let Some(value) = options.data_overrides.get(name) {
            answers.insert(name.clone(), value.clone());
            continue;
        }

        let default = options
            .default_context
            .get(name)
            .or(var.default.as_ref())
            .cloned();

        if options.no_input {
            let value = default.ok_or_else(|| DagcutterError::MissingAnswer { name: name.clone() })?;
            answers.insert(name.clone(), value);
            continue;
        }

        let value = prompt_variable(name, var, default.as_deref())?;
        answers.insert(name.clone(), value);
    }

    for (name, value) in &options.data_overrides {
        if !config.variables.contains_key(name) {
            tracing::debug!(%name, "passing through undeclared answer");
            answers.insert(name.clone(), value.clone());
        }
    }

    Ok(answers)
}

/// Split `KEY=VALUE` arguments.
pub fn parse_data_pairs(data: &[String]) -> Result<Vec<(String, String)>> {
    data.iter()
        .map(|kv| match kv.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(DagcutterError::InvalidData { input: kv.clone() }),
        })
        .collect()
}

fn prompt_variable(name: &str, var: &VariableConfig, default: Option<&str>) -> Result<String> {
    let prompt_text = var.prompt.as_deref().unwrap_or(name);

    match var.var_type {
        VariableType::String => {
            let mut prompt = inquire::Text::new(prompt_text);
            if let Some(default) = default {
                prompt = prompt.with_default(default);
            }
            if name == "project_name" {
                prompt = prompt.with_validator(|input: &str| match slugify(input) {
                    Ok(_) => Ok(inquire::validator::Validation::Valid),
                    Err(e) => Ok(inquire::validator::Validation::Invalid(
                        inquire::validator::ErrorMessage::Custom(e.to_string()),
                    )),
                });
            }
            prompt.prompt().map_err(|_| DagcutterError::PromptCancelled)
        }
        VariableType::Select => {
            let choices = var.choices.clone().unwrap_or_default();
            let start = default
                .and_then(|d| choices.iter().position(|c| c == d))
                .unwrap_or(0);
            inquire::Select::new(prompt_text, choices)
                .with_starting_cursor(start)
                .prompt()
                .map_err(|_| DagcutterError::PromptCancelled)
        }
        VariableType::Flag => {
            let default = match default {
                Some(d) => parse_flag(name, d)?,
                None => false,
            };
            let answer = inquire::Confirm::new(prompt_text)
                .with_default(default)
                .prompt()
                .map_err(|_| DagcutterError::PromptCancelled)?;
            Ok(flag_str(answer).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::config::schema::TemplateMetadata;
    use rstest::rstest;

    fn config(variables: IndexMap<String, VariableConfig>) -> TemplateConfig {
        TemplateConfig {
            template: TemplateMetadata {
                name: "test".to_string(),
                version: None,
                description: None,
                templates_suffix: ".tera".to_string(),
            },
            variables,
            files: Default::default(),
            answers: Default::default(),
        }
    }

    fn variable(var_type: VariableType, default: Option<&str>) -> VariableConfig {
        VariableConfig {
            var_type,
            prompt: None,
            default: default.map(String::from),
            choices: None,
        }
    }

    fn sample_config() -> TemplateConfig {
        let mut variables = IndexMap::new();
        variables.insert(
            "project_name".to_string(),
            variable(VariableType::String, Some("data-engineering")),
        );
        variables.insert(
            "ci_tool".to_string(),
            VariableConfig {
                choices: Some(vec!["Github".into(), "Gitlab".into(), "None".into()]),
                ..variable(VariableType::Select, Some("Github"))
            },
        );
        variables.insert("debug".to_string(), variable(VariableType::Flag, Some("n")));
        variables.insert("email".to_string(), variable(VariableType::String, Some("")));
        config(variables)
    }

    #[test]
    fn test_no_input_uses_manifest_defaults() {
        let options = PromptOptions {
            no_input: true,
            ..Default::default()
        };
        let answers = collect_answers(&sample_config(), &options).unwrap();

        assert_eq!(answers.len(), 4);
        assert_eq!(answers.get("project_name"), Some("data-engineering"));
        assert_eq!(answers.get("ci_tool"), Some("Github"));
        assert_eq!(answers.get("debug"), Some("n"));
        assert_eq!(answers.get("email"), Some(""));
    }

    #[test]
    fn test_precedence_override_then_default_context() {
        let options = PromptOptions {
            default_context: [("ci_tool".to_string(), "Gitlab".to_string())]
                .into_iter()
                .collect(),
            data_overrides: [
                ("project_name".to_string(), "Warehouse".to_string()),
                ("project_slug".to_string(), "wh".to_string()),
            ]
            .into_iter()
            .collect(),
            no_input: true,
        };
        let answers = collect_answers(&sample_config(), &options).unwrap();

        assert_eq!(answers.get("project_name"), Some("Warehouse"));
        assert_eq!(answers.get("ci_tool"), Some("Gitlab"));
        assert_eq!(answers.get("project_slug"), Some("wh"));
    }

    #[test]
    fn test_no_input_without_default_fails() {
        let mut variables = IndexMap::new();
        variables.insert("author_name".to_string(), variable(VariableType::String, None));
        let options = PromptOptions {
            no_input: true,
            ..Default::default()
        };

        let result = collect_answers(&config(variables), &options);
        assert!(matches!(
            result,
            Err(DagcutterError::MissingAnswer { ref name }) if name == "author_name"
        ));
    }

    #[rstest]
    #[case("project_name=Data Engineering", "project_name", "Data Engineering")]
    #[case("git_repo=https://x/?a=b", "git_repo", "https://x/?a=b")]
    #[case("email=", "email", "")]
    fn test_parse_data_pairs(#[case] input: &str, #[case] key: &str, #[case] value: &str) {
        let pairs = parse_data_pairs(&[input.to_string()]).unwrap();
        assert_eq!(pairs, vec![(key.to_string(), value.to_string())]);
    }

    #[rstest]
    #[case("no-equals-sign")]
    #[case("=value")]
    fn test_parse_data_pairs_rejects(#[case] input: &str) {
        assert!(matches!(
            parse_data_pairs(&[input.to_string()]),
            Err(DagcutterError::InvalidData { .. })
        ));
    }
}
