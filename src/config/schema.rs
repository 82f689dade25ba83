use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::variable::{VariableConfig, VariableType};
use crate::error::{DagcutterError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    pub template: TemplateMetadata,

    /// Prompt order follows declaration order.
    #[serde(default)]
    pub variables: IndexMap<String, VariableConfig>,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub answers: AnswersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateMetadata {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,

    #[serde(default = "default_templates_suffix")]
    pub templates_suffix: String,
}

fn default_templates_suffix() -> String {
    ".tera".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FilesConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswersConfig {
    #[serde(default = "default_answers_file")]
    pub file: String,
}

pub(crate) fn default_answers_file() -> String {
    ".dagcutter-answers.toml".to_string()
}

impl Default for AnswersConfig {
    fn default() -> Self {
        Self {
            file: default_answers_file(),
        }
    }
}

impl TemplateConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, var) in &self.variables {
            if var.var_type != VariableType::Select {
                continue;
            }

            let choices = match &var.choices {
                Some(c) if !c.is_empty() => c,
                _ => {
                    return Err(DagcutterError::ConfigInvalidVariable {
                        name: name.clone(),
                        reason: "select variables must have non-empty 'choices'".into(),
                    })
                }
            };

            if let Some(default) = &var.default {
                if !choices.contains(default) {
                    return Err(DagcutterError::ConfigInvalidVariable {
                        name: name.clone(),
                        reason: format!("default '{default}' is not one of the choices"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Manifest defaults, in declaration order.
    pub fn defaults(&self) -> IndexMap<String, String> {
        self.variables
            .iter()
            .filter_map(|(name, var)| var.default.clone().map(|d| (name.clone(), d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_choices_rejected() {
        let config: TemplateConfig = toml::from_str(
            r#"
[template]
name = "bad"

[variables.ci_tool]
type = "select"
prompt = "CI"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(DagcutterError::ConfigInvalidVariable { .. })
        ));
    }

    #[test]
    fn test_select_default_must_be_a_choice() {
        let config: TemplateConfig = toml::from_str(
            r#"
[template]
name = "bad"

[variables.ci_tool]
type = "select"
choices = ["Github", "Gitlab"]
default = "Jenkins"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_variables_keep_declaration_order() {
        let config: TemplateConfig = toml::from_str(
            r#"
[template]
name = "ordered"

[variables.zeta]
default = "z"

[variables.alpha]
default = "a"

[variables.flagged]
type = "flag"
"#,
        )
        .unwrap();
        let names: Vec<_> = config.variables.keys().cloned().collect();
        assert_eq!(names, ["zeta", "alpha", "flagged"]);
        assert_eq!(config.template.templates_suffix, ".tera");
        assert_eq!(config.answers.file, ".dagcutter-answers.toml");

        let defaults = config.defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults["zeta"], "z");
    }
}
