use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Select,
    /// Yes/no question, answered as `y` or `n`.
    Flag,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct VariableConfig {
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    pub prompt: Option<String>,
    pub default: Option<String>,
    pub choices: Option<Vec<String>>,
}
