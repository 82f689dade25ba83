use std::collections::BTreeMap;

pub const DEFAULT_ENV_PREFIX: &str = "DAGCUTTER_";

/// Answers taken from prefixed environment variables.
///
/// Built once at startup and handed to answer collection by reference;
/// `DAGCUTTER_CI_TOOL=Gitlab` becomes the answer `ci_tool = "Gitlab"`.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    settings: BTreeMap<String, String>,
}

impl EnvSettings {
    pub fn load(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    pub fn from_vars<I>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(prefix)?;
                if name.is_empty() {
                    return None;
                }
                Some((name.to_ascii_lowercase(), value))
            })
            .collect();

        Self { settings }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.settings.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
