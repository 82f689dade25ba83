pub mod slug;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::options::{flag_str, parse_flag};
use crate::config::{CiTool, License};
use crate::error::Result;

pub use slug::{derive_email, slugify};

/// Fallback answers for options the caller did not supply.
///
/// These mirror the defaults declared by the bundled template manifest.
pub const DEFAULT_ANSWERS: &[(&str, &str)] = &[
    ("project_name", "data-engineering"),
    ("description", "Repository for data engineering."),
    ("python_version", "3.12"),
    ("author_name", "John"),
    ("domain_name", "example.com"),
    ("airflow_version", "2.10.0"),
    ("git_repo", "https://github.com/"),
    ("open_source_license", "MIT"),
    ("use_docker", "y"),
    ("ci_tool", "Github"),
    ("postgresql_version", "17"),
    ("debug", "n"),
];

/// Keys consumed by the resolver; everything else passes through untouched.
const KNOWN_KEYS: &[&str] = &[
    "project_name",
    "project_slug",
    "description",
    "python_version",
    "author_name",
    "domain_name",
    "email",
    "airflow_version",
    "git_repo",
    "open_source_license",
    "use_docker",
    "ci_tool",
    "postgresql_version",
    "debug",
];

/// Raw answers, one string per option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContext {
    values: BTreeMap<String, String>,
}

impl RawContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get_or_default(&self, key: &str) -> String {
        if let Some(value) = self.get(key) {
            return value.to_string();
        }
        DEFAULT_ANSWERS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawContext::new();
        for (k, v) in iter {
            raw.insert(k, v);
        }
        raw
    }
}

/// Answers after validation and derivation; the only input the renderer
/// and the materializer see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub project_name: String,
    pub project_slug: String,
    pub description: String,
    pub author_name: String,
    pub domain_name: String,
    pub email: String,
    pub python_version: String,
    pub airflow_version: String,
    pub postgresql_version: String,
    pub git_repo: String,
    pub open_source_license: License,
    pub ci_tool: CiTool,
    pub use_docker: bool,
    pub debug: bool,
    /// Answers the resolver does not interpret.
    pub extra: BTreeMap<String, String>,
    /// `project_slug` was supplied rather than derived.
    explicit_slug: bool,
    /// `email` was supplied rather than derived.
    explicit_email: bool,
}

/// Validate raw answers and derive `project_slug` and `email`.
///
/// Pure: the same input always yields the same context.
pub fn resolve(raw: &RawContext) -> Result<ResolvedContext> {
    let open_source_license: License = raw.get_or_default("open_source_license").parse()?;
    let ci_tool: CiTool = raw.get_or_default("ci_tool").parse()?;
    let use_docker = parse_flag("use_docker", &raw.get_or_default("use_docker"))?;
    let debug = parse_flag("debug", &raw.get_or_default("debug"))?;

    let project_name = raw.get_or_default("project_name");
    let explicit_slug = raw.get("project_slug").is_some();
    let project_slug = match raw.get("project_slug") {
        Some(explicit) => slug::validate_slug(&project_name, explicit.to_string())?,
        None => slugify(&project_name)?,
    };

    let author_name = raw.get_or_default("author_name");
    let domain_name = raw.get_or_default("domain_name");
    let (email, explicit_email) = match raw.get("email") {
        Some(email) if !email.trim().is_empty() => (email.to_string(), true),
        _ => (derive_email(&author_name, &domain_name), false),
    };

    let extra = raw
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    tracing::debug!(%project_name, %project_slug, %email, "resolved context");

    Ok(ResolvedContext {
        project_name,
        project_slug,
        description: raw.get_or_default("description"),
        author_name,
        domain_name,
        email,
        python_version: raw.get_or_default("python_version"),
        airflow_version: raw.get_or_default("airflow_version"),
        postgresql_version: raw.get_or_default("postgresql_version"),
        git_repo: raw.get_or_default("git_repo"),
        open_source_license,
        ci_tool,
        use_docker,
        debug,
        extra,
        explicit_slug,
        explicit_email,
    })
}

impl ResolvedContext {
    /// Canonical string form of the answers, flags as `y`/`n`.
    ///
    /// Derived `project_slug` and `email` are left out so that resolving the
    /// result again derives them afresh from `project_name` and `author_name`.
    pub fn to_raw(&self) -> RawContext {
        let mut raw: RawContext = self
            .text_fields()
            .into_iter()
            .filter(|(k, _)| match *k {
                "project_slug" => self.explicit_slug,
                "email" => self.explicit_email,
                _ => true,
            })
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        raw.insert("open_source_license", self.open_source_license.as_str());
        raw.insert("ci_tool", self.ci_tool.as_str());
        raw.insert("use_docker", flag_str(self.use_docker));
        raw.insert("debug", flag_str(self.debug));
        for (k, v) in &self.extra {
            raw.insert(k.clone(), v.clone());
        }
        raw
    }

    /// Variables handed to Tera. Flags become booleans.
    pub fn to_variables(&self) -> BTreeMap<String, Value> {
        let mut vars: BTreeMap<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        for (k, v) in self.text_fields() {
            vars.insert(k.to_string(), Value::String(v.to_string()));
        }
        vars.insert(
            "open_source_license".into(),
            Value::String(self.open_source_license.as_str().into()),
        );
        vars.insert("ci_tool".into(), Value::String(self.ci_tool.as_str().into()));
        vars.insert("use_docker".into(), Value::Bool(self.use_docker));
        vars.insert("debug".into(), Value::Bool(self.debug));
        vars
    }

    fn text_fields(&self) -> [(&'static str, &str); 10] {
        [
            ("project_name", self.project_name.as_str()),
            ("project_slug", self.project_slug.as_str()),
            ("description", self.description.as_str()),
            ("author_name", self.author_name.as_str()),
            ("domain_name", self.domain_name.as_str()),
            ("email", self.email.as_str()),
            ("python_version", self.python_version.as_str()),
            ("airflow_version", self.airflow_version.as_str()),
            ("postgresql_version", self.postgresql_version.as_str()),
            ("git_repo", self.git_repo.as_str()),
        ]
    }
}
