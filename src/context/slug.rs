use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::{DagcutterError, Result};

/// Characters replaced by `_`, in this order.
const SEPARATORS: [char; 4] = [' ', ':', '-', '!'];

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("slug pattern is valid"))
}

/// Derive the project slug from a human-readable project name.
///
/// Lowercases, trims, drops every `" project"` substring, then turns spaces,
/// colons, hyphens and exclamation marks into underscores.
pub fn slugify(project_name: &str) -> Result<String> {
    let mut slug = project_name.to_lowercase().trim().replace(" project", "");
    for sep in SEPARATORS {
        slug = slug.replace(sep, "_");
    }
    validate_slug(project_name, slug)
}

/// Check a derived (or user-supplied) slug against `^[a-z][a-z0-9_]*$`.
pub fn validate_slug(project_name: &str, slug: String) -> Result<String> {
    if slug_pattern().is_match(&slug) {
        Ok(slug)
    } else {
        Err(DagcutterError::SlugDerivation {
            project_name: project_name.to_string(),
            slug,
        })
    }
}

/// `"John Doe"` -> `"john-doe"`.
pub fn author_slug(author_name: &str) -> String {
    author_name.to_lowercase().replace(' ', "-")
}

pub fn derive_email(author_name: &str, domain_name: &str) -> String {
    format!("{}@{}", author_slug(author_name), domain_name)
}
