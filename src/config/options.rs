use std::fmt;
use std::str::FromStr;

use crate::error::{DagcutterError, Result};

/// License chosen for the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum License {
    Mit,
    Bsd,
    GplV3,
    Apache2,
    NotOpenSource,
}

impl License {
    pub const ALL: [License; 5] = [
        License::Mit,
        License::Bsd,
        License::GplV3,
        License::Apache2,
        License::NotOpenSource,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Bsd => "BSD",
            License::GplV3 => "GPLv3",
            License::Apache2 => "Apache Software License 2.0",
            License::NotOpenSource => "Not open source",
        }
    }

    pub fn is_open_source(self) -> bool {
        self != License::NotOpenSource
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = DagcutterError;

    fn from_str(s: &str) -> Result<Self> {
        License::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| unknown_value("open_source_license", s, &License::ALL))
    }
}

/// CI provider whose configuration is kept in the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CiTool {
    Github,
    Gitlab,
    None,
}

impl CiTool {
    pub const ALL: [CiTool; 3] = [CiTool::Github, CiTool::Gitlab, CiTool::None];

    pub fn as_str(self) -> &'static str {
        match self {
            CiTool::Github => "Github",
            CiTool::Gitlab => "Gitlab",
            CiTool::None => "None",
        }
    }
}

impl fmt::Display for CiTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CiTool {
    type Err = DagcutterError;

    fn from_str(s: &str) -> Result<Self> {
        CiTool::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| unknown_value("ci_tool", s, &CiTool::ALL))
    }
}

/// Parse a yes/no answer (`y`/`n` and the usual spellings).
pub fn parse_flag(option: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(DagcutterError::Configuration {
            option: option.to_string(),
            value: value.to_string(),
            expected: "y, n".to_string(),
        }),
    }
}

pub fn flag_str(value: bool) -> &'static str {
    if value {
        "y"
    } else {
        "n"
    }
}

fn unknown_value<T: fmt::Display>(option: &str, value: &str, known: &[T]) -> DagcutterError {
    DagcutterError::Configuration {
        option: option.to_string(),
        value: value.to_string(),
        expected: known
            .iter()
            .map(|k| format!("'{k}'"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
