#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DagcutterError {
    #[error("Invalid value '{value}' for option '{option}'")]
    #[diagnostic(help("Expected one of: {expected}"))]
    Configuration {
        option: String,
        value: String,
        expected: String,
    },

    #[error("Cannot derive a project slug from '{project_name}' (got '{slug}')")]
    #[diagnostic(help(
        "The slug must start with a letter and contain only lowercase letters, digits and underscores"
    ))]
    SlugDerivation { project_name: String, slug: String },

    #[error("Expected path missing from rendered project: {path}")]
    #[diagnostic(help("The template did not produce the expected tree; discard the output"))]
    MissingPath { path: PathBuf },

    #[error("Template config not found at {path}")]
    #[diagnostic(help("Ensure the template directory contains a dagcutter.toml file"))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse {path}")]
    #[diagnostic(help("Check the TOML syntax"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid variable definition for '{name}': {reason}")]
    ConfigInvalidVariable { name: String, reason: String },

    #[error("Failed to render {file}")]
    #[diagnostic(help("Check your Tera template syntax"))]
    RenderError {
        file: String,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to render filename: {filename}")]
    FilenameRenderError {
        filename: String,
        #[source]
        source: tera::Error,
    },

    #[error("Project directory already exists: {path}")]
    #[diagnostic(help("Use --overwrite to generate into the existing directory"))]
    OutputExists { path: PathBuf },

    #[error("Template directory not found: {path}")]
    #[diagnostic(help("The template must contain a 'template/' subdirectory"))]
    TemplateDirectoryMissing { path: PathBuf },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Prompt cancelled by user")]
    PromptCancelled,

    #[error("No value for '{name}'")]
    #[diagnostic(help("Pass it with -d {name}=VALUE or drop --no-input"))]
    MissingAnswer { name: String },

    #[error("Invalid data argument '{input}'")]
    #[diagnostic(help("Data arguments must look like KEY=VALUE"))]
    InvalidData { input: String },

    #[error("No answers file found in {path}")]
    NoAnswerFile { path: PathBuf },

    #[error("Failed to parse answers file {path}")]
    AnswerFileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, DagcutterError>;
