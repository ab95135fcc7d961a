use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;
use crate::layout::LAYOUT_FILE_NAME;

const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Materialize a declared directory layout and optionally publish it"
)]
pub struct Cli {
    /// Name of the repository root created under the base path
    pub name: String,

    /// Directory under which the repository root is created
    #[clap(long, short, default_value = ".")]
    pub base: PathBuf,

    /// Path to the YAML layout manifest
    #[clap(long, short, default_value = LAYOUT_FILE_NAME)]
    pub manifest: PathBuf,

    /// Leave existing file contents untouched instead of truncating them
    #[clap(long)]
    pub keep_files: bool,

    /// Create a GitHub repository and push the initial commit to it
    #[clap(long)]
    pub publish: bool,

    /// Make the published repository private
    #[clap(long)]
    pub private: bool,

    /// GitHub token; falls back to the GITHUB_TOKEN environment variable
    #[clap(long)]
    pub token: Option<String>,

    /// Message used for the initial commit
    #[clap(long, default_value = "Initial commit")]
    pub message: String,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

impl Cli {
    /// Token resolution happens here so that nothing below the CLI layer
    /// touches the process environment.
    pub fn resolved_token(&self) -> Option<String> {
        resolve_token(self.token.clone(), env::var(TOKEN_ENV_VAR).ok())
    }
}

pub fn resolve_token(explicit: Option<String>, from_env: Option<String>) -> Option<String> {
    explicit
        .or(from_env)
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Some("cli-token"), Some("env-token"), Some("cli-token"))]
    #[case(None, Some("env-token"), Some("env-token"))]
    #[case(Some("cli-token"), None, Some("cli-token"))]
    #[case(None, None, None)]
    #[case(None, Some("   "), None)]
    fn token_resolution_prefers_explicit_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved = resolve_token(explicit.map(str::to_string), from_env.map(str::to_string));
        assert_eq!(resolved.as_deref(), expected);
    }
}
