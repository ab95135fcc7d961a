use std::path::PathBuf;

use snafu::prelude::*;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub name: String,
    pub base: PathBuf,
    pub manifest: PathBuf,
    pub overwrite: bool,
    pub commit_message: String,
    pub publish: Option<PublishOptions>,
}

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub private: bool,
    pub token: String,
}

impl TryFrom<Cli> for RuntimeConfig {
    type Error = RuntimeConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let publish = if cli.publish {
            let token = cli.resolved_token().context(MissingTokenSnafu)?;
            Some(PublishOptions {
                private: cli.private,
                token,
            })
        } else {
            None
        };

        Ok(Self {
            name: cli.name,
            base: cli.base,
            manifest: cli.manifest,
            overwrite: !cli.keep_files,
            commit_message: cli.message,
            publish,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum RuntimeConfigError {
    #[snafu(display("--publish requires a token via --token or GITHUB_TOKEN"))]
    MissingToken,
}
