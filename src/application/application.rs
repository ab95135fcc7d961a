use colored::Colorize;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{RuntimeConfig, RuntimeConfigError};
use crate::filesystem::{MaterializeError, Materializer, RenderError, TreeLine, render};
use crate::layout::{Manifest, ManifestError};
use crate::publish::{GitBootstrap, GitError, PublishError, RemotePublisher};

pub struct Application;

impl Application {
    /// Runs the whole pipeline: manifest → materialize → render, then the
    /// optional publish steps. A failure in any core stage aborts before any
    /// version-control or remote step runs.
    pub async fn run(
        config: impl TryInto<RuntimeConfig, Error = RuntimeConfigError>,
    ) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = config.try_into().context(OptionsSnafu)?;

        let manifest = Manifest::from_path(config.manifest.clone())
            .await
            .context(ManifestSnafu)?;
        debug!("Loaded manifest: {:?}", manifest);

        let root = config.base.join(&config.name);
        info!(
            "Materializing {} entries under {}",
            manifest.root().entry_count(),
            root.display()
        );
        Materializer::new(config.overwrite)
            .materialize(&root, manifest.root())
            .await
            .context(MaterializeSnafu)?;

        let lines = render(&root).context(RenderSnafu)?;
        print_tree(&lines);

        if let Some(publish) = &config.publish {
            let git = GitBootstrap::new(&root);
            git.init_and_commit(&config.commit_message)
                .await
                .context(GitSnafu)?;

            let clone_url = RemotePublisher::new(publish.token.clone())
                .create_repository(&config.name, publish.private)
                .context(PublishSnafu)?;

            git.add_remote_and_push(&clone_url).await.context(GitSnafu)?;
            println!("Published to {clone_url}");
        }

        Ok(())
    }
}

fn print_tree(lines: &[TreeLine]) {
    for line in lines {
        if line.is_directory() {
            println!("{}+-- {}", line.indent(), line.label.blue().bold());
        } else {
            println!("{line}");
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Invalid combination of command line options"))]
    OptionsError { source: RuntimeConfigError },
    #[snafu(display("Failed to load the layout manifest"))]
    ManifestError { source: ManifestError },
    #[snafu(display("Failed to materialize the declared layout"))]
    MaterializeError { source: MaterializeError },
    #[snafu(display("Failed to render the materialized tree"))]
    RenderError { source: RenderError },
    #[snafu(display("Failed to bootstrap the git repository"))]
    GitError { source: GitError },
    #[snafu(display("Failed to publish the repository"))]
    PublishError { source: PublishError },
}
