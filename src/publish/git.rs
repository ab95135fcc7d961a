use std::path::{Path, PathBuf};
use std::process::Stdio;

use colored::Colorize;
use compio::{io::compat::AsyncStream, process::Command, runtime::spawn};
use futures::{AsyncBufReadExt, StreamExt, io::BufReader};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

/// Stages the materialized tree and creates the initial commit, then wires up
/// the remote once the publisher has provisioned it.
///
/// Every git invocation runs with the realized root as its working directory;
/// the process-wide current directory is never changed.
#[derive(Debug, Clone)]
pub struct GitBootstrap {
    root: PathBuf,
}

impl GitBootstrap {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn init_and_commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["init", "-b", "main"]).await?;
        self.run(&["add", "."]).await?;
        self.run(&["commit", "-m", message]).await?;
        info!("Created initial commit on branch 'main'");
        Ok(())
    }

    pub async fn add_remote_and_push(&self, url: &str) -> Result<(), GitError> {
        self.run(&["remote", "add", "origin", url]).await?;
        self.run(&["push", "-u", "origin", "main"]).await?;
        info!("Pushed branch 'main' to {url}");
        Ok(())
    }

    async fn run(&self, args: &[&str]) -> Result<(), GitError> {
        let subcommand = args[0].to_string();
        debug!(
            "Running 'git {}' in {}",
            args.join(" "),
            self.root.best_effort_path_display()
        );

        let mut handle = self
            .command(args)
            .spawn()
            .context(SpawnSnafu {
                subcommand: subcommand.clone(),
            })?;

        if let Some(stdout) = handle.stdout.take() {
            Self::spawn_line_relay(AsyncStream::new(stdout), subcommand.clone());
        }
        if let Some(stderr) = handle.stderr.take() {
            Self::spawn_line_relay(AsyncStream::new(stderr), subcommand.clone());
        }

        let status = handle.wait().await.context(WaitSnafu {
            subcommand: subcommand.clone(),
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(GitError::UnsuccessfulExecution {
                subcommand,
                status: status.code().unwrap_or(-1),
            })
        }
    }

    /// Creates the git command with the realized root as working directory
    /// and piped stdio
    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.root);
        let _ = cmd.stdout(Stdio::piped());
        let _ = cmd.stderr(Stdio::piped());
        cmd
    }

    /// Spawns a task relaying one git output stream to the terminal
    fn spawn_line_relay<R>(stream: R, subcommand: String)
    where
        R: futures::AsyncRead + Unpin + 'static,
    {
        spawn(async move {
            let reader = BufReader::new(stream);
            let mut lines = reader.lines();

            while let Some(line_result) = lines.next().await {
                match line_result {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            print_from_git(&subcommand, line.trim());
                        }
                    }
                    Err(e) => {
                        debug!("Error reading output of 'git {}': {}", subcommand, e);
                    }
                }
            }
        })
        .detach();
    }
}

fn print_from_git(subcommand: &str, line: &str) {
    println!("{} {}", format!("[git {subcommand}]").cyan(), line);
}

#[derive(Debug, Snafu)]
pub enum GitError {
    #[snafu(display("Failed to spawn 'git {}'", subcommand))]
    SpawnError {
        subcommand: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for 'git {}'", subcommand))]
    WaitError {
        subcommand: String,
        source: std::io::Error,
    },
    #[snafu(display("'git {}' failed with exit code {}", subcommand, status))]
    UnsuccessfulExecution { subcommand: String, status: i32 },
}
