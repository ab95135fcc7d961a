use reqwest::blocking::Client;
use reqwest::header;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use tracing::{debug, info};

const CREATE_REPO_URL: &str = "https://api.github.com/user/repos";
const USER_AGENT: &str = concat!("scaff/", env!("CARGO_PKG_VERSION"));

/// Provisions a remote repository through the GitHub API and reports the
/// clone URL back. No retries: a rejected or malformed response is surfaced
/// to the caller as-is.
pub struct RemotePublisher {
    token: String,
}

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    private: bool,
}

#[derive(Debug, Deserialize)]
struct CreateRepoResponse {
    clone_url: Option<String>,
}

impl RemotePublisher {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn create_repository(&self, name: &str, private: bool) -> Result<String, PublishError> {
        debug!("Creating remote repository '{name}' (private: {private})");

        let response = Client::new()
            .post(CREATE_REPO_URL)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::USER_AGENT, USER_AGENT)
            .json(&CreateRepoRequest { name, private })
            .send()
            .context(RequestSnafu)?;

        let status = response.status();
        let body = response.text().context(RequestSnafu)?;
        ensure!(
            status.is_success(),
            RejectedSnafu {
                status: status.as_u16(),
                body: body.clone(),
            }
        );

        let parsed: CreateRepoResponse =
            serde_json::from_str(&body).context(MalformedResponseSnafu)?;
        let clone_url = parsed.clone_url.context(MissingCloneUrlSnafu { body })?;
        info!("Created remote repository at {clone_url}");
        Ok(clone_url)
    }
}

#[derive(Debug, Snafu)]
pub enum PublishError {
    #[snafu(display("Failed to reach the repository API"))]
    RequestError { source: reqwest::Error },
    #[snafu(display("Repository creation was rejected with status {}: {}", status, body))]
    Rejected { status: u16, body: String },
    #[snafu(display("Repository API returned a malformed response"))]
    MalformedResponse { source: serde_json::Error },
    #[snafu(display("Repository API response carries no clone URL: {}", body))]
    MissingCloneUrl { body: String },
}
