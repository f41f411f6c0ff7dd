//! Github Platform
use super::{GITHUB_API_HEADER, GITHUB_API_URL, GITHUB_API_VERSION};
use crate::{
    errors::{MigrateError, MigrateErrorKind},
    github::repo::CreateRepoGithub,
    platform::{Platform, PlatformFuture, PlatformType},
    utils::Secret,
};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
    RequestBuilder, StatusCode,
};
use urlencoding::encode;

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// Github username
    username: String,

    /// Github token
    token: Secret,

    /// Base URL of the REST API
    api_url: String,

    /// Reqwest client
    client: reqwest::Client,
}

impl GithubPlatform {
    /// Create a new GithubPlatform talking to api.github.com
    pub fn new(username: String, token: Secret) -> Self {
        Self {
            username,
            token,
            api_url: GITHUB_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Use another REST API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Add the authentication and versioning headers
    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("bb2gh/", env!("CARGO_PKG_VERSION")))
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
    }
}

impl Platform for GithubPlatform {
    fn get_username(&self) -> &str {
        &self.username
    }

    fn get_type(&self) -> PlatformType {
        PlatformType::Github
    }

    fn repo_exists<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, bool> {
        Box::pin(async move {
            let url = format!(
                "{}/repos/{}/{}",
                self.api_url,
                encode(&self.username),
                encode(name)
            );
            let response = self.authenticated(self.client.get(&url)).send().await?;
            let status = response.status();
            log::debug!("GET {url} -> {status}");
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                log::warn!(
                    "GitHub answered {status} when looking up {}/{name}; check the GitHub token",
                    self.username
                );
            }
            Ok(status == StatusCode::OK)
        })
    }

    fn create_repo<'a>(&'a self, name: &'a str, private: bool) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let url = format!("{}/user/repos", self.api_url);
            let body = CreateRepoGithub::new(name, private);
            let response = self
                .authenticated(self.client.post(&url))
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
                let text = response.text().await?;
                return Err(MigrateError::new(MigrateErrorKind::RepoCreation)
                    .with_platform(PlatformType::Github)
                    .with_text(&format!("{status}: {text}")));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn platform(server: &MockServer) -> GithubPlatform {
        GithubPlatform::new("acme-gh".to_string(), Secret::new("ghtoken"))
            .with_api_url(&server.uri())
    }

    #[tokio::test]
    async fn exists_only_on_found() {
        for (status, expected) in [(200, true), (404, false), (401, false), (500, false)] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/repos/acme-gh/widgets"))
                .and(header("authorization", "Bearer ghtoken"))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&server)
                .await;
            let exists = platform(&server).repo_exists("widgets").await.unwrap();
            assert_eq!(exists, expected, "status {status}");
        }
    }

    #[tokio::test]
    async fn create_posts_empty_repo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .and(header("accept", "application/vnd.github+json"))
            .and(body_json(serde_json::json!({
                "name": "widgets",
                "private": true,
                "auto_init": false
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        platform(&server).create_repo("widgets", true).await.unwrap();
    }

    #[tokio::test]
    async fn create_failure_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(
                ResponseTemplate::new(422).set_body_string("{\"message\":\"Repository creation failed.\"}"),
            )
            .mount(&server)
            .await;
        let err = platform(&server)
            .create_repo("widgets", false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &MigrateErrorKind::RepoCreation);
        assert!(err.to_string().contains("Repository creation failed."));
        assert!(!err.to_string().contains("ghtoken"));
    }
}
