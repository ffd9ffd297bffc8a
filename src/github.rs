use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// One public profile as returned by `GET /users/{username}`.
///
/// `login` is the presence check: a body without it (GitHub's "Not Found"
/// error object, for instance) fails deserialization and the lookup is
/// treated as a miss.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub public_gists: u32,
    pub location: Option<String>,
    pub twitter_username: Option<String>,
    pub blog: Option<String>,
    pub company: Option<String>,
    pub created_at: Option<String>,
    pub html_url: Option<String>,
}

impl Profile {
    /// First letter of the display name, falling back to the login, used
    /// for the avatar badge.
    pub fn initial(&self) -> char {
        self.name
            .as_deref()
            .and_then(|n| n.chars().next())
            .or_else(|| self.login.chars().next())
            .unwrap_or('?')
    }

    /// Display name with login fallback.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn lookup(&self, username: &str) -> Result<Profile>;
}

pub struct GithubClient {
    api_base: String,
    client: reqwest::Client,
}

impl GithubClient {
    pub fn new(api_base: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("ghprofile")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_base, client })
    }
}

#[async_trait]
impl ProfileSource for GithubClient {
    async fn lookup(&self, username: &str) -> Result<Profile> {
        let url = format!(
            "{}/users/{}",
            self.api_base,
            urlencoding::encode(username)
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .context("Failed to reach the GitHub API")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("GitHub API error: {}", response.status()));
        }

        let profile: Profile = response
            .json()
            .await
            .context("Response was not a user profile")?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_full_body() {
        let body = r#"{
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "public_repos": 8,
            "followers": 10000,
            "following": 9,
            "public_gists": 8,
            "location": "San Francisco",
            "twitter_username": null,
            "blog": "https://github.blog",
            "company": "@github",
            "created_at": "2011-01-25T18:44:36Z",
            "html_url": "https://github.com/octocat"
        }"#;

        let profile: Profile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.public_repos, 8);
        assert_eq!(profile.display_name(), "The Octocat");
        assert_eq!(profile.initial(), 'T');
    }

    #[test]
    fn test_body_without_login_is_rejected() {
        // GitHub's 404 body: {"message": "Not Found", ...}
        let body = r#"{"message": "Not Found", "status": "404"}"#;
        assert!(serde_json::from_str::<Profile>(body).is_err());
    }

    #[test]
    fn test_name_fallbacks() {
        let profile: Profile = serde_json::from_str(r#"{"login": "octocat"}"#).unwrap();
        assert_eq!(profile.display_name(), "octocat");
        assert_eq!(profile.initial(), 'o');

        let blank: Profile =
            serde_json::from_str(r#"{"login": "octocat", "name": "  "}"#).unwrap();
        assert_eq!(blank.display_name(), "octocat");
    }
}
