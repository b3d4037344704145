use std::fmt;

use url::Url;

use crate::error::ChangelogError;

/// Web location of the repository that pull request links point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// Accepts web URLs as well as `git@host:owner/repo.git` and `ssh://` remotes.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if the URL is invalid, or
    /// `ChangelogError::InvalidRepositoryPath` if it lacks an owner/repo path.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        let normalized = normalize_remote(url_str.trim());
        let url = Url::parse(&normalized).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let (owner, repo) = extract_owner_repo(&url)?;

        let scheme = match url.scheme() {
            "http" => "http",
            _ => "https",
        };
        let authority = match url.port() {
            Some(port) if scheme == url.scheme() => format!("{host}:{port}"),
            _ => host.to_string(),
        };
        let base_url = Url::parse(&format!("{scheme}://{authority}")).map_err(|source| {
            ChangelogError::UrlParse {
                url: url_str.to_string(),
                source,
            }
        })?;

        Ok(Self {
            owner,
            repo,
            base_url,
        })
    }

    #[must_use]
    pub fn web_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.owner, self.repo)
    }

    #[must_use]
    pub fn pull_request_url(&self, number: &str) -> String {
        format!("{}/pull/{number}", self.web_url())
    }
}

impl fmt::Display for RepositoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.web_url())
    }
}

fn normalize_remote(url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    // scp-like syntax: git@github.com:owner/repo.git
    match url.split_once(':') {
        Some((user_host, path)) if user_host.contains('@') => {
            let host = user_host.rsplit('@').next().unwrap_or(user_host);
            format!("ssh://git@{host}/{path}")
        }
        _ => url.to_string(),
    }
}

fn extract_owner_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 {
        return Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        });
    }

    Ok((segments[0].to_string(), segments[1].to_string()))
}
