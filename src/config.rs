use crate::cli::CommonArgs;
use crate::error::{GhcardError, Result};

pub const GRAPHQL_API: &str = "https://api.github.com/graphql";
pub const REST_API: &str = "https://api.github.com";

/// Resolved credentials and endpoints for the fetch layer.
///
/// Built once per invocation from CLI flags with environment fallback;
/// nothing below the CLI reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub token: String,
    pub graphql_url: String,
    pub rest_url: String,
}

impl Config {
    /// Resolve from flags, falling back to `GITHUB_ACTOR` for the username
    /// and `ACCESS_TOKEN` then `GITHUB_TOKEN` for the token.
    pub fn resolve(common: &CommonArgs) -> Result<Self> {
        let username = common
            .user
            .clone()
            .or_else(|| env_non_empty("GITHUB_ACTOR"))
            .ok_or_else(|| {
                GhcardError::Config("username: pass --user or set GITHUB_ACTOR".to_string())
            })?;

        let token = common
            .token
            .clone()
            .or_else(|| env_non_empty("ACCESS_TOKEN"))
            .or_else(|| env_non_empty("GITHUB_TOKEN"))
            .ok_or_else(|| {
                GhcardError::Config(
                    "token: pass --token or set ACCESS_TOKEN or GITHUB_TOKEN".to_string(),
                )
            })?;

        Ok(Self {
            username,
            token,
            graphql_url: GRAPHQL_API.to_string(),
            rest_url: REST_API.to_string(),
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(user: Option<&str>, token: Option<&str>) -> CommonArgs {
        CommonArgs {
            user: user.map(String::from),
            token: token.map(String::from),
            out_dir: "svg".into(),
            cache: None,
        }
    }

    #[test]
    fn flags_take_precedence() {
        let config = Config::resolve(&args(Some("octocat"), Some("tok"))).unwrap();
        assert_eq!(config.username, "octocat");
        assert_eq!(config.token, "tok");
        assert_eq!(config.graphql_url, GRAPHQL_API);
    }

    #[test]
    fn missing_token_is_a_config_error() {
        std::env::remove_var("ACCESS_TOKEN");
        std::env::remove_var("GITHUB_TOKEN");
        let err = Config::resolve(&args(Some("octocat"), None)).unwrap_err();
        assert!(matches!(err, GhcardError::Config(_)), "got {err:?}");
    }
}
