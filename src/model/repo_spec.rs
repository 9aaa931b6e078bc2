use std::{fmt::Display, sync::OnceLock};

use regex_lite::Regex;

use super::ParseError;

/// Host used for locators that do not name one, e.g. `org/repo`.
pub const DEFAULT_HOST: &str = "https://github.com/";

const GIT_SUFFIX: &str = ".git";

/// Identity of a remote repository and the ref to check out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    /// Clone URL prefix, e.g. `https://github.com/` or `git@github.com:`.
    pub host: String,
    /// `organization/repository` part of the locator.
    pub org_repo: String,
    /// Branch, tag or commit-ish. `None` or an empty string means "use the default branch".
    pub git_ref: Option<String>,
}

impl RepoSpec {
    pub fn new(
        host: impl Into<String>,
        org_repo: impl Into<String>,
        git_ref: Option<String>,
    ) -> RepoSpec {
        RepoSpec {
            host: host.into(),
            org_repo: org_repo.into(),
            git_ref,
        }
    }

    /// Parses a repository locator.
    ///
    /// Accepted forms, each optionally followed by `?ref=<ref>`:
    /// - `org/repo` (resolved against `default_host`)
    /// - `example.com/org/repo`
    /// - `https://example.com/org/repo.git`, `ssh://git@example.com/org/repo`
    /// - `git@example.com:org/repo.git`
    /// - `file:///srv/git/org/repo`
    pub fn parse(input: &str, default_host: &str) -> Result<RepoSpec, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let (base, query) = match input.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (input, None),
        };
        let git_ref = match query {
            Some(query) => parse_query(query, input)?,
            None => None,
        };

        let base = base.trim_end_matches('/');
        let (host, path) = split_host(base, default_host, input)?;
        let org_repo = validate_org_repo(path.strip_suffix(GIT_SUFFIX).unwrap_or(path), input)?;

        Ok(RepoSpec {
            host,
            org_repo,
            git_ref,
        })
    }

    /// The ref, treating an empty string as absent.
    pub fn git_ref(&self) -> Option<&str> {
        self.git_ref.as_deref().filter(|git_ref| !git_ref.is_empty())
    }

    pub fn with_ref(self, git_ref: impl Into<String>) -> RepoSpec {
        RepoSpec {
            git_ref: Some(git_ref.into()),
            ..self
        }
    }

    /// The URL handed to `git clone`.
    pub fn clone_spec(&self) -> String {
        if self.host.starts_with("file://") {
            format!("{}{}", self.host, self.org_repo)
        } else {
            format!("{}{}{}", self.host, self.org_repo, GIT_SUFFIX)
        }
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)?;
        f.write_str(&self.org_repo)?;
        if let Some(git_ref) = self.git_ref() {
            f.write_str("?ref=")?;
            f.write_str(git_ref)?;
        }
        Ok(())
    }
}

fn scheme_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*)://(?P<rest>.*)$")
            .expect("scheme pattern is valid")
    })
}

fn scp_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?P<user>[^@/:]+)@(?P<host>[^:/]+):(?P<path>.*)$")
            .expect("scp pattern is valid")
    })
}

fn parse_query(query: &str, input: &str) -> Result<Option<String>, ParseError> {
    let mut git_ref = None;
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "ref" | "version" => {
                git_ref = Some(value.to_string()).filter(|value| !value.is_empty());
            }
            _ => {
                return Err(ParseError::UnknownParameter(
                    key.to_string(),
                    input.to_string(),
                ))
            }
        }
    }
    Ok(git_ref)
}

fn split_host<'a>(
    base: &'a str,
    default_host: &str,
    input: &str,
) -> Result<(String, &'a str), ParseError> {
    if let Some(captures) = scheme_regex().captures(base) {
        let scheme = captures.name("scheme").map_or("", |m| m.as_str());
        let rest = captures.name("rest").map_or("", |m| m.as_str());
        if scheme.eq_ignore_ascii_case("file") {
            return split_file_path(rest, input);
        }
        let (authority, path) = rest.split_once('/').ok_or_else(|| {
            ParseError::MissingUrlComponent("organization".to_string(), input.to_string())
        })?;
        if authority.is_empty() {
            return Err(ParseError::MissingUrlComponent(
                "host".to_string(),
                input.to_string(),
            ));
        }
        return Ok((format!("{scheme}://{authority}/"), path));
    }

    if let Some(captures) = scp_regex().captures(base) {
        let user = captures.name("user").map_or("", |m| m.as_str());
        let host = captures.name("host").map_or("", |m| m.as_str());
        let path = captures.name("path").map_or("", |m| m.as_str());
        return Ok((format!("{user}@{host}:"), path));
    }

    // `example.com/org/repo`: a first segment that looks like a domain names the host.
    if let Some((first, path)) = base.split_once('/') {
        if first.contains('.') && path.contains('/') {
            return Ok((format!("https://{first}/"), path));
        }
    }

    Ok((default_host.to_string(), base))
}

// Local repositories keep only `org/repo` as the locator so cache keys stay short.
fn split_file_path<'a>(path: &'a str, input: &str) -> Result<(String, &'a str), ParseError> {
    let repository_start = path.rfind('/').ok_or_else(|| {
        ParseError::MissingUrlComponent("repository".to_string(), input.to_string())
    })?;
    let organization_start = path[..repository_start]
        .rfind('/')
        .map(|index| index + 1)
        .unwrap_or(0);
    Ok((
        format!("file://{}", &path[..organization_start]),
        &path[organization_start..],
    ))
}

fn validate_org_repo(path: &str, input: &str) -> Result<String, ParseError> {
    let path = path.trim_matches('/');
    let (organization, repository) = path.split_once('/').ok_or_else(|| {
        ParseError::MissingUrlComponent("repository".to_string(), input.to_string())
    })?;
    if organization.is_empty() {
        return Err(ParseError::MissingUrlComponent(
            "organization".to_string(),
            input.to_string(),
        ));
    }
    if repository.is_empty() || repository.split('/').any(str::is_empty) {
        return Err(ParseError::MissingUrlComponent(
            "repository".to_string(),
            input.to_string(),
        ));
    }
    Ok(format!("{organization}/{repository}"))
}
