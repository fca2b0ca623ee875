use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://github\.com/([^/]+)/([^/]+)").expect("github url regex")
});

/// Owner and repository name pulled out of a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no GitHub repository URL found in input")]
    NoMatch,
}

/// Finds the first `http(s)://github.com/<owner>/<repo>` anywhere in `input`.
///
/// Captures are returned verbatim: no trimming, case folding or percent-decoding.
/// Anything after the repository name is ignored.
pub fn resolve(input: &str) -> Result<RepositoryReference, ResolveError> {
    let caps = GITHUB_URL.captures(input).ok_or(ResolveError::NoMatch)?;
    Ok(RepositoryReference {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
    })
}

/// Resolves an input field: its value, or the placeholder when the value is empty.
pub fn resolve_field(value: &str, placeholder: &str) -> Result<RepositoryReference, ResolveError> {
    if value.is_empty() {
        resolve(placeholder)
    } else {
        resolve(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(owner: &str, repo: &str) -> RepositoryReference {
        RepositoryReference {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    #[test]
    fn resolves_https_and_http() {
        assert_eq!(
            resolve("https://github.com/foo/bar").unwrap(),
            reference("foo", "bar")
        );
        assert_eq!(
            resolve("http://github.com/foo/bar").unwrap(),
            reference("foo", "bar")
        );
    }

    #[test]
    fn ignores_trailing_path_and_surrounding_text() {
        assert_eq!(
            resolve("https://github.com/foo/bar/extra/path").unwrap(),
            reference("foo", "bar")
        );
        assert_eq!(
            resolve("see https://github.com/OpenBangla/OpenBangla-Keyboard/releases please")
                .unwrap(),
            reference("OpenBangla", "OpenBangla-Keyboard")
        );
        assert_eq!(
            resolve("https://github.com/foo/bar/?tab=readme").unwrap(),
            reference("foo", "bar")
        );
    }

    #[test]
    fn keeps_captures_verbatim() {
        // No slash after the repo, so the query string stays in the capture.
        assert_eq!(
            resolve("https://github.com/Foo/Bar.git?x=1").unwrap(),
            reference("Foo", "Bar.git?x=1")
        );
        assert_eq!(
            resolve("https://github.com/a%20b/c").unwrap(),
            reference("a%20b", "c")
        );
    }

    #[test]
    fn first_match_wins() {
        let input = "https://github.com/one/two/ and https://github.com/three/four";
        assert_eq!(resolve(input).unwrap(), reference("one", "two"));

        // Without a slash after the repo, the capture runs on to the next `/`.
        let input = "https://github.com/one/two and https://github.com/three/four";
        assert_eq!(resolve(input).unwrap(), reference("one", "two and https:"));
    }

    #[test]
    fn rejects_other_inputs() {
        for input in [
            "",
            "hello world",
            "https://gitlab.com/a/b",
            "https://github.com/onlyowner",
            "https://github.com/owner/",
            "ftp://github.com/a/b",
        ] {
            assert_eq!(resolve(input), Err(ResolveError::NoMatch), "input {input:?}");
        }
    }

    #[test]
    fn is_idempotent() {
        let input = "https://github.com/foo/bar";
        assert_eq!(resolve(input), resolve(input));
    }

    #[test]
    fn field_falls_back_to_placeholder() {
        let placeholder = "https://github.com/foo/bar";
        assert_eq!(
            resolve_field("", placeholder).unwrap(),
            reference("foo", "bar")
        );
        assert_eq!(
            resolve_field("https://github.com/x/y", placeholder).unwrap(),
            reference("x", "y")
        );
        assert_eq!(
            resolve_field("not a url", placeholder),
            Err(ResolveError::NoMatch)
        );
    }
}
