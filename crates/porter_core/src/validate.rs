use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Message shown when a submission is attempted with an unusable URL.
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid GitHub repository URL";

// ASCII classes keep `\w` aligned with browser regex semantics.
static GITHUB_REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([A-Za-z0-9_-]+)/([A-Za-z0-9_.-]+)/?$")
        .expect("github url pattern compiles")
});

/// Owner/name pair extracted from a validated GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Untouched field; neither valid nor flagged.
    Empty,
    Valid(RepositoryReference),
    Invalid,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// True unless the field holds a non-empty string that fails the pattern.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Validation::Invalid)
    }

    pub fn into_reference(self) -> Option<RepositoryReference> {
        match self {
            Validation::Valid(reference) => Some(reference),
            Validation::Empty | Validation::Invalid => None,
        }
    }
}

/// Checks `url` against the accepted GitHub repository URL shape.
pub fn validate(url: &str) -> Validation {
    if url.is_empty() {
        return Validation::Empty;
    }
    match GITHUB_REPO_URL.captures(url) {
        Some(caps) => Validation::Valid(RepositoryReference {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        }),
        None => Validation::Invalid,
    }
}
