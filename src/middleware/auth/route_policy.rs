//! Which paths a realm's gate guards.
//!
//! Patterns:
//! - `/admin/**` matches `/admin` and everything below `/admin/` (segment boundary).
//! - anything else is an exact path.
//!
//! Exclusions win over inclusions: `/admin/employee/login` is exempt even though
//! `/admin/**` covers it. Request paths are compared as-is, so
//! `/admin/employee/login/` is not the login path.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Prefix(String),
    Exact(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Prefix(normalize(prefix).to_string()),
            None => Self::Exact(normalize(pattern).to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.include.push(PathPattern::parse(pattern));
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(PathPattern::parse(pattern));
        self
    }

    /// True when the gate must let `path` through without a token.
    pub fn is_exempt(&self, path: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(path)) {
            return true;
        }

        !self.include.iter().any(|p| p.matches(path))
    }

    pub fn requires_auth(&self, path: &str) -> bool {
        !self.is_exempt(path)
    }
}

// Patterns only: drop one trailing slash, keep the root as-is.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}
