//! Named-route reversal for catalog detail views.
//!
//! # Responsibility
//! - Map route names to path patterns such as `/catalog/book/<int:pk>`.
//! - Build detail-view locators from a route name plus positional arguments.
//!
//! # Invariants
//! - Route names are unique within one resolver.
//! - Arguments are substituted in placeholder order; the count must match.
//! - `int` placeholders accept ASCII digits only.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const AUTHOR_DETAIL: &str = "author-detail";
pub const BOOK_DETAIL: &str = "book-detail";

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:(?P<converter>[a-z]+):)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)>")
        .expect("valid placeholder regex")
});

/// Route reversal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseError {
    NoReverseMatch(String),
    ArgumentCount {
        route: String,
        expected: usize,
        actual: usize,
    },
    InvalidArgument {
        route: String,
        placeholder: String,
        value: String,
    },
    DuplicateRoute(String),
}

impl Display for ReverseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoReverseMatch(name) => write!(f, "no route named `{name}`"),
            Self::ArgumentCount {
                route,
                expected,
                actual,
            } => write!(
                f,
                "route `{route}` expects {expected} argument(s), got {actual}"
            ),
            Self::InvalidArgument {
                route,
                placeholder,
                value,
            } => write!(
                f,
                "value `{value}` does not match placeholder `{placeholder}` of route `{route}`"
            ),
            Self::DuplicateRoute(name) => write!(f, "route `{name}` is already registered"),
        }
    }
}

impl Error for ReverseError {}

/// Route table consulted when building detail-view addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResolver {
    routes: BTreeMap<String, String>,
}

impl UrlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver holding the catalog's detail routes.
    pub fn catalog() -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(
            AUTHOR_DETAIL.to_string(),
            "/catalog/author/<int:pk>".to_string(),
        );
        routes.insert(BOOK_DETAIL.to_string(), "/catalog/book/<int:pk>".to_string());
        Self { routes }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<(), ReverseError> {
        let name = name.into();
        if self.routes.contains_key(&name) {
            return Err(ReverseError::DuplicateRoute(name));
        }
        self.routes.insert(name, pattern.into());
        Ok(())
    }

    /// Substitutes `args` into the pattern registered under `name`.
    pub fn reverse(&self, name: &str, args: &[&str]) -> Result<String, ReverseError> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| ReverseError::NoReverseMatch(name.to_string()))?;

        let placeholders = PLACEHOLDER_RE.captures_iter(pattern).count();
        if placeholders != args.len() {
            return Err(ReverseError::ArgumentCount {
                route: name.to_string(),
                expected: placeholders,
                actual: args.len(),
            });
        }

        let mut path = String::with_capacity(pattern.len());
        let mut last_end = 0;
        for (caps, value) in PLACEHOLDER_RE.captures_iter(pattern).zip(args) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let converter = caps.name("converter").map_or("str", |m| m.as_str());
            if !argument_matches(converter, value) {
                return Err(ReverseError::InvalidArgument {
                    route: name.to_string(),
                    placeholder: caps.name("name").map_or("", |m| m.as_str()).to_string(),
                    value: (*value).to_string(),
                });
            }
            path.push_str(&pattern[last_end..whole.start]);
            path.push_str(value);
            last_end = whole.end;
        }
        path.push_str(&pattern[last_end..]);
        Ok(path)
    }
}

fn argument_matches(converter: &str, value: &str) -> bool {
    match converter {
        "int" => !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit()),
        _ => !value.is_empty() && !value.contains('/'),
    }
}

#[cfg(test)]
mod tests {
    use super::{ReverseError, UrlResolver, AUTHOR_DETAIL, BOOK_DETAIL};

    #[test]
    fn catalog_routes_reverse_with_identifier() {
        let urls = UrlResolver::catalog();
        assert_eq!(urls.reverse(AUTHOR_DETAIL, &["7"]).unwrap(), "/catalog/author/7");
        assert_eq!(urls.reverse(BOOK_DETAIL, &["42"]).unwrap(), "/catalog/book/42");
    }

    #[test]
    fn unknown_route_is_no_reverse_match() {
        let err = UrlResolver::catalog().reverse("genre-detail", &["1"]).unwrap_err();
        assert_eq!(err, ReverseError::NoReverseMatch("genre-detail".to_string()));
    }

    #[test]
    fn argument_count_and_int_converter_are_checked() {
        let urls = UrlResolver::catalog();
        assert!(matches!(
            urls.reverse(BOOK_DETAIL, &[]).unwrap_err(),
            ReverseError::ArgumentCount { expected: 1, actual: 0, .. }
        ));
        assert!(matches!(
            urls.reverse(BOOK_DETAIL, &["abc"]).unwrap_err(),
            ReverseError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn register_rejects_duplicates_and_supports_str_placeholders() {
        let mut urls = UrlResolver::new();
        urls.register("copy-detail", "/catalog/copy/<id>/").unwrap();
        assert_eq!(
            urls.reverse("copy-detail", &["abc-1"]).unwrap(),
            "/catalog/copy/abc-1/"
        );
        assert!(matches!(
            urls.register("copy-detail", "/x/").unwrap_err(),
            ReverseError::DuplicateRoute(_)
        ));
    }
}
