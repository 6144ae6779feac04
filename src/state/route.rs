//! Route resolution from the page location.
//!
//! Accepted forms:
//! - `/` and `/latest`: newest day
//! - `/{date}`: that day, optionally with `#{anchor}`
//! - `#/{date}` and `#/{date}/{anchor}`: legacy client links
//! - `/search?q=...`: search view
//!
//! Anything else resolves to the default view and is logged at `warn`.

use crate::model::{Anchor, DateId};
use std::fmt;
use url::Url;

/// Base used to resolve relative locations.
const BASE: &str = "http://localhost/";

/// Which day to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayTarget {
    /// Whatever the backend considers the newest day.
    Latest,
    /// A specific day.
    Date(DateId),
}

impl DayTarget {
    /// Path segment used by the backend (`latest` or the date).
    pub fn as_segment(&self) -> &str {
        match self {
            DayTarget::Latest => "latest",
            DayTarget::Date(date) => date.as_str(),
        }
    }

    /// The date, when specific.
    pub fn date(&self) -> Option<&DateId> {
        match self {
            DayTarget::Latest => None,
            DayTarget::Date(date) => Some(date),
        }
    }
}

impl fmt::Display for DayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_segment())
    }
}

/// Resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// A day transcript.
    DefaultView {
        /// Requested day; `None` means latest.
        date: Option<DayTarget>,
        /// Message to scroll to.
        anchor: Option<Anchor>,
    },
    /// Search results.
    SearchView {
        /// Value of the `q` parameter, if present.
        query: Option<String>,
    },
}

impl Default for RouteTarget {
    fn default() -> Self {
        RouteTarget::DefaultView {
            date: None,
            anchor: None,
        }
    }
}

impl RouteTarget {
    /// Resolve `location` (absolute URL or path). Never fails.
    pub fn parse(location: &str) -> Self {
        let url = match Url::parse(BASE).and_then(|base| base.join(location.trim())) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(location, error = %e, "Unparseable location, showing latest");
                return RouteTarget::default();
            }
        };

        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|p| !p.is_empty())
                    .map(decode_component)
                    .collect()
            })
            .unwrap_or_default();

        if segments.first().map(String::as_str) == Some("search") {
            let query = url
                .query_pairs()
                .find(|(key, _)| key == "q")
                .map(|(_, value)| value.into_owned());
            return RouteTarget::SearchView { query };
        }

        let mut date = match segments.as_slice() {
            [] => None,
            [first, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!(location, "Ignoring trailing path segments");
                }
                parse_day(first, location)
            }
        };

        let mut anchor = None;
        if let Some(fragment) = url.fragment().map(decode_component) {
            match fragment.strip_prefix('/') {
                Some(legacy) => {
                    let mut parts = legacy.split('/').filter(|p| !p.is_empty());
                    let legacy_date = parts.next().and_then(|d| parse_day(d, location));
                    if date.is_none() {
                        date = legacy_date;
                    }
                    anchor = parts.next().and_then(|a| parse_anchor(a, location));
                }
                None if fragment.is_empty() => {}
                None => anchor = parse_anchor(&fragment, location),
            }
        }

        RouteTarget::DefaultView { date, anchor }
    }

    /// Canonical location for this route.
    pub fn to_location(&self) -> String {
        match self {
            RouteTarget::DefaultView { date, anchor } => {
                let mut out = match date {
                    None | Some(DayTarget::Latest) => "/".to_string(),
                    Some(DayTarget::Date(d)) => format!("/{}", urlencoding::encode(d.as_str())),
                };
                if let Some(anchor) = anchor {
                    out.push('#');
                    out.push_str(&urlencoding::encode(anchor.as_str()));
                }
                out
            }
            RouteTarget::SearchView { query } => match query {
                Some(q) => format!("/search?q={}", urlencoding::encode(q)),
                None => "/search".to_string(),
            },
        }
    }
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn parse_day(segment: &str, location: &str) -> Option<DayTarget> {
    if segment == "latest" {
        return Some(DayTarget::Latest);
    }
    match DateId::new(segment) {
        Ok(date) => Some(DayTarget::Date(date)),
        Err(e) => {
            tracing::warn!(location, error = %e, "Invalid date in location, showing latest");
            None
        }
    }
}

fn parse_anchor(raw: &str, location: &str) -> Option<Anchor> {
    match Anchor::new(raw) {
        Ok(anchor) => Some(anchor),
        Err(e) => {
            tracing::warn!(location, error = %e, "Ignoring invalid anchor");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> Option<DayTarget> {
        Some(DayTarget::Date(DateId::new(raw).expect("valid date")))
    }

    fn anchor(raw: &str) -> Option<Anchor> {
        Some(Anchor::new(raw).expect("valid anchor"))
    }

    #[test]
    fn root_is_latest_default_view() {
        assert_eq!(RouteTarget::parse("/"), RouteTarget::default());
        assert_eq!(RouteTarget::parse(""), RouteTarget::default());
    }

    #[test]
    fn latest_segment() {
        assert_eq!(
            RouteTarget::parse("/latest"),
            RouteTarget::DefaultView {
                date: Some(DayTarget::Latest),
                anchor: None
            }
        );
    }

    #[test]
    fn date_with_anchor() {
        assert_eq!(
            RouteTarget::parse("/2023-10-20#103"),
            RouteTarget::DefaultView {
                date: day("2023-10-20"),
                anchor: anchor("103")
            }
        );
    }

    #[test]
    fn absolute_url_is_accepted() {
        assert_eq!(
            RouteTarget::parse("https://logs.example.org/2023-10-20"),
            RouteTarget::DefaultView {
                date: day("2023-10-20"),
                anchor: None
            }
        );
    }

    #[test]
    fn legacy_hash_route() {
        assert_eq!(
            RouteTarget::parse("/#/2023-10-20/7"),
            RouteTarget::DefaultView {
                date: day("2023-10-20"),
                anchor: anchor("7")
            }
        );
        assert_eq!(
            RouteTarget::parse("#/2023-10-19"),
            RouteTarget::DefaultView {
                date: day("2023-10-19"),
                anchor: None
            }
        );
    }

    #[test]
    fn search_with_query() {
        assert_eq!(
            RouteTarget::parse("/search?q=hello%20world"),
            RouteTarget::SearchView {
                query: Some("hello world".to_string())
            }
        );
    }

    #[test]
    fn search_without_query() {
        assert_eq!(
            RouteTarget::parse("/search"),
            RouteTarget::SearchView { query: None }
        );
    }

    #[test]
    fn canonical_locations() {
        assert_eq!(RouteTarget::default().to_location(), "/");
        assert_eq!(
            RouteTarget::DefaultView {
                date: day("2023-10-20"),
                anchor: anchor("5")
            }
            .to_location(),
            "/2023-10-20#5"
        );
        assert_eq!(
            RouteTarget::SearchView {
                query: Some("a b&c".to_string())
            }
            .to_location(),
            "/search?q=a%20b%26c"
        );
    }

    #[test]
    fn canonical_location_parses_back() {
        let route = RouteTarget::SearchView {
            query: Some("x/y?z".to_string()),
        };
        assert_eq!(RouteTarget::parse(&route.to_location()), route);
    }
}
