// Paginated list envelope.
//
// Every list endpoint answers with a JSON array body, the total row count in
// `X-Total-Count`, and optionally an RFC 8288 `Link` header. This module owns
// the query side (`page`, `size`, `sort`) and the parsed response side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Header carrying the total number of rows across all pages.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Sort direction as it appears on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// `sort=field,dir`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, dir) = match s.split_once(',') {
            Some((field, dir)) => (field.trim(), dir.parse()?),
            None => (s.trim(), Direction::Asc),
        };
        if field.is_empty() {
            return Err("sort field is empty".into());
        }
        Ok(Self {
            field: field.to_owned(),
            direction: dir,
        })
    }
}

/// Query parameters of a paginated read. `page` is zero-based on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Option<Sort>) -> Self {
        Self { page, size, sort }
    }

    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.to_string()));
        }
        params
    }
}

/// Page numbers advertised by the `Link` header (zero-based, as on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl PageLinks {
    /// Parse `<url?page=1&size=20>; rel="next", <...>; rel="last"`.
    ///
    /// Targets may themselves contain commas (`sort=id,asc`), so entries are
    /// delimited by the angle brackets rather than by splitting on `,`.
    /// Entries without a parsable `page` query parameter are skipped.
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();
        let mut rest = header;
        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else {
                break;
            };
            let target = &after[..end];
            let tail = &after[end + 1..];
            let params_end = tail.find('<').unwrap_or(tail.len());
            let params = &tail[..params_end];
            rest = &tail[params_end..];

            let Some(page) = page_param(target) else {
                continue;
            };
            let rel = params
                .split([';', ','])
                .filter_map(|s| s.trim().strip_prefix("rel="))
                .map(|r| r.trim_matches('"'))
                .next();
            match rel {
                Some("first") => links.first = Some(page),
                Some("prev") => links.prev = Some(page),
                Some("next") => links.next = Some(page),
                Some("last") => links.last = Some(page),
                _ => {}
            }
        }
        links
    }
}

fn page_param(target: &str) -> Option<u32> {
    let url = url::Url::parse(target)
        .or_else(|_| url::Url::parse("http://localhost/")?.join(target))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// One page of a paginated read.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows across all pages, from `X-Total-Count`.
    pub total: u64,
    pub links: PageLinks,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            links: self.links,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sort_parses_and_formats() {
        let sort: Sort = "startTime,desc".parse().unwrap();
        assert_eq!(sort, Sort::desc("startTime"));
        assert_eq!(sort.to_string(), "startTime,desc");

        let bare: Sort = "name".parse().unwrap();
        assert_eq!(bare.direction, Direction::Asc);

        assert!("id,sideways".parse::<Sort>().is_err());
        assert!(",asc".parse::<Sort>().is_err());
    }

    #[test]
    fn query_params_omit_missing_sort() {
        let req = PageRequest::new(2, 50, None);
        assert_eq!(
            req.query_params(),
            vec![("page", "2".to_string()), ("size", "50".to_string())]
        );
        let req = PageRequest::new(0, 20, Some(Sort::asc("id")));
        assert_eq!(req.query_params()[2], ("sort", "id,asc".to_string()));
    }

    #[test]
    fn link_header_parsing() {
        let header = "<http://localhost:8080/api/meeting-rooms?page=1&size=20>; rel=\"next\",\
                      <http://localhost:8080/api/meeting-rooms?page=2&size=20>; rel=\"last\",\
                      <http://localhost:8080/api/meeting-rooms?page=0&size=20>; rel=\"first\"";
        let links = PageLinks::parse(header);
        assert_eq!(links.next, Some(1));
        assert_eq!(links.last, Some(2));
        assert_eq!(links.first, Some(0));
        assert_eq!(links.prev, None);
    }

    #[test]
    fn link_targets_with_sort_commas() {
        let header = "</api/booking-requests?page=2&size=20&sort=id,asc>; rel=\"next\", \
                      </api/booking-requests?page=0&size=20&sort=id,asc>; rel=\"prev\"";
        let links = PageLinks::parse(header);
        assert_eq!(links.next, Some(2));
        assert_eq!(links.prev, Some(0));
    }

    #[test]
    fn relative_link_targets() {
        let links = PageLinks::parse("</api/equipment?page=3&size=5>; rel=\"prev\"");
        assert_eq!(links.prev, Some(3));
    }
}
