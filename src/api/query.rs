//! List query parameters accepted by every list endpoint

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::QueryParams;

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// URL / wire parameter names
pub const PAGE_NUMBER: &str = "pageNumber";
pub const PAGE_SIZE: &str = "pageSize";
pub const FILTER_ON: &str = "filterOn";
pub const FILTER_QUERY: &str = "filterQuery";
pub const SORT_BY: &str = "sortBy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Pagination, filtering and sorting for a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_query: Option<String>,
    pub sort_by: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            filter_on: None,
            filter_query: None,
            sort_by: SortOrder::Asc,
        }
    }
}

impl ListQuery {
    /// Derive the query from URL state, falling back to defaults for
    /// missing or unusable values
    pub fn from_params(params: &QueryParams) -> Self {
        Self::from_params_with_page_size(params, DEFAULT_PAGE_SIZE)
    }

    pub fn from_params_with_page_size(params: &QueryParams, default_page_size: u32) -> Self {
        let default_page_size = default_page_size.max(1);
        Self {
            page_number: positive(params.get(PAGE_NUMBER)).unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: positive(params.get(PAGE_SIZE)).unwrap_or(default_page_size),
            filter_on: non_empty(params.get(FILTER_ON)),
            filter_query: non_empty(params.get(FILTER_QUERY)),
            sort_by: params
                .get(SORT_BY)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// A filter on one column
    pub fn filtered(mut self, filter_on: impl Into<String>, filter_query: impl Into<String>) -> Self {
        self.filter_on = Some(filter_on.into());
        self.filter_query = Some(filter_query.into());
        self
    }

    /// Wire pairs in a fixed order; absent filters are omitted
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (PAGE_NUMBER, self.page_number.to_string()),
            (PAGE_SIZE, self.page_size.to_string()),
        ];
        if let Some(filter_on) = &self.filter_on {
            pairs.push((FILTER_ON, filter_on.clone()));
        }
        if let Some(filter_query) = &self.filter_query {
            pairs.push((FILTER_QUERY, filter_query.clone()));
        }
        pairs.push((SORT_BY, self.sort_by.as_str().to_string()));
        pairs
    }
}

fn positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_url() {
        let query = ListQuery::from_params(&QueryParams::new());
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.sort_by, SortOrder::Asc);
    }

    #[test]
    fn test_from_params_reads_all_fields() {
        let params = QueryParams::parse(
            "pageNumber=3&pageSize=25&filterOn=title&filterQuery=grammar&sortBy=DESC&search=x",
        );
        let query = ListQuery::from_params(&params);

        assert_eq!(query.page_number, 3);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.filter_on.as_deref(), Some("title"));
        assert_eq!(query.filter_query.as_deref(), Some("grammar"));
        assert_eq!(query.sort_by, SortOrder::Desc);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let params = QueryParams::parse("pageNumber=0&pageSize=abc&sortBy=sideways&filterOn=");
        let query = ListQuery::from_params_with_page_size(&params, 20);

        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.sort_by, SortOrder::Asc);
        assert!(query.filter_on.is_none());
    }

    #[test]
    fn test_to_pairs_order() {
        let query = ListQuery::default().filtered("level", "A1");
        let keys: Vec<&str> = query.to_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["pageNumber", "pageSize", "filterOn", "filterQuery", "sortBy"]);

        let keys: Vec<&str> = ListQuery::default().to_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["pageNumber", "pageSize", "sortBy"]);
    }
}
