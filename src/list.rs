//! Paginated list controller
//!
//! The URL query string is the single source of truth. Controls such as
//! "next page" or "filter by title" rewrite the params through
//! [`update_params`]; the derived [`ListQuery`] then drives the fetch. The
//! same URL therefore always produces the same request.
//!
//! Every fetch is tagged with the generation of the URL state it was issued
//! for. A response that arrives after the URL has moved on is dropped, so a
//! slow, stale response can never overwrite a newer one.

use serde::Serialize;

use crate::api::query::{DEFAULT_PAGE_SIZE, FILTER_ON, FILTER_QUERY, PAGE_NUMBER, PAGE_SIZE, SORT_BY};
use crate::api::{ApiError, ListQuery, ListSource, Page, PageMeta, SortOrder};
use crate::params::{update_params, QueryParams};

pub const EMPTY_MESSAGE: &str = "No records found.";

/// A fetch in flight, remembering which URL state it belongs to
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// Pagination controls to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    /// Target of the "previous" control; `None` hides it
    pub prev: Option<u32>,
    /// Target of the "next" control; `None` hides it
    pub next: Option<u32>,
}

impl From<PageMeta> for Pagination {
    fn from(meta: PageMeta) -> Self {
        Self {
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_count: meta.total_count,
            prev: if meta.has_previous_page {
                Some(meta.current_page.saturating_sub(1).max(1))
            } else {
                None
            },
            next: if meta.has_next_page {
                Some(meta.current_page.saturating_add(1))
            } else {
                None
            },
        }
    }
}

/// What a list screen shows
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub items: &'a [T],
    /// `None` until the first successful fetch
    pub pagination: Option<Pagination>,
    pub empty_message: Option<&'static str>,
}

pub struct ListController<S: ListSource> {
    source: S,
    params: QueryParams,
    query: ListQuery,
    default_page_size: u32,
    generation: u64,
    items: Vec<S::Item>,
    meta: Option<PageMeta>,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, params: QueryParams) -> Self {
        Self::with_default_page_size(source, params, DEFAULT_PAGE_SIZE)
    }

    pub fn with_default_page_size(source: S, params: QueryParams, default_page_size: u32) -> Self {
        let query = ListQuery::from_params_with_page_size(&params, default_page_size);
        Self {
            source,
            params,
            query,
            default_page_size,
            generation: 0,
            items: Vec::new(),
            meta: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current URL state
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.meta
    }

    // ==================== URL controls ====================

    /// Apply a merge-or-delete update to the URL. Returns whether the URL
    /// changed (and a refresh is due).
    pub fn navigate<K, V>(&mut self, updates: impl IntoIterator<Item = (K, V)>) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let next = update_params(&self.params, updates);
        if next == self.params {
            return false;
        }
        log::debug!("List URL: ?{} -> ?{}", self.params, next);
        self.params = next;
        self.query = ListQuery::from_params_with_page_size(&self.params, self.default_page_size);
        self.generation += 1;
        true
    }

    /// Replace the whole URL state, as when following a link
    pub fn replace_params(&mut self, params: QueryParams) -> bool {
        if params == self.params {
            return false;
        }
        self.params = params;
        self.query = ListQuery::from_params_with_page_size(&self.params, self.default_page_size);
        self.generation += 1;
        true
    }

    /// Filter on one column; goes back to the first page
    pub fn set_filter(&mut self, filter_on: &str, filter_query: &str) -> bool {
        self.navigate([
            (FILTER_ON, filter_on),
            (FILTER_QUERY, filter_query),
            (PAGE_NUMBER, ""),
        ])
    }

    pub fn clear_filter(&mut self) -> bool {
        self.navigate([(FILTER_ON, ""), (FILTER_QUERY, ""), (PAGE_NUMBER, "")])
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> bool {
        self.navigate([(SORT_BY, sort.as_str())])
    }

    pub fn toggle_sort(&mut self) -> bool {
        let next = self.query.sort_by.toggled();
        self.set_sort(next)
    }

    /// Page 0 removes the parameter (back to the default first page)
    pub fn set_page(&mut self, page: u32) -> bool {
        let value = if page == 0 { String::new() } else { page.to_string() };
        self.navigate([(PAGE_NUMBER, value)])
    }

    /// Go to the next page if the last response said there is one
    pub fn next_page(&mut self) -> bool {
        match self.meta.map(Pagination::from).and_then(|p| p.next) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        match self.meta.map(Pagination::from).and_then(|p| p.prev) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    /// Change the page size; goes back to the first page
    pub fn set_page_size(&mut self, size: u32) -> bool {
        let value = if size == 0 { String::new() } else { size.to_string() };
        self.navigate([(PAGE_SIZE, value), (PAGE_NUMBER, String::new())])
    }

    // ==================== Fetching ====================

    /// Start a fetch for the current URL state
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Apply a fetch result.
    ///
    /// Returns `Ok(true)` when the list was replaced and `Ok(false)` when the
    /// response was stale and dropped. On error the previous rows and
    /// metadata stay in place.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Page<S::Item>, ApiError>) -> Result<bool, ApiError> {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping stale list response (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        match result {
            Ok(page) => {
                let (items, meta) = page.into_parts();
                log::debug!(
                    "List page {}/{}: {} rows",
                    meta.current_page,
                    meta.total_pages,
                    items.len()
                );
                self.items = items;
                self.meta = Some(meta);
                Ok(true)
            }
            Err(e) => {
                log::warn!("List fetch failed, keeping previous rows: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the current URL state from the source
    pub async fn refresh(&mut self) -> Result<bool, ApiError> {
        let ticket = self.begin_fetch();
        let result = self.source.list(ticket.query()).await;
        self.apply(ticket, result)
    }

    pub fn view(&self) -> ListView<'_, S::Item> {
        let empty = match self.meta {
            Some(meta) => meta.total_pages == 0 || self.items.is_empty(),
            None => false,
        };
        ListView {
            items: &self.items,
            pagination: self.meta.map(Pagination::from),
            empty_message: if empty { Some(EMPTY_MESSAGE) } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Pages through a fixed server-side list of names
    struct FakeSource {
        rows: Vec<&'static str>,
        fail: Mutex<bool>,
        calls: Mutex<Vec<ListQuery>>,
    }

    impl FakeSource {
        fn new(rows: Vec<&'static str>) -> Self {
            Self {
                rows,
                fail: Mutex::new(false),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn page_for(&self, query: &ListQuery) -> Page<String> {
            let mut rows: Vec<String> = self
                .rows
                .iter()
                .filter(|r| match &query.filter_query {
                    Some(q) => r.contains(q.as_str()),
                    None => true,
                })
                .map(|r| r.to_string())
                .collect();
            rows.sort();
            if query.sort_by == SortOrder::Desc {
                rows.reverse();
            }

            let size = query.page_size as usize;
            let total = rows.len();
            let total_pages = ((total + size - 1) / size) as u32;
            let start = (query.page_number as usize - 1) * size;
            let data = rows.into_iter().skip(start).take(size).collect();

            Page {
                data,
                current_page: query.page_number,
                page_size: query.page_size,
                total_count: total as u64,
                total_pages,
                has_previous_page: query.page_number > 1,
                has_next_page: query.page_number < total_pages,
            }
        }
    }

    #[async_trait]
    impl ListSource for FakeSource {
        type Item = String;

        async fn list(&self, query: &ListQuery) -> Result<Page<String>, ApiError> {
            self.calls.lock().unwrap().push(query.clone());
            if *self.fail.lock().unwrap() {
                return Err(ApiError::Status {
                    status: 503,
                    message: None,
                });
            }
            Ok(self.page_for(query))
        }
    }

    fn names() -> Vec<&'static str> {
        vec!["ada", "bob", "cy", "dee", "eve", "fay", "gus", "hal", "ivy", "jo", "kai", "lu"]
    }

    #[tokio::test]
    async fn test_defaults_and_first_fetch() {
        let mut list = ListController::new(FakeSource::new(names()), QueryParams::new());
        assert!(list.refresh().await.unwrap());

        let calls = list.source().calls.lock().unwrap().clone();
        assert_eq!(calls[0], ListQuery::default());

        let view = list.view();
        assert_eq!(view.items.len(), 10);
        let pagination = view.pagination.unwrap();
        assert_eq!(pagination.prev, None);
        assert_eq!(pagination.next, Some(2));
        assert!(view.empty_message.is_none());
    }

    #[tokio::test]
    async fn test_last_page_has_no_next_control() {
        let params = QueryParams::parse("pageNumber=2");
        let mut list = ListController::new(FakeSource::new(names()), params);
        list.refresh().await.unwrap();

        let pagination = list.view().pagination.unwrap();
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.prev, Some(1));
        assert_eq!(list.items(), &["kai".to_string(), "lu".to_string()]);
        assert!(!list.next_page());
    }

    #[tokio::test]
    async fn test_zero_pages_shows_empty_message() {
        let mut list = ListController::new(FakeSource::new(Vec::new()), QueryParams::new());
        assert!(list.view().empty_message.is_none());

        list.refresh().await.unwrap();
        let view = list.view();
        assert_eq!(view.pagination.unwrap().total_pages, 0);
        assert_eq!(view.empty_message, Some(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_controls_rewrite_url() {
        let params = QueryParams::parse("pageNumber=2&search=kept");
        let mut list = ListController::new(FakeSource::new(names()), params);

        assert!(list.set_filter("name", "a"));
        assert_eq!(list.params().get("pageNumber"), None);
        assert_eq!(list.params().get("search"), Some("kept"));
        assert_eq!(list.query().filter_query.as_deref(), Some("a"));

        assert!(list.set_sort(SortOrder::Desc));
        assert!(!list.set_sort(SortOrder::Desc));
        assert_eq!(list.params().get("sortBy"), Some("desc"));

        // empty filter removes the params instead of leaving `filterOn=`
        assert!(list.set_filter("", ""));
        assert!(!list.params().contains("filterOn"));
        assert!(!list.params().contains("filterQuery"));
    }

    #[tokio::test]
    async fn test_paging_uses_server_flags() {
        let mut list = ListController::new(FakeSource::new(names()), QueryParams::new());
        assert!(!list.next_page()); // nothing fetched yet

        list.refresh().await.unwrap();
        assert!(list.next_page());
        assert_eq!(list.params().get("pageNumber"), Some("2"));
        list.refresh().await.unwrap();
        assert!(list.prev_page());
        assert_eq!(list.query().page_number, 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_rows() {
        let mut list = ListController::new(FakeSource::new(names()), QueryParams::new());
        list.refresh().await.unwrap();
        let before = list.items().to_vec();

        *list.source().fail.lock().unwrap() = true;
        list.set_page(2);
        assert!(list.refresh().await.is_err());
        assert_eq!(list.items(), before.as_slice());
        assert_eq!(list.meta().unwrap().current_page, 1);
    }

    #[tokio::test]
    async fn test_stale_response_dropped() {
        let source = FakeSource::new(names());
        let mut list = ListController::new(source, QueryParams::new());

        let first = list.begin_fetch();
        let first_page = list.source().page_for(first.query());

        list.set_sort(SortOrder::Desc);
        let second = list.begin_fetch();
        let second_page = list.source().page_for(second.query());

        // the newer response lands first, the older one late
        assert!(list.apply(second, Ok(second_page)).unwrap());
        assert!(!list.apply(first, Ok(first_page)).unwrap());
        assert_eq!(list.items()[0], "lu");
    }

    #[tokio::test]
    async fn test_same_url_same_order() {
        let url = "pageNumber=1&pageSize=5&sortBy=desc&filterQuery=a";
        let mut a = ListController::new(FakeSource::new(names()), QueryParams::parse(url));
        let mut b = ListController::new(FakeSource::new(names()), QueryParams::parse(url));
        a.refresh().await.unwrap();
        b.refresh().await.unwrap();
        assert_eq!(a.items(), b.items());
        assert_eq!(a.query(), b.query());

        // navigating away and back reproduces the view
        a.set_page(2);
        a.replace_params(QueryParams::parse(url));
        a.refresh().await.unwrap();
        assert_eq!(a.items(), b.items());
    }
}
