// ── Entity list controller ──
//
// Pagination and sort state for one list view, mirrored into a location
// query string (`?page=2&sort=name,desc`) so a view can be restored from
// its address.

use std::sync::Arc;

use officely_api::{Direction, Page, PageRequest, Sort};

use crate::error::CoreError;
use crate::model::Entity;
use crate::service::{EntityService, ListQuery, ListScope};
use crate::store::EntityState;

/// Default rows per page.
pub const ITEMS_PER_PAGE: u32 = 20;

const DEFAULT_SORT: &str = "id";

/// `ceil(total / size)`. Zero rows means zero pages.
pub fn total_pages(total: u64, size: u32) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size))
}

/// What the list view shows: page (1-based), size and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub active_page: u32,
    pub items_per_page: u32,
    pub sort: String,
    pub order: Direction,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            active_page: 1,
            items_per_page: ITEMS_PER_PAGE,
            sort: DEFAULT_SORT.into(),
            order: Direction::Asc,
        }
    }
}

impl PaginationState {
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.items_per_page = size.max(1);
        self
    }

    /// Clicking the active column flips its direction; any other column
    /// becomes the sort key, ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort == field {
            self.order = self.order.flipped();
        } else {
            field.clone_into(&mut self.sort);
            self.order = Direction::Asc;
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.active_page = page.max(1);
    }

    pub fn sort_param(&self) -> Sort {
        Sort {
            field: self.sort.clone(),
            direction: self.order,
        }
    }

    /// The wire request for the active page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.active_page.saturating_sub(1),
            self.items_per_page,
            Some(self.sort_param()),
        )
    }

    pub fn to_location(&self) -> String {
        format!("?page={}&sort={}", self.active_page, self.sort_param())
    }

    /// Parse a location query. Missing or malformed parameters keep their
    /// defaults; a leading `?` is optional.
    pub fn from_location(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        state.set_page(page);
                    }
                }
                "sort" => {
                    if let Ok(sort) = value.parse::<Sort>() {
                        state.sort = sort.field;
                        state.order = sort.direction;
                    }
                }
                _ => {}
            }
        }
        state
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.items_per_page)
    }

    pub fn has_next_page(&self, total: u64) -> bool {
        u64::from(self.active_page) < self.total_pages(total)
    }

    pub fn has_previous_page(&self) -> bool {
        self.active_page > 1
    }
}

/// Drives list reads for one entity type from a [`PaginationState`].
pub struct ListController<T: Entity> {
    service: Arc<EntityService<T>>,
    state: PaginationState,
    scope: ListScope,
}

impl<T: Entity> ListController<T> {
    pub fn new(service: Arc<EntityService<T>>) -> Self {
        Self {
            service,
            state: PaginationState::default(),
            scope: ListScope::All,
        }
    }

    /// Restore from a location query (`?page=3&sort=name,desc`).
    pub fn at_location(service: Arc<EntityService<T>>, query: &str) -> Self {
        Self {
            service,
            state: PaginationState::from_location(query),
            scope: ListScope::All,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: PaginationState) -> Self {
        self.state = state;
        self
    }

    /// Show the caller's own records instead of the whole collection.
    #[must_use]
    pub fn own(mut self) -> Self {
        self.scope = ListScope::Own;
        self
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.state
    }

    pub fn entities(&self) -> Arc<EntityState<T>> {
        self.service.state()
    }

    /// `/{kind}?page=N&sort=field,dir`
    pub fn location(&self) -> String {
        format!("/{}{}", T::KIND, self.state.to_location())
    }

    /// Issue the read for the current state.
    pub async fn mount(&mut self) -> Result<Page<T>, CoreError> {
        self.fetch().await
    }

    pub async fn toggle_sort(&mut self, field: &str) -> Result<Page<T>, CoreError> {
        self.state.toggle_sort(field);
        self.fetch().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<Page<T>, CoreError> {
        self.state.set_page(page);
        self.fetch().await
    }

    /// Back to page one and re-read.
    pub async fn refresh(&mut self) -> Result<Page<T>, CoreError> {
        self.state.set_page(1);
        self.fetch().await
    }

    pub fn total_pages(&self) -> u64 {
        self.state.total_pages(self.service.state().total_items)
    }

    pub fn has_next_page(&self) -> bool {
        self.state.has_next_page(self.service.state().total_items)
    }

    pub fn has_previous_page(&self) -> bool {
        self.state.has_previous_page()
    }

    async fn fetch(&self) -> Result<Page<T>, CoreError> {
        self.service
            .run_list(ListQuery {
                scope: self.scope,
                request: self.state.page_request(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toggling_sort() {
        let mut state = PaginationState::default();
        state.toggle_sort("id");
        assert_eq!(state.order, Direction::Desc);
        state.toggle_sort("id");
        assert_eq!(state.order, Direction::Asc);

        state.toggle_sort("id");
        state.toggle_sort("name");
        assert_eq!(state.sort, "name");
        assert_eq!(state.order, Direction::Asc);
    }

    #[test]
    fn location_round_trip() {
        let mut state = PaginationState::default();
        state.set_page(3);
        state.toggle_sort("startTime");
        state.toggle_sort("startTime");
        let location = state.to_location();
        assert_eq!(location, "?page=3&sort=startTime,desc");
        assert_eq!(PaginationState::from_location(&location), state);
    }

    #[test]
    fn malformed_location_falls_back() {
        let state = PaginationState::from_location("page=abc&sort=,desc&foo=bar");
        assert_eq!(state, PaginationState::default());

        let state = PaginationState::from_location("page=0&sort=name");
        assert_eq!(state.active_page, 1);
        assert_eq!(state.sort, "name");
        assert_eq!(state.order, Direction::Asc);
    }

    #[test]
    fn page_request_is_zero_based() {
        let mut state = PaginationState::default();
        state.set_page(2);
        let request = state.page_request();
        assert_eq!(request.page, 1);
        assert_eq!(request.size, 20);
        assert_eq!(request.sort, Some(Sort::asc("id")));
    }

    #[test]
    fn page_arithmetic() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(5, 0), 0);

        let mut state = PaginationState::default();
        assert!(state.has_next_page(45));
        assert!(!state.has_previous_page());
        state.set_page(3);
        assert!(!state.has_next_page(45));
        assert!(state.has_previous_page());
    }
}
