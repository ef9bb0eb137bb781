use database::services::common::{Page, PageRequest, SortDirection};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_page() -> u64 {
    0
}

fn default_size() -> u64 {
    20
}

/// Paging and ordering of a list endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number, starting at 0
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    /// Field to sort by; unknown names fall back to the default order
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_dir: Option<String>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size).sorted(
            self.sort_by.clone(),
            SortDirection::from_param(self.sort_dir.as_deref()),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive text to look for
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

impl SearchParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LookupParams {
    pub internal_id: String,
    pub year: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>, convert: impl FnMut(U) -> T) -> Self {
        let total_pages = page.total_pages();
        let pagination = PaginationMeta {
            page: page.page,
            size: page.size,
            total_pages,
            total_items: page.total_items,
            has_next: page.page.saturating_add(1) < total_pages,
            has_prev: page.page > 0,
        };

        Self {
            items: page.map(convert).items,
            pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let request = PageRequest::new(1, 10);
        let page = Page::new(vec![1, 2, 3], 23, &request);

        let response = PageResponse::from_page(page, |n| n * 10);
        assert_eq!(response.items, vec![10, 20, 30]);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_next);
        assert!(response.pagination.has_prev);
    }

    #[test]
    fn test_pagination_meta_past_the_end() {
        let page: Page<u32> = Page {
            items: Vec::new(),
            page: u64::MAX,
            size: 20,
            total_items: 5,
        };

        let response = PageResponse::from_page(page, |n| n);
        assert_eq!(response.pagination.total_pages, 1);
        assert!(!response.pagination.has_next);
        assert!(response.pagination.has_prev);
    }

    #[test]
    fn test_list_params_sorting() {
        let params = ListParams {
            page: 2,
            size: 5,
            sort_by: Some("createdAt".into()),
            sort_dir: Some("DESC".into()),
        };
        let request = params.page_request();
        assert_eq!(request.page, 2);
        assert_eq!(request.sort_by.as_deref(), Some("createdAt"));
        assert_eq!(request.direction, SortDirection::Desc);
    }
}
