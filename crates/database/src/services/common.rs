use chrono::{NaiveDateTime, Utc};
use models::text::non_blank;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, Select,
    sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Largest page a caller may ask for
pub const MAX_PAGE_SIZE: u64 = 200;

/// Current wall-clock time, as stored in audit and date columns
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything but a case-insensitive "desc" sorts ascending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Zero-based page selection plus optional ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_by: Option<String>,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Clamps `size` and caps `page` so the SQL offset fits in an `i64`
    pub fn new(page: u64, size: u64) -> Self {
        let size = size.clamp(1, MAX_PAGE_SIZE);

        Self {
            page: page.min(i64::MAX as u64 / size - 1),
            size,
            sort_by: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn sorted(mut self, sort_by: Option<String>, direction: SortDirection) -> Self {
        self.sort_by = non_blank(sort_by);
        self.direction = direction;
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: &PageRequest) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
        }
    }
}

/// Runs a count and then fetches the requested page of `query`
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    request: &PageRequest,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let total_items = query.clone().count(db).await?;
    let items = query.paginate(db, request.size).fetch_page(request.page).await?;

    Ok(Page::new(items, total_items, request))
}

const LIKE_ESCAPE: char = '!';

/// `LIKE` pattern for a case-insensitive "contains" search. Wildcards in the
/// query match literally.
pub fn search_pattern(query: &str) -> String {
    let mut pattern = String::from("%");
    for c in query.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(column) LIKE pattern ESCAPE '!'`
pub fn lower_like<C: IntoColumnRef>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Trimmed text, or a missing-field error naming `field`
pub fn require_text(value: Option<String>, field: &'static str) -> ServiceResult<String> {
    non_blank(value).ok_or(ServiceError::MissingField(field))
}

pub fn require_id(value: Option<Uuid>, field: &'static str) -> ServiceResult<Uuid> {
    value.ok_or(ServiceError::MissingField(field))
}

/// Amounts may be absent but never negative
pub fn check_non_negative(value: Option<f64>, field: &'static str) -> ServiceResult<()> {
    match value {
        Some(amount) if amount < 0.0 || amount.is_nan() => Err(ServiceError::Validation(
            format!("{field} must be greater than or equal to 0"),
        )),
        _ => Ok(()),
    }
}
