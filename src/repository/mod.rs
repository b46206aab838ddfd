use async_trait::async_trait;
use serde::Serialize;

use crate::store::StoreError;

mod actors;
mod genres;
mod movies;

pub use actors::ActorRepository;
pub use genres::GenreRepository;
pub use movies::MovieRepository;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A sort instruction parsed from a `sort=field` or `sort=field,desc` query
/// parameter.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim().to_string();
        let direction = match parts.next().map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            _ => Direction::Asc,
        };
        Sort { field, direction }
    }

    /// Apply the direction to an ascending comparison result.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// 0-based page index.
    pub page: usize,
    pub size: Option<usize>,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size: Some(size),
            sort: None,
        }
    }
}

/// One page of results plus the counters clients need to walk the rest.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice an already-sorted result set down to the requested page.
    pub fn from_vec(items: Vec<T>, request: &PageRequest) -> Self {
        let size = request
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(size);
        let content = items
            .into_iter()
            .skip(request.page.saturating_mul(size))
            .take(size)
            .collect();
        Page {
            content,
            number: request.page,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Standard data-access port shared by all three entity repositories.
#[async_trait]
pub trait CrudRepository<T> {
    async fn find_all(&self, request: PageRequest) -> Result<Page<T>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, StoreError>;
    /// Save the entity, assigning an id on first save.
    async fn save(&self, entity: T) -> Result<T, StoreError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;
    async fn delete_all(&self) -> Result<(), StoreError>;
}
