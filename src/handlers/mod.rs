use serde::Deserialize;

use crate::error::ApiError;
use crate::repository::{PageRequest, Sort};

pub mod actors;
pub mod actuator;
pub mod genres;
pub mod movies;
pub mod security;

pub type ApiResult<T> = Result<T, ApiError>;

/// Standard pagination query parameters shared by every collection endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn into_request(self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(0),
            size: self.size,
            sort: self.sort.as_deref().map(Sort::parse),
        }
    }
}
