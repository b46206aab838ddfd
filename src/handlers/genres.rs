use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::Genre;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::repository::{CrudRepository, GenreRepository, Page};
use crate::store::GraphStore;

use super::{ApiResult, PageQuery};

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenreResponse {
    pub id: i64,
    pub name: String,
}

fn render(genre: Genre) -> GenreResponse {
    GenreResponse {
        id: genre.id().expect("persisted genre has an id"),
        name: genre.name().to_string(),
    }
}

fn genre_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("genre {id} not found"))
}

/// GET /genres - paginated genre list
pub async fn list(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Page<GenreResponse>>> {
    let page = GenreRepository::new(store)
        .find_all(query.into_request())
        .await?;
    Ok(Json(page.map(render)))
}

/// GET /genres/:id - single genre or 404
pub async fn get(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<GenreResponse>> {
    let genre = GenreRepository::new(store)
        .find_by_id(id)
        .await?
        .ok_or_else(|| genre_not_found(id))?;
    Ok(Json(render(genre)))
}

/// POST /genres - create a genre
pub async fn create(
    Extension(store): Extension<GraphStore>,
    ApiJson(payload): ApiJson<GenreRequest>,
) -> ApiResult<(StatusCode, Json<GenreResponse>)> {
    let genre = Genre::new(payload.name.unwrap_or_default());
    let genre = GenreRepository::new(store).save(genre).await?;
    Ok((StatusCode::CREATED, Json(render(genre))))
}

/// PUT /genres/:id - replace the genre's attributes
pub async fn replace(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<GenreRequest>,
) -> ApiResult<Json<GenreResponse>> {
    let repository = GenreRepository::new(store);
    let mut genre = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| genre_not_found(id))?;
    genre.set_name(payload.name.unwrap_or_default());
    let genre = repository.save(genre).await?;
    Ok(Json(render(genre)))
}

/// DELETE /genres/:id - delete the genre and detach its edges
pub async fn delete(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    GenreRepository::new(store).delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /genres/search/by-name?name= - case-sensitive exact match
pub async fn search_by_name(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> ApiResult<Json<Vec<GenreResponse>>> {
    let genres = GenreRepository::new(store).find_by_name(&query.name).await?;
    Ok(Json(genres.into_iter().map(render).collect()))
}
