use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::Movie;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::repository::{CrudRepository, GenreRepository, MovieRepository, Page};
use crate::store::GraphStore;

use super::{ApiResult, PageQuery};

#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddGenreRequest {
    pub genre_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub roles: Vec<RoleSummary>,
    pub genres: Vec<GenreSummary>,
}

/// One incoming ACTED_IN edge, with the actor endpoint resolved to a name.
#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub actor_id: i64,
    pub actor_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct GenreSummary {
    pub id: i64,
    pub name: String,
}

async fn render(store: &GraphStore, movie: Movie) -> MovieResponse {
    let mut roles = Vec::with_capacity(movie.roles().len());
    for edge in movie.roles() {
        if let Some(actor_name) = store.actor_name(edge.actor_id).await {
            roles.push(RoleSummary {
                actor_id: edge.actor_id,
                actor_name,
                role: edge.role.clone(),
            });
        }
    }
    let mut genres = Vec::with_capacity(movie.genres().len());
    for edge in movie.genres() {
        if let Some(name) = store.genre_name(edge.genre_id).await {
            genres.push(GenreSummary {
                id: edge.genre_id,
                name,
            });
        }
    }
    MovieResponse {
        id: movie.id().expect("persisted movie has an id"),
        title: movie.title().to_string(),
        roles,
        genres,
    }
}

async fn render_all(store: &GraphStore, movies: Vec<Movie>) -> Vec<MovieResponse> {
    let mut rendered = Vec::with_capacity(movies.len());
    for movie in movies {
        rendered.push(render(store, movie).await);
    }
    rendered
}

fn movie_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("movie {id} not found"))
}

/// GET /movies - paginated movie list
pub async fn list(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Page<MovieResponse>>> {
    let page = MovieRepository::new(store.clone())
        .find_all(query.into_request())
        .await?;
    let Page {
        content,
        number,
        size,
        total_elements,
        total_pages,
    } = page;
    Ok(Json(Page {
        content: render_all(&store, content).await,
        number,
        size,
        total_elements,
        total_pages,
    }))
}

/// GET /movies/:id - single movie or 404
pub async fn get(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MovieResponse>> {
    let movie = MovieRepository::new(store.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| movie_not_found(id))?;
    Ok(Json(render(&store, movie).await))
}

/// POST /movies - create a movie; title is validated before anything is saved
pub async fn create(
    Extension(store): Extension<GraphStore>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let movie = Movie::new(payload.title.unwrap_or_default())?;
    let movie = MovieRepository::new(store.clone()).save(movie).await?;
    Ok((StatusCode::CREATED, Json(render(&store, movie).await)))
}

/// PUT /movies/:id - replace the movie's attributes, keeping id and edges
pub async fn replace(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> ApiResult<Json<MovieResponse>> {
    let repository = MovieRepository::new(store.clone());
    let mut movie = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| movie_not_found(id))?;
    movie.set_title(payload.title.unwrap_or_default())?;
    let movie = repository.save(movie).await?;
    Ok(Json(render(&store, movie).await))
}

/// DELETE /movies/:id - delete the movie and detach its edges
pub async fn delete(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    MovieRepository::new(store).delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /movies/:id/genres - wire a HAS_GENRE edge to an existing genre
pub async fn add_genre(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AddGenreRequest>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let movies = MovieRepository::new(store.clone());
    let genres = GenreRepository::new(store.clone());

    let mut movie = movies
        .find_by_id(id)
        .await?
        .ok_or_else(|| movie_not_found(id))?;
    let genre = genres
        .find_by_id(payload.genre_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("genre {} not found", payload.genre_id)))?;

    movie.add_genre(&genre)?;
    let movie = movies.save(movie).await?;
    Ok((StatusCode::CREATED, Json(render(&store, movie).await)))
}

/// GET /movies/search/by-title?title= - case-sensitive exact match
pub async fn search_by_title(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<TitleQuery>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let movies = MovieRepository::new(store.clone())
        .find_by_title(&query.title)
        .await?;
    Ok(Json(render_all(&store, movies).await))
}

/// GET /movies/search/title-contains?title= - case-insensitive substring match
pub async fn search_title_contains(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<TitleQuery>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let movies = MovieRepository::new(store.clone())
        .find_by_title_containing(&query.title)
        .await?;
    Ok(Json(render_all(&store, movies).await))
}
