use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::Actor;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::repository::{ActorRepository, CrudRepository, MovieRepository, Page};
use crate::store::GraphStore;

use super::{ApiResult, PageQuery};

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRoleRequest {
    pub movie_id: i64,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: i64,
    pub name: String,
    pub roles: Vec<RoleSummary>,
}

/// One outgoing ACTED_IN edge, with the movie endpoint resolved to a title.
#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub movie_id: i64,
    pub movie_title: String,
    pub role: String,
}

async fn render(store: &GraphStore, actor: Actor) -> ActorResponse {
    let mut roles = Vec::with_capacity(actor.roles().len());
    for edge in actor.roles() {
        if let Some(movie_title) = store.movie_title(edge.movie_id).await {
            roles.push(RoleSummary {
                movie_id: edge.movie_id,
                movie_title,
                role: edge.role.clone(),
            });
        }
    }
    ActorResponse {
        id: actor.id().expect("persisted actor has an id"),
        name: actor.name().to_string(),
        roles,
    }
}

fn actor_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("actor {id} not found"))
}

/// GET /actors - paginated actor list
pub async fn list(
    Extension(store): Extension<GraphStore>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Page<ActorResponse>>> {
    let page = ActorRepository::new(store.clone())
        .find_all(query.into_request())
        .await?;
    let Page {
        content,
        number,
        size,
        total_elements,
        total_pages,
    } = page;
    let mut rendered = Vec::with_capacity(content.len());
    for actor in content {
        rendered.push(render(&store, actor).await);
    }
    Ok(Json(Page {
        content: rendered,
        number,
        size,
        total_elements,
        total_pages,
    }))
}

/// GET /actors/:id - single actor or 404
pub async fn get(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ActorResponse>> {
    let actor = ActorRepository::new(store.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| actor_not_found(id))?;
    Ok(Json(render(&store, actor).await))
}

/// POST /actors - create an actor
pub async fn create(
    Extension(store): Extension<GraphStore>,
    ApiJson(payload): ApiJson<ActorRequest>,
) -> ApiResult<(StatusCode, Json<ActorResponse>)> {
    let actor = Actor::new(payload.name.unwrap_or_default());
    let actor = ActorRepository::new(store.clone()).save(actor).await?;
    Ok((StatusCode::CREATED, Json(render(&store, actor).await)))
}

/// PUT /actors/:id - replace the actor's attributes, keeping id and edges
pub async fn replace(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ActorRequest>,
) -> ApiResult<Json<ActorResponse>> {
    let repository = ActorRepository::new(store.clone());
    let mut actor = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| actor_not_found(id))?;
    actor.set_name(payload.name.unwrap_or_default());
    let actor = repository.save(actor).await?;
    Ok(Json(render(&store, actor).await))
}

/// DELETE /actors/:id - delete the actor and detach its edges
pub async fn delete(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    ActorRepository::new(store).delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /actors/:id/roles - wire an ACTED_IN edge to an existing movie
pub async fn add_role(
    Extension(store): Extension<GraphStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AddRoleRequest>,
) -> ApiResult<(StatusCode, Json<ActorResponse>)> {
    let actors = ActorRepository::new(store.clone());
    let movies = MovieRepository::new(store.clone());

    let mut actor = actors
        .find_by_id(id)
        .await?
        .ok_or_else(|| actor_not_found(id))?;
    let mut movie = movies
        .find_by_id(payload.movie_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("movie {} not found", payload.movie_id)))?;

    actor.acted_in(&mut movie, payload.role)?;
    // The edge carries both endpoint ids; saving the actor persists it once,
    // globally, so the movie side sees it too.
    let actor = actors.save(actor).await?;
    Ok((StatusCode::CREATED, Json(render(&store, actor).await)))
}
