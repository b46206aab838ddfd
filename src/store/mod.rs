use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{ActedIn, Actor, Genre, HasGenre, Movie};

/// Errors from the graph store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("edge references missing {kind} {id}")]
    DanglingEdge { kind: &'static str, id: i64 },
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: i64) -> Self {
        StoreError::NotFound { kind, id }
    }
}

/// Arena of nodes and edges. Nodes live in per-kind tables keyed by id;
/// edges live in global ordered sets keyed by their endpoint ids. Node edge
/// sets are reconstructed from the global tables on every read, which keeps
/// the two directions of a relationship consistent by construction.
#[derive(Debug, Default)]
struct GraphInner {
    next_id: i64,
    movies: HashMap<i64, String>,
    actors: HashMap<i64, String>,
    genres: HashMap<i64, String>,
    acted_in: BTreeSet<ActedIn>,
    has_genre: BTreeSet<HasGenre>,
}

impl GraphInner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn movie(&self, id: i64) -> Option<Movie> {
        let title = self.movies.get(&id)?;
        let roles = self
            .acted_in
            .iter()
            .filter(|edge| edge.movie_id == id)
            .cloned()
            .collect();
        let genres = self
            .has_genre
            .iter()
            .filter(|edge| edge.movie_id == id)
            .copied()
            .collect();
        Some(Movie::hydrate(id, title.clone(), roles, genres))
    }

    fn actor(&self, id: i64) -> Option<Actor> {
        let name = self.actors.get(&id)?;
        let roles = self
            .acted_in
            .iter()
            .filter(|edge| edge.actor_id == id)
            .cloned()
            .collect();
        Some(Actor::hydrate(id, name.clone(), roles))
    }

    fn genre(&self, id: i64) -> Option<Genre> {
        let name = self.genres.get(&id)?;
        Some(Genre::hydrate(id, name.clone()))
    }
}

/// Shared in-memory graph store. Cloning is cheap; all clones see the same
/// arena. Mutations hold the write lock for their full duration, which is
/// what makes each store call atomic.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    inner: Arc<RwLock<GraphInner>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- movies ----

    /// Upsert a movie and register its edges. Assigns an id on first save.
    pub async fn save_movie(&self, movie: Movie) -> Result<Movie, StoreError> {
        let mut graph = self.inner.write().await;
        let id = match movie.id() {
            Some(id) => id,
            None => graph.allocate_id(),
        };
        for edge in movie.roles() {
            if !graph.actors.contains_key(&edge.actor_id) {
                return Err(StoreError::DanglingEdge {
                    kind: "actor",
                    id: edge.actor_id,
                });
            }
        }
        for edge in movie.genres() {
            if !graph.genres.contains_key(&edge.genre_id) {
                return Err(StoreError::DanglingEdge {
                    kind: "genre",
                    id: edge.genre_id,
                });
            }
        }
        graph.movies.insert(id, movie.title().to_string());
        graph.acted_in.extend(movie.roles().iter().cloned());
        graph.has_genre.extend(movie.genres().iter().copied());
        Ok(graph.movie(id).expect("movie row just inserted"))
    }

    pub async fn movie(&self, id: i64) -> Option<Movie> {
        self.inner.read().await.movie(id)
    }

    pub async fn movies(&self) -> Vec<Movie> {
        let graph = self.inner.read().await;
        let mut ids: Vec<i64> = graph.movies.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| graph.movie(id))
            .collect()
    }

    /// Delete a movie and detach every edge that references it.
    pub async fn delete_movie(&self, id: i64) -> Result<(), StoreError> {
        let mut graph = self.inner.write().await;
        if graph.movies.remove(&id).is_none() {
            return Err(StoreError::not_found("movie", id));
        }
        graph.acted_in.retain(|edge| edge.movie_id != id);
        graph.has_genre.retain(|edge| edge.movie_id != id);
        Ok(())
    }

    pub async fn delete_all_movies(&self) {
        let mut graph = self.inner.write().await;
        let ids: HashSet<i64> = graph.movies.keys().copied().collect();
        graph.movies.clear();
        graph.acted_in.retain(|edge| !ids.contains(&edge.movie_id));
        graph.has_genre.retain(|edge| !ids.contains(&edge.movie_id));
    }

    // ---- actors ----

    pub async fn save_actor(&self, actor: Actor) -> Result<Actor, StoreError> {
        let mut graph = self.inner.write().await;
        let id = match actor.id() {
            Some(id) => id,
            None => graph.allocate_id(),
        };
        for edge in actor.roles() {
            if !graph.movies.contains_key(&edge.movie_id) {
                return Err(StoreError::DanglingEdge {
                    kind: "movie",
                    id: edge.movie_id,
                });
            }
        }
        graph.actors.insert(id, actor.name().to_string());
        graph.acted_in.extend(actor.roles().iter().cloned());
        Ok(graph.actor(id).expect("actor row just inserted"))
    }

    pub async fn actor(&self, id: i64) -> Option<Actor> {
        self.inner.read().await.actor(id)
    }

    pub async fn actors(&self) -> Vec<Actor> {
        let graph = self.inner.read().await;
        let mut ids: Vec<i64> = graph.actors.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| graph.actor(id))
            .collect()
    }

    pub async fn delete_actor(&self, id: i64) -> Result<(), StoreError> {
        let mut graph = self.inner.write().await;
        if graph.actors.remove(&id).is_none() {
            return Err(StoreError::not_found("actor", id));
        }
        graph.acted_in.retain(|edge| edge.actor_id != id);
        Ok(())
    }

    pub async fn delete_all_actors(&self) {
        let mut graph = self.inner.write().await;
        let ids: HashSet<i64> = graph.actors.keys().copied().collect();
        graph.actors.clear();
        graph.acted_in.retain(|edge| !ids.contains(&edge.actor_id));
    }

    // ---- genres ----

    pub async fn save_genre(&self, genre: Genre) -> Result<Genre, StoreError> {
        let mut graph = self.inner.write().await;
        let id = match genre.id() {
            Some(id) => id,
            None => graph.allocate_id(),
        };
        graph.genres.insert(id, genre.name().to_string());
        Ok(graph.genre(id).expect("genre row just inserted"))
    }

    pub async fn genre(&self, id: i64) -> Option<Genre> {
        self.inner.read().await.genre(id)
    }

    pub async fn genres(&self) -> Vec<Genre> {
        let graph = self.inner.read().await;
        let mut ids: Vec<i64> = graph.genres.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| graph.genre(id))
            .collect()
    }

    pub async fn delete_genre(&self, id: i64) -> Result<(), StoreError> {
        let mut graph = self.inner.write().await;
        if graph.genres.remove(&id).is_none() {
            return Err(StoreError::not_found("genre", id));
        }
        graph.has_genre.retain(|edge| edge.genre_id != id);
        Ok(())
    }

    pub async fn delete_all_genres(&self) {
        let mut graph = self.inner.write().await;
        let ids: HashSet<i64> = graph.genres.keys().copied().collect();
        graph.genres.clear();
        graph.has_genre.retain(|edge| !ids.contains(&edge.genre_id));
    }

    // ---- name lookups for response rendering ----

    pub async fn actor_name(&self, id: i64) -> Option<String> {
        self.inner.read().await.actors.get(&id).cloned()
    }

    pub async fn movie_title(&self, id: i64) -> Option<String> {
        self.inner.read().await.movies.get(&id).cloned()
    }

    pub async fn genre_name(&self, id: i64) -> Option<String> {
        self.inner.read().await.genres.get(&id).cloned()
    }
}
