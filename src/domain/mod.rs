use std::collections::BTreeSet;

use thiserror::Error;

/// A single field-level constraint violation, in the shape the error
/// translator reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub object_name: String,
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        object_name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by entity construction and edge wiring.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{0} must be saved before it can be linked")]
    Unsaved(&'static str),
}

/// Sort violations by field then message so identical inputs always produce
/// the same error list.
fn sorted(mut violations: Vec<FieldViolation>) -> Vec<FieldViolation> {
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    violations
}

/// ACTED_IN edge: an actor (start) played a role in a movie (end).
///
/// Edges reference their endpoints by id rather than holding the nodes
/// directly, matching how the store addresses data and avoiding reference
/// cycles between nodes and edges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActedIn {
    pub actor_id: i64,
    pub movie_id: i64,
    pub role: String,
}

/// HAS_GENRE edge: a movie (start) belongs to a genre (end). Carries no
/// attributes of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HasGenre {
    pub movie_id: i64,
    pub genre_id: i64,
}

/// A movie node. The title is never empty; construction enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    id: Option<i64>,
    title: String,
    roles: BTreeSet<ActedIn>,
    genres: BTreeSet<HasGenre>,
}

impl Movie {
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let violations = Self::validate_title(&title);
        if !violations.is_empty() {
            return Err(DomainError::Validation(sorted(violations)));
        }
        Ok(Self {
            id: None,
            title,
            roles: BTreeSet::new(),
            genres: BTreeSet::new(),
        })
    }

    fn validate_title(title: &str) -> Vec<FieldViolation> {
        if title.trim().is_empty() {
            vec![FieldViolation::new("movie", "title", "must not be empty")]
        } else {
            Vec::new()
        }
    }

    /// Rebuild a movie from stored rows and edges. Store-internal; the only
    /// way ids get attached to an entity.
    pub(crate) fn hydrate(
        id: i64,
        title: String,
        roles: BTreeSet<ActedIn>,
        genres: BTreeSet<HasGenre>,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            roles,
            genres,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title, subject to the same validation as construction.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into();
        let violations = Self::validate_title(&title);
        if !violations.is_empty() {
            return Err(DomainError::Validation(sorted(violations)));
        }
        self.title = title;
        Ok(())
    }

    pub fn roles(&self) -> &BTreeSet<ActedIn> {
        &self.roles
    }

    pub fn genres(&self) -> &BTreeSet<HasGenre> {
        &self.genres
    }

    /// Wire a HAS_GENRE edge from this movie to `genre`. Both endpoints must
    /// have been saved so the edge can record their ids. Re-adding the same
    /// genre collapses into the existing edge.
    pub fn add_genre(&mut self, genre: &Genre) -> Result<(), DomainError> {
        let movie_id = self.id.ok_or(DomainError::Unsaved("movie"))?;
        let genre_id = genre.id().ok_or(DomainError::Unsaved("genre"))?;
        self.genres.insert(HasGenre { movie_id, genre_id });
        Ok(())
    }

    pub(crate) fn add_role(&mut self, edge: ActedIn) {
        self.roles.insert(edge);
    }
}

/// An actor node with its outgoing ACTED_IN edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: Option<i64>,
    name: String,
    roles: BTreeSet<ActedIn>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            roles: BTreeSet::new(),
        }
    }

    pub(crate) fn hydrate(id: i64, name: String, roles: BTreeSet<ActedIn>) -> Self {
        Self {
            id: Some(id),
            name,
            roles,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn roles(&self) -> &BTreeSet<ActedIn> {
        &self.roles
    }

    /// Wire an ACTED_IN edge between this actor and `movie`, registering it
    /// on both endpoints so the two sides stay consistent. Duplicate
    /// (actor, movie, role) triples collapse; distinct roles for the same
    /// pair are kept as separate edges.
    pub fn acted_in(
        &mut self,
        movie: &mut Movie,
        role: impl Into<String>,
    ) -> Result<(), DomainError> {
        let actor_id = self.id.ok_or(DomainError::Unsaved("actor"))?;
        let movie_id = movie.id().ok_or(DomainError::Unsaved("movie"))?;
        let edge = ActedIn {
            actor_id,
            movie_id,
            role: role.into(),
        };
        self.roles.insert(edge.clone());
        movie.add_role(edge);
        Ok(())
    }
}

/// A genre node. Genres have no outgoing edges of their own; movies point at
/// them via HAS_GENRE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    id: Option<i64>,
    name: String,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub(crate) fn hydrate(id: i64, name: String) -> Self {
        Self { id: Some(id), name }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
