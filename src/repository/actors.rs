use async_trait::async_trait;

use crate::domain::Actor;
use crate::store::{GraphStore, StoreError};

use super::{CrudRepository, Page, PageRequest, Sort};

/// Data access for actor nodes.
#[derive(Clone)]
pub struct ActorRepository {
    store: GraphStore,
}

impl ActorRepository {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    fn order(actors: &mut [Actor], sort: Option<&Sort>) {
        let Some(sort) = sort else {
            return;
        };
        match sort.field.as_str() {
            "name" => actors.sort_by(|a, b| sort.apply(a.name().cmp(b.name()))),
            _ => actors.sort_by(|a, b| sort.apply(a.id().cmp(&b.id()))),
        }
    }
}

#[async_trait]
impl CrudRepository<Actor> for ActorRepository {
    async fn find_all(&self, request: PageRequest) -> Result<Page<Actor>, StoreError> {
        let mut actors = self.store.actors().await;
        Self::order(&mut actors, request.sort.as_ref());
        Ok(Page::from_vec(actors, &request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Actor>, StoreError> {
        Ok(self.store.actor(id).await)
    }

    async fn save(&self, entity: Actor) -> Result<Actor, StoreError> {
        self.store.save_actor(entity).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_actor(id).await
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.store.delete_all_actors().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::Movie;
    use crate::repository::{CrudRepository, MovieRepository};

    #[tokio::test]
    async fn acted_in_is_visible_from_both_repositories() {
        let store = GraphStore::new();
        let actors = ActorRepository::new(store.clone());
        let movies = MovieRepository::new(store);

        let mut movie = movies
            .save(Movie::new("Lord of the Rings").unwrap())
            .await
            .unwrap();
        let mut actor = actors.save(Actor::new("Elijah Wood")).await.unwrap();
        actor.acted_in(&mut movie, "Frodo Baggins").unwrap();
        let actor = actors.save(actor).await.unwrap();

        let movie = movies
            .find_by_id(movie.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(movie.roles().len(), 1);
        assert_eq!(
            movie.roles().iter().next().unwrap().actor_id,
            actor.id().unwrap()
        );

        let actor = actors
            .find_by_id(actor.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            actor.roles().iter().next().unwrap().movie_id,
            movie.id().unwrap()
        );
    }

    #[tokio::test]
    async fn delete_all_leaves_no_actors() {
        let actors = ActorRepository::new(GraphStore::new());
        actors.save(Actor::new("Elijah Wood")).await.unwrap();
        actors.save(Actor::new("Ian McKellen")).await.unwrap();
        actors.delete_all().await.unwrap();
        let page = actors.find_all(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_elements, 0);
    }
}
