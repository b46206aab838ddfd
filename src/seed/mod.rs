use anyhow::Result;

use crate::domain::{Actor, Genre, Movie};
use crate::repository::{ActorRepository, CrudRepository, GenreRepository, MovieRepository};
use crate::store::GraphStore;

/// Loads data for demo.
///
/// Destructive: wipes all three collections before inserting the fixture
/// set, which is why it only ever runs behind an explicit opt-in and always
/// before the listener starts accepting traffic. Externally idempotent -
/// every run ends in the same fixture state.
pub struct DemoData {
    genres: GenreRepository,
    movies: MovieRepository,
    actors: ActorRepository,
}

impl DemoData {
    pub fn new(store: GraphStore) -> Self {
        Self {
            genres: GenreRepository::new(store.clone()),
            movies: MovieRepository::new(store.clone()),
            actors: ActorRepository::new(store),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // cleanup first
        self.genres.delete_all().await?;
        self.movies.delete_all().await?;
        self.actors.delete_all().await?;

        // add again
        let fantasy_fiction = self.genres.save(Genre::new("Fantasy Fiction")).await?;
        let adventure_fiction = self.genres.save(Genre::new("Adventure Fiction")).await?;

        let mut lord_of_the_rings = self.movies.save(Movie::new("Lord of the Rings")?).await?;
        lord_of_the_rings.add_genre(&fantasy_fiction)?;
        lord_of_the_rings.add_genre(&adventure_fiction)?;
        let mut lord_of_the_rings = self.movies.save(lord_of_the_rings).await?;

        let mut elijah_wood = self.actors.save(Actor::new("Elijah Wood")).await?;
        elijah_wood.acted_in(&mut lord_of_the_rings, "Frodo Baggins")?;
        self.actors.save(elijah_wood).await?;

        tracing::info!("demo data loaded: 2 genres, 1 movie, 1 actor");
        Ok(())
    }

    #[cfg(test)]
    async fn counts(&self) -> Result<(usize, usize, usize)> {
        use crate::repository::PageRequest;
        Ok((
            self.genres.find_all(PageRequest::default()).await?.total_elements,
            self.movies.find_all(PageRequest::default()).await?.total_elements,
            self.actors.find_all(PageRequest::default()).await?.total_elements,
        ))
    }
}
