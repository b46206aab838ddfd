use async_trait::async_trait;

use crate::domain::Movie;
use crate::store::{GraphStore, StoreError};

use super::{CrudRepository, Page, PageRequest, Sort};

/// Data access for movie nodes, including the title search queries.
#[derive(Clone)]
pub struct MovieRepository {
    store: GraphStore,
}

impl MovieRepository {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    /// Case-sensitive exact title match.
    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Movie>, StoreError> {
        Ok(self
            .store
            .movies()
            .await
            .into_iter()
            .filter(|movie| movie.title() == title)
            .collect())
    }

    /// Case-insensitive substring match over the title. The fragment is
    /// compared as plain data, never interpreted, so any input is safe; an
    /// empty fragment matches every movie.
    pub async fn find_by_title_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Movie>, StoreError> {
        let fragment = fragment.to_lowercase();
        Ok(self
            .store
            .movies()
            .await
            .into_iter()
            .filter(|movie| movie.title().to_lowercase().contains(&fragment))
            .collect())
    }

    fn order(movies: &mut [Movie], sort: Option<&Sort>) {
        let Some(sort) = sort else {
            return; // store iteration order is already ascending by id
        };
        match sort.field.as_str() {
            "title" => movies.sort_by(|a, b| sort.apply(a.title().cmp(b.title()))),
            _ => movies.sort_by(|a, b| sort.apply(a.id().cmp(&b.id()))),
        }
    }
}

#[async_trait]
impl CrudRepository<Movie> for MovieRepository {
    async fn find_all(&self, request: PageRequest) -> Result<Page<Movie>, StoreError> {
        let mut movies = self.store.movies().await;
        Self::order(&mut movies, request.sort.as_ref());
        Ok(Page::from_vec(movies, &request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        Ok(self.store.movie(id).await)
    }

    async fn save(&self, entity: Movie) -> Result<Movie, StoreError> {
        self.store.save_movie(entity).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_movie(id).await
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.store.delete_all_movies().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::Direction;

    async fn repository_with(titles: &[&str]) -> MovieRepository {
        let repository = MovieRepository::new(GraphStore::new());
        for title in titles {
            repository.save(Movie::new(*title).unwrap()).await.unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn round_trips_by_id() {
        let repository = repository_with(&[]).await;
        let saved = repository
            .save(Movie::new("Lord of the Rings").unwrap())
            .await
            .unwrap();
        let fetched = repository
            .find_by_id(saved.id().unwrap())
            .await
            .unwrap()
            .expect("saved movie should be found");
        assert_eq!(fetched.title(), "Lord of the Rings");
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn title_search_is_case_insensitive() {
        let repository = repository_with(&["Lord of the Rings"]).await;

        let hits = repository.find_by_title_containing("ring").await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = repository.find_by_title_containing("RING").await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = repository.find_by_title_containing("Hobbit").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn empty_fragment_matches_everything() {
        let repository = repository_with(&["Lord of the Rings", "The Hobbit"]).await;
        let hits = repository.find_by_title_containing("").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn exact_title_match_is_case_sensitive() {
        let repository = repository_with(&["Lord of the Rings"]).await;
        assert_eq!(
            repository.find_by_title("Lord of the Rings").await.unwrap().len(),
            1
        );
        assert!(repository
            .find_by_title("lord of the rings")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn find_all_sorts_by_title_descending() {
        let repository = repository_with(&["Alpha", "Gamma", "Beta"]).await;
        let request = PageRequest {
            page: 0,
            size: None,
            sort: Some(Sort {
                field: "title".to_string(),
                direction: Direction::Desc,
            }),
        };
        let page = repository.find_all(request).await.unwrap();
        let titles: Vec<&str> = page.content.iter().map(Movie::title).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn unknown_sort_field_falls_back_to_id_order() {
        let repository = repository_with(&["B", "A"]).await;
        let request = PageRequest {
            page: 0,
            size: None,
            sort: Some(Sort::parse("release_year")),
        };
        let page = repository.find_all(request).await.unwrap();
        let titles: Vec<&str> = page.content.iter().map(Movie::title).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn delete_by_id_removes_the_movie() {
        let repository = repository_with(&[]).await;
        let saved = repository
            .save(Movie::new("Lord of the Rings").unwrap())
            .await
            .unwrap();
        let id = saved.id().unwrap();
        repository.delete_by_id(id).await.unwrap();
        assert!(repository.find_by_id(id).await.unwrap().is_none());
        assert!(matches!(
            repository.delete_by_id(id).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
