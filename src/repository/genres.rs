use async_trait::async_trait;

use crate::domain::Genre;
use crate::store::{GraphStore, StoreError};

use super::{CrudRepository, Page, PageRequest, Sort};

/// Data access for genre nodes, including the exact-name lookup.
#[derive(Clone)]
pub struct GenreRepository {
    store: GraphStore,
}

impl GenreRepository {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    /// Case-sensitive exact name match.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Genre>, StoreError> {
        Ok(self
            .store
            .genres()
            .await
            .into_iter()
            .filter(|genre| genre.name() == name)
            .collect())
    }

    fn order(genres: &mut [Genre], sort: Option<&Sort>) {
        let Some(sort) = sort else {
            return;
        };
        match sort.field.as_str() {
            "name" => genres.sort_by(|a, b| sort.apply(a.name().cmp(b.name()))),
            _ => genres.sort_by(|a, b| sort.apply(a.id().cmp(&b.id()))),
        }
    }
}

#[async_trait]
impl CrudRepository<Genre> for GenreRepository {
    async fn find_all(&self, request: PageRequest) -> Result<Page<Genre>, StoreError> {
        let mut genres = self.store.genres().await;
        Self::order(&mut genres, request.sort.as_ref());
        Ok(Page::from_vec(genres, &request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Genre>, StoreError> {
        Ok(self.store.genre(id).await)
    }

    async fn save(&self, entity: Genre) -> Result<Genre, StoreError> {
        self.store.save_genre(entity).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_genre(id).await
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.store.delete_all_genres().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn name_lookup_is_exact_and_case_sensitive() {
        let genres = GenreRepository::new(GraphStore::new());
        genres.save(Genre::new("Fantasy Fiction")).await.unwrap();
        genres.save(Genre::new("Adventure Fiction")).await.unwrap();

        let hits = genres.find_by_name("Fantasy Fiction").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(genres.find_by_name("fantasy fiction").await.unwrap().is_empty());
        assert!(genres.find_by_name("Fantasy").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pagination_walks_the_full_set() {
        let genres = GenreRepository::new(GraphStore::new());
        for name in ["Action", "Comedy", "Drama"] {
            genres.save(Genre::new(name)).await.unwrap();
        }

        let first = genres.find_all(PageRequest::of(0, 2)).await.unwrap();
        assert_eq!(first.content.len(), 2);
        assert_eq!(first.total_elements, 3);
        assert_eq!(first.total_pages, 2);

        let second = genres.find_all(PageRequest::of(1, 2)).await.unwrap();
        assert_eq!(second.content.len(), 1);
    }

    #[tokio::test]
    async fn sorts_by_name_descending() {
        let genres = GenreRepository::new(GraphStore::new());
        for name in ["Action", "Comedy", "Drama"] {
            genres.save(Genre::new(name)).await.unwrap();
        }
        let request = PageRequest {
            page: 0,
            size: None,
            sort: Some(Sort::parse("name,desc")),
        };
        let page = genres.find_all(request).await.unwrap();
        let names: Vec<&str> = page.content.iter().map(Genre::name).collect();
        assert_eq!(names, vec!["Drama", "Comedy", "Action"]);
    }
}
