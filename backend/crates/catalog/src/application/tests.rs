//! Use-case tests over in-memory repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Utc};
use kernel::error::kind::ErrorKind;
use kernel::page::PageParams;

use crate::application::config::CatalogConfig;
use crate::application::{TaxonomyUseCase, TitleUseCase};
use crate::domain::entities::{Category, Genre, Title};
use crate::domain::repository::{
    NewTitle, TaxonomyRepository, TitleFilter, TitlePatch, TitleRepository,
};
use crate::domain::value_objects::Slug;
use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Default)]
struct InMemoryCatalog {
    categories: Arc<Mutex<Vec<Category>>>,
    genres: Arc<Mutex<Vec<Genre>>>,
    titles: Arc<Mutex<Vec<Title>>>,
    scores: Arc<Mutex<HashMap<i64, Vec<i16>>>>,
}

impl InMemoryCatalog {
    fn add_score(&self, title_id: i64, score: i16) {
        self.scores
            .lock()
            .unwrap()
            .entry(title_id)
            .or_default()
            .push(score);
    }

    /// Mean of stored scores, like AVG(reviews.score) in the SQL listing.
    fn rated(&self, title: &Title) -> Title {
        let scores = self.scores.lock().unwrap();
        let rating = scores.get(&title.title_id).map(|scores| {
            scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64
        });
        Title {
            rating,
            ..title.clone()
        }
    }
}

impl TaxonomyRepository for InMemoryCatalog {
    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| matches_search(&c.name, search))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_categories(&self, search: Option<&str>) -> CatalogResult<i64> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| matches_search(&c.name, search))
            .count() as i64)
    }

    async fn create_category(&self, name: &str, slug: &str) -> CatalogResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug.as_str() == slug) {
            return Err(CatalogError::SlugTaken);
        }
        let category = Category {
            category_id: categories.len() as i64 + 1,
            name: name.to_string(),
            slug: Slug::from_db(slug.to_string()),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, slug: &str) -> CatalogResult<()> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.slug.as_str() != slug);
        if categories.len() == before {
            return Err(CatalogError::CategoryNotFound);
        }
        Ok(())
    }

    async fn list_genres(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Genre>> {
        let genres = self.genres.lock().unwrap();
        Ok(genres
            .iter()
            .filter(|g| matches_search(&g.name, search))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_genres(&self, search: Option<&str>) -> CatalogResult<i64> {
        let genres = self.genres.lock().unwrap();
        Ok(genres
            .iter()
            .filter(|g| matches_search(&g.name, search))
            .count() as i64)
    }

    async fn create_genre(&self, name: &str, slug: &str) -> CatalogResult<Genre> {
        let mut genres = self.genres.lock().unwrap();
        if genres.iter().any(|g| g.slug.as_str() == slug) {
            return Err(CatalogError::SlugTaken);
        }
        let genre = Genre {
            genre_id: genres.len() as i64 + 1,
            name: name.to_string(),
            slug: Slug::from_db(slug.to_string()),
        };
        genres.push(genre.clone());
        Ok(genre)
    }

    async fn delete_genre(&self, slug: &str) -> CatalogResult<()> {
        let mut genres = self.genres.lock().unwrap();
        let before = genres.len();
        genres.retain(|g| g.slug.as_str() != slug);
        if genres.len() == before {
            return Err(CatalogError::GenreNotFound);
        }
        Ok(())
    }
}

impl TitleRepository for InMemoryCatalog {
    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Title>> {
        let mut matching: Vec<Title> = {
            let titles = self.titles.lock().unwrap();
            titles
                .iter()
                .filter(|t| matches_filter(t, filter))
                .map(|t| self.rated(t))
                .collect()
        };
        // Rating ascending, unrated last, title id tiebreak.
        matching.sort_by(|a, b| match (a.rating, b.rating) {
            (Some(x), Some(y)) => x
                .partial_cmp(&y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.title_id.cmp(&b.title_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.title_id.cmp(&b.title_id),
        });
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_titles(&self, filter: &TitleFilter) -> CatalogResult<i64> {
        let titles = self.titles.lock().unwrap();
        Ok(titles.iter().filter(|t| matches_filter(t, filter)).count() as i64)
    }

    async fn find_title(&self, title_id: i64) -> CatalogResult<Option<Title>> {
        let titles = self.titles.lock().unwrap();
        Ok(titles
            .iter()
            .find(|t| t.title_id == title_id)
            .map(|t| self.rated(t)))
    }

    async fn create_title(&self, input: &NewTitle) -> CatalogResult<Title> {
        let category = match &input.category_slug {
            Some(slug) => Some(
                self.categories
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|c| c.slug.as_str() == slug)
                    .cloned()
                    .ok_or(CatalogError::CategoryNotFound)?,
            ),
            None => None,
        };

        let mut genres = Vec::new();
        for slug in &input.genre_slugs {
            let genre = self
                .genres
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.slug.as_str() == slug)
                .cloned()
                .ok_or(CatalogError::GenreNotFound)?;
            genres.push(genre);
        }

        let mut titles = self.titles.lock().unwrap();
        let title = Title {
            title_id: titles.len() as i64 + 1,
            name: input.name.clone(),
            year: input.year,
            description: input.description.clone(),
            category,
            genres,
            rating: None,
        };
        titles.push(title.clone());
        Ok(title)
    }

    async fn update_title(&self, title_id: i64, patch: &TitlePatch) -> CatalogResult<Title> {
        let mut titles = self.titles.lock().unwrap();
        let title = titles
            .iter_mut()
            .find(|t| t.title_id == title_id)
            .ok_or(CatalogError::TitleNotFound)?;
        if let Some(name) = &patch.name {
            title.name = name.clone();
        }
        if let Some(year) = patch.year {
            title.year = year;
        }
        Ok(title.clone())
    }

    async fn delete_title(&self, title_id: i64) -> CatalogResult<()> {
        let mut titles = self.titles.lock().unwrap();
        let before = titles.len();
        titles.retain(|t| t.title_id != title_id);
        if titles.len() == before {
            return Err(CatalogError::TitleNotFound);
        }
        Ok(())
    }
}

fn matches_search(name: &str, search: Option<&str>) -> bool {
    match search {
        Some(s) => name.to_lowercase().contains(&s.to_lowercase()),
        None => true,
    }
}

fn matches_filter(title: &Title, filter: &TitleFilter) -> bool {
    if let Some(category) = &filter.category {
        if title
            .category
            .as_ref()
            .is_none_or(|c| c.slug.as_str() != category)
        {
            return false;
        }
    }
    if let Some(genre) = &filter.genre {
        if !title.genres.iter().any(|g| g.slug.as_str() == genre) {
            return false;
        }
    }
    if let Some(name) = &filter.name {
        if !title.name.to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    if let Some(year) = filter.year {
        if title.year != year {
            return false;
        }
    }
    true
}

fn setup() -> (Arc<InMemoryCatalog>, Arc<CatalogConfig>) {
    (
        Arc::new(InMemoryCatalog::default()),
        Arc::new(CatalogConfig::default()),
    )
}

#[tokio::test]
async fn test_create_category_rejects_bad_slug() {
    let (repo, config) = setup();
    let taxonomy = TaxonomyUseCase::new(repo, config);

    let err = taxonomy.create_category("Movies", "Has Space").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let (repo, config) = setup();
    let taxonomy = TaxonomyUseCase::new(repo, config);

    taxonomy.create_category("Movies", "movies").await.unwrap();
    let err = taxonomy.create_category("Films", "movies").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_list_categories_pages_and_searches() {
    let (repo, config) = setup();
    let taxonomy = TaxonomyUseCase::new(repo, config);

    for i in 0..15 {
        taxonomy
            .create_category(&format!("Category {i}"), &format!("cat-{i}"))
            .await
            .unwrap();
    }

    let page = taxonomy
        .list_categories(None, PageParams::new(2))
        .await
        .unwrap();
    assert_eq!(page.count, 15);
    assert_eq!(page.results.len(), 5);

    // Out-of-range page is empty, not an error.
    let page = taxonomy
        .list_categories(None, PageParams::new(99))
        .await
        .unwrap();
    assert_eq!(page.count, 15);
    assert!(page.results.is_empty());

    let page = taxonomy
        .list_categories(Some("category 1"), PageParams::new(1))
        .await
        .unwrap();
    assert_eq!(page.count, 6); // 1, 10..14
}

#[tokio::test]
async fn test_create_title_rejects_future_year() {
    let (repo, config) = setup();
    let titles = TitleUseCase::new(repo, config);

    let err = titles
        .create(NewTitle {
            name: "From the Future".to_string(),
            year: Utc::now().year() + 1,
            description: String::new(),
            category_slug: None,
            genre_slugs: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_create_title_resolves_slugs() {
    let (repo, config) = setup();
    let taxonomy = TaxonomyUseCase::new(repo.clone(), config.clone());
    let titles = TitleUseCase::new(repo, config);

    taxonomy.create_category("Movies", "movies").await.unwrap();
    taxonomy.create_genre("Noir", "noir").await.unwrap();

    let title = titles
        .create(NewTitle {
            name: "The Third Man".to_string(),
            year: 1949,
            description: String::new(),
            category_slug: Some("movies".to_string()),
            genre_slugs: vec!["noir".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(title.category.as_ref().unwrap().slug.as_str(), "movies");
    assert_eq!(title.genres.len(), 1);
    assert!(title.rating.is_none());

    let err = titles
        .create(NewTitle {
            name: "Lost".to_string(),
            year: 2004,
            description: String::new(),
            category_slug: None,
            genre_slugs: vec!["unknown".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_title_filters_combine() {
    let (repo, config) = setup();
    let taxonomy = TaxonomyUseCase::new(repo.clone(), config.clone());
    let titles = TitleUseCase::new(repo, config);

    taxonomy.create_genre("Noir", "noir").await.unwrap();
    for (name, year, genres) in [
        ("The Third Man", 1949, vec!["noir".to_string()]),
        ("Chinatown", 1974, vec!["noir".to_string()]),
        ("Airplane!", 1980, vec![]),
    ] {
        titles
            .create(NewTitle {
                name: name.to_string(),
                year,
                description: String::new(),
                category_slug: None,
                genre_slugs: genres,
            })
            .await
            .unwrap();
    }

    let filter = TitleFilter {
        genre: Some("noir".to_string()),
        name: Some("china".to_string()),
        ..Default::default()
    };
    let page = titles.list(&filter, PageParams::new(1)).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].name, "Chinatown");

    let filter = TitleFilter {
        year: Some(1980),
        ..Default::default()
    };
    let page = titles.list(&filter, PageParams::new(1)).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].name, "Airplane!");
}

#[tokio::test]
async fn test_rating_is_mean_of_scores_ordered_ascending_unrated_last() {
    let (repo, config) = setup();
    let titles = TitleUseCase::new(repo.clone(), config);

    for name in ["Chinatown", "Airplane!", "The Third Man"] {
        titles
            .create(NewTitle {
                name: name.to_string(),
                year: 1974,
                description: String::new(),
                category_slug: None,
                genre_slugs: vec![],
            })
            .await
            .unwrap();
    }

    // Chinatown (1): 4 and 5 → 4.5; Airplane! (2): 2 → 2.0; The Third Man
    // (3) stays unrated.
    repo.add_score(1, 4);
    repo.add_score(1, 5);
    repo.add_score(2, 2);

    let title = titles.get(1).await.unwrap();
    assert_eq!(title.rating, Some(4.5));

    let page = titles
        .list(&TitleFilter::default(), PageParams::new(1))
        .await
        .unwrap();
    let names: Vec<&str> = page.results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Airplane!", "Chinatown", "The Third Man"]);
    assert_eq!(page.results[0].rating, Some(2.0));
    assert!(page.results[2].rating.is_none());
}

#[tokio::test]
async fn test_update_title_revalidates_year() {
    let (repo, config) = setup();
    let titles = TitleUseCase::new(repo, config);

    let title = titles
        .create(NewTitle {
            name: "Chinatown".to_string(),
            year: 1974,
            description: String::new(),
            category_slug: None,
            genre_slugs: vec![],
        })
        .await
        .unwrap();

    let err = titles
        .update(
            title.title_id,
            TitlePatch {
                year: Some(Utc::now().year() + 10),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}
