//! Taxonomy Use Cases
//!
//! Category and genre management. The two taxonomies behave identically;
//! titles reference them by slug.

use std::sync::Arc;

use kernel::page::{PageParams, Paginated};

use crate::application::config::CatalogConfig;
use crate::domain::entities::{Category, Genre};
use crate::domain::repository::TaxonomyRepository;
use crate::domain::value_objects::{Slug, validate_name};
use crate::error::CatalogResult;

/// Category and genre use cases
pub struct TaxonomyUseCase<R>
where
    R: TaxonomyRepository,
{
    repo: Arc<R>,
    config: Arc<CatalogConfig>,
}

impl<R> TaxonomyUseCase<R>
where
    R: TaxonomyRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CatalogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn list_categories(
        &self,
        search: Option<&str>,
        params: PageParams,
    ) -> CatalogResult<Paginated<Category>> {
        let page_size = self.config.page_size;
        let count = self.repo.count_categories(search).await?;
        let results = self
            .repo
            .list_categories(search, params.limit(page_size), params.offset(page_size))
            .await?;
        Ok(Paginated::new(count, params, page_size, results))
    }

    pub async fn create_category(&self, name: &str, slug: &str) -> CatalogResult<Category> {
        validate_name(name)?;
        let slug = Slug::new(slug)?;

        let category = self.repo.create_category(name, slug.as_str()).await?;

        tracing::info!(slug = %category.slug, "Category created");

        Ok(category)
    }

    pub async fn delete_category(&self, slug: &str) -> CatalogResult<()> {
        self.repo.delete_category(slug).await?;
        tracing::info!(slug = %slug, "Category deleted");
        Ok(())
    }

    pub async fn list_genres(
        &self,
        search: Option<&str>,
        params: PageParams,
    ) -> CatalogResult<Paginated<Genre>> {
        let page_size = self.config.page_size;
        let count = self.repo.count_genres(search).await?;
        let results = self
            .repo
            .list_genres(search, params.limit(page_size), params.offset(page_size))
            .await?;
        Ok(Paginated::new(count, params, page_size, results))
    }

    pub async fn create_genre(&self, name: &str, slug: &str) -> CatalogResult<Genre> {
        validate_name(name)?;
        let slug = Slug::new(slug)?;

        let genre = self.repo.create_genre(name, slug.as_str()).await?;

        tracing::info!(slug = %genre.slug, "Genre created");

        Ok(genre)
    }

    pub async fn delete_genre(&self, slug: &str) -> CatalogResult<()> {
        self.repo.delete_genre(slug).await?;
        tracing::info!(slug = %slug, "Genre deleted");
        Ok(())
    }
}
