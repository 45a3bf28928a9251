//! Title Use Cases

use std::sync::Arc;

use kernel::page::{PageParams, Paginated};

use crate::application::config::CatalogConfig;
use crate::domain::entities::Title;
use crate::domain::repository::{NewTitle, TitleFilter, TitlePatch, TitleRepository};
use crate::domain::value_objects::{validate_name, validate_year};
use crate::error::{CatalogError, CatalogResult};

/// Title use cases
pub struct TitleUseCase<R>
where
    R: TitleRepository,
{
    repo: Arc<R>,
    config: Arc<CatalogConfig>,
}

impl<R> TitleUseCase<R>
where
    R: TitleRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CatalogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn list(
        &self,
        filter: &TitleFilter,
        params: PageParams,
    ) -> CatalogResult<Paginated<Title>> {
        let page_size = self.config.page_size;
        let count = self.repo.count_titles(filter).await?;
        let results = self
            .repo
            .list_titles(filter, params.limit(page_size), params.offset(page_size))
            .await?;
        Ok(Paginated::new(count, params, page_size, results))
    }

    pub async fn get(&self, title_id: i64) -> CatalogResult<Title> {
        self.repo
            .find_title(title_id)
            .await?
            .ok_or(CatalogError::TitleNotFound)
    }

    pub async fn create(&self, input: NewTitle) -> CatalogResult<Title> {
        validate_name(&input.name)?;
        validate_year(input.year)?;

        let title = self.repo.create_title(&input).await?;

        tracing::info!(title_id = title.title_id, "Title created");

        Ok(title)
    }

    pub async fn update(&self, title_id: i64, patch: TitlePatch) -> CatalogResult<Title> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(year) = patch.year {
            validate_year(year)?;
        }

        let title = self.repo.update_title(title_id, &patch).await?;

        tracing::info!(title_id = title.title_id, "Title updated");

        Ok(title)
    }

    pub async fn delete(&self, title_id: i64) -> CatalogResult<()> {
        self.repo.delete_title(title_id).await?;
        tracing::info!(title_id = title_id, "Title deleted");
        Ok(())
    }
}
