//! HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::extract::Json;
use kernel::page::Paginated;
use kernel::policy::{self, Action, Relation, Resource};
use kernel::principal::Principal;

use crate::application::config::CatalogConfig;
use crate::application::{TaxonomyUseCase, TitleUseCase};
use crate::domain::repository::{TaxonomyRepository, TitleRepository};
use crate::error::CatalogResult;
use crate::presentation::dto::{
    CategoryResponse, GenreResponse, TaxonomyCreateRequest, TaxonomyListQuery, TitleCreateRequest,
    TitleListQuery, TitleResponse, TitleUpdateRequest,
};

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<CatalogConfig>,
}

// ============================================================================
// Categories
// ============================================================================

/// GET /api/v1/categories
pub async fn list_categories<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Query(query): Query<TaxonomyListQuery>,
) -> CatalogResult<Json<Paginated<CategoryResponse>>>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::List, Resource::Category, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case
        .list_categories(query.search.as_deref(), query.page_params())
        .await?;

    Ok(Json(page.map(|c| CategoryResponse::from(&c))))
}

/// POST /api/v1/categories
pub async fn create_category<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Json(req): Json<TaxonomyCreateRequest>,
) -> CatalogResult<(StatusCode, Json<CategoryResponse>)>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Create, Resource::Category, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    let category = use_case.create_category(&req.name, &req.slug).await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(&category))))
}

/// DELETE /api/v1/categories/{slug}
pub async fn delete_category<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Path(slug): Path<String>,
) -> CatalogResult<StatusCode>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Delete, Resource::Category, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete_category(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Genres
// ============================================================================

/// GET /api/v1/genres
pub async fn list_genres<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Query(query): Query<TaxonomyListQuery>,
) -> CatalogResult<Json<Paginated<GenreResponse>>>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::List, Resource::Genre, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case
        .list_genres(query.search.as_deref(), query.page_params())
        .await?;

    Ok(Json(page.map(|g| GenreResponse::from(&g))))
}

/// POST /api/v1/genres
pub async fn create_genre<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Json(req): Json<TaxonomyCreateRequest>,
) -> CatalogResult<(StatusCode, Json<GenreResponse>)>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Create, Resource::Genre, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    let genre = use_case.create_genre(&req.name, &req.slug).await?;

    Ok((StatusCode::CREATED, Json(GenreResponse::from(&genre))))
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Path(slug): Path<String>,
) -> CatalogResult<StatusCode>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Delete, Resource::Genre, Relation::None)?;

    let use_case = TaxonomyUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete_genre(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Titles
// ============================================================================

/// GET /api/v1/titles
pub async fn list_titles<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Query(query): Query<TitleListQuery>,
) -> CatalogResult<Json<Paginated<TitleResponse>>>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::List, Resource::Title, Relation::None)?;

    let use_case = TitleUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(&query.filter(), query.page_params()).await?;

    Ok(Json(page.map(|t| TitleResponse::from(&t))))
}

/// POST /api/v1/titles
pub async fn create_title<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Json(req): Json<TitleCreateRequest>,
) -> CatalogResult<(StatusCode, Json<TitleResponse>)>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Create, Resource::Title, Relation::None)?;

    let use_case = TitleUseCase::new(state.repo.clone(), state.config.clone());
    let title = use_case.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(TitleResponse::from(&title))))
}

/// GET /api/v1/titles/{title_id}
pub async fn get_title<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Path(title_id): Path<i64>,
) -> CatalogResult<Json<TitleResponse>>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Retrieve, Resource::Title, Relation::None)?;

    let use_case = TitleUseCase::new(state.repo.clone(), state.config.clone());
    let title = use_case.get(title_id).await?;

    Ok(Json(TitleResponse::from(&title)))
}

/// PATCH /api/v1/titles/{title_id}
pub async fn update_title<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Path(title_id): Path<i64>,
    Json(req): Json<TitleUpdateRequest>,
) -> CatalogResult<Json<TitleResponse>>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Update, Resource::Title, Relation::None)?;

    let use_case = TitleUseCase::new(state.repo.clone(), state.config.clone());
    let title = use_case.update(title_id, req.into()).await?;

    Ok(Json(TitleResponse::from(&title)))
}

/// DELETE /api/v1/titles/{title_id}
pub async fn delete_title<R>(
    State(state): State<CatalogAppState<R>>,
    principal: Principal,
    Path(title_id): Path<i64>,
) -> CatalogResult<StatusCode>
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Delete, Resource::Title, Relation::None)?;

    let use_case = TitleUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(title_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
