//! Catalog Router

use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::application::config::CatalogConfig;
use crate::domain::repository::{TaxonomyRepository, TitleRepository};
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the catalog router with the PostgreSQL repository
pub fn catalog_router(repo: PgCatalogRepository, config: Arc<CatalogConfig>) -> Router {
    catalog_router_generic(repo, config)
}

/// Create a generic catalog router for any repository implementation
pub fn catalog_router_generic<R>(repo: R, config: Arc<CatalogConfig>) -> Router
where
    R: TaxonomyRepository + TitleRepository + Clone + Send + Sync + 'static,
{
    let state = CatalogAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories::<R>).post(handlers::create_category::<R>),
        )
        .route("/categories/{slug}", delete(handlers::delete_category::<R>))
        .route(
            "/genres",
            get(handlers::list_genres::<R>).post(handlers::create_genre::<R>),
        )
        .route("/genres/{slug}", delete(handlers::delete_genre::<R>))
        .route(
            "/titles",
            get(handlers::list_titles::<R>).post(handlers::create_title::<R>),
        )
        .route(
            "/titles/{title_id}",
            get(handlers::get_title::<R>)
                .patch(handlers::update_title::<R>)
                .delete(handlers::delete_title::<R>),
        )
        .with_state(state)
}
