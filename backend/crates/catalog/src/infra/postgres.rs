//! PostgreSQL Repository Implementation

use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

use crate::domain::entities::{Category, Genre, Title};
use crate::domain::repository::{
    NewTitle, TaxonomyRepository, TitleFilter, TitlePatch, TitleRepository,
};
use crate::domain::value_objects::Slug;
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the genre sets for a batch of titles in one query.
    async fn genres_for(&self, title_ids: &[i64]) -> CatalogResult<HashMap<i64, Vec<Genre>>> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TitleGenreRow>(
            r#"
            SELECT tg.title_id, g.genre_id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.genre_id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.genre_id
            "#,
        )
        .bind(title_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i64, Vec<Genre>> = HashMap::new();
        for row in rows {
            genres.entry(row.title_id).or_default().push(Genre {
                genre_id: row.genre_id,
                name: row.name,
                slug: Slug::from_db(row.slug),
            });
        }
        Ok(genres)
    }

    async fn hydrate_titles(&self, rows: Vec<TitleRow>) -> CatalogResult<Vec<Title>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.title_id).collect();
        let mut genres = self.genres_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let title_genres = genres.remove(&row.title_id).unwrap_or_default();
                row.into_title(title_genres)
            })
            .collect())
    }
}

/// Map unique-constraint violations on taxonomy slugs; everything else
/// stays a database error.
fn map_slug_violation(err: sqlx::Error) -> CatalogError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return CatalogError::SlugTaken;
        }
    }
    CatalogError::Database(err)
}

const TITLE_SELECT: &str = r#"
    SELECT
        t.title_id,
        t.name,
        t.year,
        t.description,
        c.category_id AS category_id,
        c.name AS category_name,
        c.slug AS category_slug,
        AVG(r.score)::float8 AS rating
    FROM titles t
    LEFT JOIN categories c ON c.category_id = t.category_id
    LEFT JOIN reviews r ON r.title_id = t.title_id
"#;

const TITLE_GROUP_ORDER: &str = r#"
    GROUP BY t.title_id, c.category_id
    ORDER BY rating ASC NULLS LAST, t.title_id
"#;

/// Append the WHERE clause for a title filter.
fn apply_title_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a TitleFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(category) = &filter.category {
        qb.push(" AND c.slug = ");
        qb.push_bind(category.as_str());
    }
    if let Some(genre) = &filter.genre {
        qb.push(
            " AND EXISTS (
                SELECT 1 FROM title_genres tg
                JOIN genres g ON g.genre_id = tg.genre_id
                WHERE tg.title_id = t.title_id AND g.slug = ",
        );
        qb.push_bind(genre.as_str());
        qb.push(")");
    }
    if let Some(name) = &filter.name {
        qb.push(" AND t.name ILIKE '%' || ");
        qb.push_bind(name.as_str());
        qb.push(" || '%'");
    }
    if let Some(year) = filter.year {
        qb.push(" AND t.year = ");
        qb.push_bind(year);
    }
}

impl TitleRepository for PgCatalogRepository {
    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Title>> {
        let mut qb = QueryBuilder::new(TITLE_SELECT);
        apply_title_filter(&mut qb, filter);
        qb.push(TITLE_GROUP_ORDER);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<TitleRow>()
            .fetch_all(&self.pool)
            .await?;

        self.hydrate_titles(rows).await
    }

    async fn count_titles(&self, filter: &TitleFilter) -> CatalogResult<i64> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM titles t
            LEFT JOIN categories c ON c.category_id = t.category_id
            "#,
        );
        apply_title_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn find_title(&self, title_id: i64) -> CatalogResult<Option<Title>> {
        let mut qb = QueryBuilder::new(TITLE_SELECT);
        qb.push(" WHERE t.title_id = ");
        qb.push_bind(title_id);
        qb.push(TITLE_GROUP_ORDER);

        let row = qb
            .build_query_as::<TitleRow>()
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let genres = self
                    .genres_for(&[row.title_id])
                    .await?
                    .remove(&row.title_id)
                    .unwrap_or_default();
                Ok(Some(row.into_title(genres)))
            }
            None => Ok(None),
        }
    }

    async fn create_title(&self, input: &NewTitle) -> CatalogResult<Title> {
        let mut tx = self.pool.begin().await?;

        let category_id = match &input.category_slug {
            Some(slug) => Some(resolve_category(&mut tx, slug).await?),
            None => None,
        };

        let title_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING title_id
            "#,
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        link_genres(&mut tx, title_id, &input.genre_slugs).await?;

        tx.commit().await?;

        self.find_title(title_id)
            .await?
            .ok_or(CatalogError::TitleNotFound)
    }

    async fn update_title(&self, title_id: i64, patch: &TitlePatch) -> CatalogResult<Title> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE title_id = $1)")
                .bind(title_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(CatalogError::TitleNotFound);
        }

        let category_id = match &patch.category_slug {
            Some(slug) => Some(resolve_category(&mut tx, slug).await?),
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE title_id = $1
            "#,
        )
        .bind(title_id)
        .bind(patch.name.as_deref())
        .bind(patch.year)
        .bind(patch.description.as_deref())
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

        if let Some(genre_slugs) = &patch.genre_slugs {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(title_id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, title_id, genre_slugs).await?;
        }

        tx.commit().await?;

        self.find_title(title_id)
            .await?
            .ok_or(CatalogError::TitleNotFound)
    }

    async fn delete_title(&self, title_id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM titles WHERE title_id = $1")
            .bind(title_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::TitleNotFound);
        }
        Ok(())
    }
}

async fn resolve_category(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    slug: &str,
) -> CatalogResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT category_id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(CatalogError::CategoryNotFound)
}

async fn link_genres(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    title_id: i64,
    slugs: &[String],
) -> CatalogResult<()> {
    for slug in slugs {
        let genre_id: i64 =
            sqlx::query_scalar::<_, i64>("SELECT genre_id FROM genres WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(CatalogError::GenreNotFound)?;

        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

impl TaxonomyRepository for PgCatalogRepository {
    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT category_id, name, slug FROM categories
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY category_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn count_categories(&self, search: Option<&str>) -> CatalogResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create_category(&self, name: &str, slug: &str) -> CatalogResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, slug) VALUES ($1, $2)
            RETURNING category_id, name, slug
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_violation)?;

        Ok(row.into_category())
    }

    async fn delete_category(&self, slug: &str) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
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
        let rows = sqlx::query_as::<_, GenreRow>(
            r#"
            SELECT genre_id, name, slug FROM genres
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY genre_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GenreRow::into_genre).collect())
    }

    async fn count_genres(&self, search: Option<&str>) -> CatalogResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM genres WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create_genre(&self, name: &str, slug: &str) -> CatalogResult<Genre> {
        let row = sqlx::query_as::<_, GenreRow>(
            r#"
            INSERT INTO genres (name, slug) VALUES ($1, $2)
            RETURNING genre_id, name, slug
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_violation)?;

        Ok(row.into_genre())
    }

    async fn delete_genre(&self, slug: &str) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::GenreNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Row types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: i64,
    name: String,
    slug: String,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: self.category_id,
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct GenreRow {
    genre_id: i64,
    name: String,
    slug: String,
}

impl GenreRow {
    fn into_genre(self) -> Genre {
        Genre {
            genre_id: self.genre_id,
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleGenreRow {
    title_id: i64,
    genre_id: i64,
    name: String,
    slug: String,
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    title_id: i64,
    name: String,
    year: i32,
    description: String,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

impl TitleRow {
    fn into_title(self, genres: Vec<Genre>) -> Title {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(category_id), Some(name), Some(slug)) => Some(Category {
                category_id,
                name,
                slug: Slug::from_db(slug),
            }),
            _ => None,
        };

        Title {
            title_id: self.title_id,
            name: self.name,
            year: self.year,
            description: self.description,
            category,
            genres,
            rating: self.rating,
        }
    }
}
