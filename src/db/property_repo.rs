// src/db/property_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::like_pattern, error::AppError},
    models::property::{
        CreatePropertyPayload, Pagination, Property, PropertyQuery, PropertySort, PropertyStatus,
        UpdatePropertyPayload,
    },
};

const PROPERTY_COLUMNS: &str = "id, title, description, price, property_type, listing_type, \
     address, city, state_province, country, zip_code, bedrooms, bathrooms, area_sqft, \
     year_built, images, features, status, featured, views, owner_id, agent_id, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

// Filtros da busca pública (sempre só anúncios publicados)
fn push_public_filters(qb: &mut QueryBuilder<'_, Postgres>, q: &PropertyQuery) {
    qb.push(" WHERE status = 'published'");

    if let Some(pattern) = like_pattern(q.search.as_deref()) {
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR address ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(city) = q.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND lower(city) = lower(").push_bind(city.to_string()).push(")");
    }
    if let Some(kind) = q.property_type.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        qb.push(" AND lower(property_type) = lower(").push_bind(kind.to_string()).push(")");
    }
    if let Some(listing_type) = q.listing_type {
        qb.push(" AND listing_type = ").push_bind(listing_type);
    }
    if let Some(min) = q.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = q.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }
    // Quartos e banheiros são mínimos
    if let Some(bedrooms) = q.bedrooms {
        qb.push(" AND bedrooms >= ").push_bind(bedrooms);
    }
    if let Some(bathrooms) = q.bathrooms {
        qb.push(" AND bathrooms >= ").push_bind(bathrooms);
    }
    if let Some(featured) = q.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
}

fn push_admin_filters(qb: &mut QueryBuilder<'_, Postgres>, status: Option<PropertyStatus>, search: Option<&str>) {
    qb.push(" WHERE TRUE");
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(pattern) = like_pattern(search) {
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn order_clause(sort: PropertySort) -> &'static str {
    match sort {
        PropertySort::Newest => " ORDER BY created_at DESC",
        PropertySort::PriceAsc => " ORDER BY price ASC, created_at DESC",
        PropertySort::PriceDesc => " ORDER BY price DESC, created_at DESC",
    }
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Página de anúncios publicados + total para a paginação.
    pub async fn search_public(
        &self,
        query: &PropertyQuery,
        pagination: Pagination,
    ) -> Result<(Vec<Property>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_public_filters(&mut count_qb, query);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {PROPERTY_COLUMNS} FROM properties"));
        push_public_filters(&mut qb, query);
        qb.push(order_clause(query.sort.unwrap_or_default()));
        qb.push(" LIMIT ").push_bind(pagination.limit as i64);
        qb.push(" OFFSET ").push_bind(pagination.offset());

        let items = qb.build_query_as::<Property>().fetch_all(&self.pool).await?;
        Ok((items, total))
    }

    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Property>, AppError> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties \
             WHERE status = 'published' AND featured = TRUE \
             ORDER BY created_at DESC LIMIT $1"
        );
        let items = sqlx::query_as::<_, Property>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_admin(
        &self,
        status: Option<PropertyStatus>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<(Vec<Property>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_admin_filters(&mut count_qb, status, search);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {PROPERTY_COLUMNS} FROM properties"));
        push_admin_filters(&mut qb, status, search);
        qb.push(" ORDER BY created_at DESC");
        qb.push(" LIMIT ").push_bind(pagination.limit as i64);
        qb.push(" OFFSET ").push_bind(pagination.offset());

        let items = qb.build_query_as::<Property>().fetch_all(&self.pool).await?;
        Ok((items, total))
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>, AppError> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let items = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    // Conta a visualização e devolve o anúncio atualizado
    pub async fn increment_views(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let sql = format!(
            "UPDATE properties SET views = views + 1 WHERE id = $1 RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(
        &self,
        owner_id: Uuid,
        payload: &CreatePropertyPayload,
        status: PropertyStatus,
        featured: bool,
    ) -> Result<Property, AppError> {
        let sql = format!(
            r#"
            INSERT INTO properties (
                title, description, price, property_type, listing_type, address, city,
                state_province, country, zip_code, bedrooms, bathrooms, area_sqft, year_built,
                images, features, status, featured, owner_id, agent_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(&payload.title)
            .bind(payload.description.as_deref())
            .bind(payload.price)
            .bind(&payload.property_type)
            .bind(payload.listing_type)
            .bind(&payload.address)
            .bind(&payload.city)
            .bind(payload.state_province.as_deref())
            .bind(payload.country.as_deref())
            .bind(payload.zip_code.as_deref())
            .bind(payload.bedrooms)
            .bind(payload.bathrooms)
            .bind(payload.area_sqft)
            .bind(payload.year_built)
            .bind(&payload.images)
            .bind(&payload.features)
            .bind(status)
            .bind(featured)
            .bind(owner_id)
            .bind(payload.agent_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(property)
    }

    // Atualização parcial: campos ausentes mantêm o valor atual
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdatePropertyPayload,
    ) -> Result<Option<Property>, AppError> {
        let sql = format!(
            r#"
            UPDATE properties SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                property_type = COALESCE($5, property_type),
                listing_type = COALESCE($6, listing_type),
                address = COALESCE($7, address),
                city = COALESCE($8, city),
                state_province = COALESCE($9, state_province),
                country = COALESCE($10, country),
                zip_code = COALESCE($11, zip_code),
                bedrooms = COALESCE($12, bedrooms),
                bathrooms = COALESCE($13, bathrooms),
                area_sqft = COALESCE($14, area_sqft),
                year_built = COALESCE($15, year_built),
                images = COALESCE($16, images),
                features = COALESCE($17, features),
                status = COALESCE($18, status),
                featured = COALESCE($19, featured),
                agent_id = COALESCE($20, agent_id),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(payload.title.as_deref())
            .bind(payload.description.as_deref())
            .bind(payload.price)
            .bind(payload.property_type.as_deref())
            .bind(payload.listing_type)
            .bind(payload.address.as_deref())
            .bind(payload.city.as_deref())
            .bind(payload.state_province.as_deref())
            .bind(payload.country.as_deref())
            .bind(payload.zip_code.as_deref())
            .bind(payload.bedrooms)
            .bind(payload.bathrooms)
            .bind(payload.area_sqft)
            .bind(payload.year_built)
            .bind(payload.images.clone())
            .bind(payload.features.clone())
            .bind(payload.status)
            .bind(payload.featured)
            .bind(payload.agent_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    pub async fn set_status(&self, id: Uuid, status: PropertyStatus) -> Result<Option<Property>, AppError> {
        let sql = format!(
            "UPDATE properties SET status = $2, updated_at = now() WHERE id = $1 RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    /// Troca o status só se o atual ainda for `expected` (moderação concorrente).
    pub async fn transition_status(
        &self,
        id: Uuid,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<Option<Property>, AppError> {
        let sql = format!(
            "UPDATE properties SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2 RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(expected)
            .bind(next)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
