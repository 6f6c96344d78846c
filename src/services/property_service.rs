// src/services/property_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PropertyRepository,
    models::{
        auth::User,
        property::{
            AdminPropertyQuery, CreatePropertyPayload, Pagination, Property, PropertyPage,
            PropertyQuery, PropertyStatus, ReviewDecision, UpdatePropertyPayload,
        },
    },
};

const FEATURED_LIMIT: i64 = 6;

/// Moderação: só anúncio pendente pode ser aprovado (-> published) ou rejeitado (-> rejected).
pub fn review_transition(
    current: PropertyStatus,
    decision: ReviewDecision,
) -> Result<PropertyStatus, AppError> {
    match (current, decision) {
        (PropertyStatus::Pending, ReviewDecision::Approve) => Ok(PropertyStatus::Published),
        (PropertyStatus::Pending, ReviewDecision::Reject) => Ok(PropertyStatus::Rejected),
        (other, _) => Err(AppError::PropertyNotPending(other.as_str().to_string())),
    }
}

// Dono ou admin
fn can_manage(user: &User, property: &Property) -> bool {
    user.is_admin() || property.owner_id == Some(user.id)
}

fn not_found() -> AppError {
    AppError::ResourceNotFound("Property".to_string())
}

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  PÚBLICO
    // =========================================================================

    pub async fn search(&self, query: &PropertyQuery) -> Result<PropertyPage, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let (items, total) = self.repo.search_public(query, pagination).await?;
        Ok(PropertyPage::new(items, total, pagination))
    }

    pub async fn featured(&self) -> Result<Vec<Property>, AppError> {
        self.repo.list_featured(FEATURED_LIMIT).await
    }

    /// Detalhe do anúncio; cada leitura conta uma visualização.
    pub async fn view(&self, id: Uuid) -> Result<Property, AppError> {
        self.repo.increment_views(id).await?.ok_or_else(not_found)
    }

    // =========================================================================
    //  DONO / ADMIN
    // =========================================================================

    pub async fn create(&self, user: &User, payload: &CreatePropertyPayload) -> Result<Property, AppError> {
        // Anúncio de admin já nasce publicado; o resto passa pela moderação
        let (status, featured) = if user.is_admin() {
            (PropertyStatus::Published, payload.featured)
        } else {
            (PropertyStatus::Pending, false)
        };

        let property = self.repo.create(user.id, payload, status, featured).await?;
        tracing::info!("🏠 Anúncio {} criado por {} ({})", property.id, user.id, property.status.as_str());
        Ok(property)
    }

    pub async fn list_mine(&self, user: &User) -> Result<Vec<Property>, AppError> {
        self.repo.list_by_owner(user.id).await
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        payload: &UpdatePropertyPayload,
    ) -> Result<Property, AppError> {
        let current = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if !can_manage(user, &current) {
            return Err(AppError::Forbidden);
        }
        if payload.touches_moderation() && !user.is_admin() {
            return Err(AppError::Forbidden);
        }

        let property = self.repo.update(id, payload).await?.ok_or_else(not_found)?;
        tracing::info!("✏️ Anúncio {} atualizado por {}", id, user.id);
        Ok(property)
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let current = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;
        if !can_manage(user, &current) {
            return Err(AppError::Forbidden);
        }

        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!("🗑️ Anúncio {} removido por {}", id, user.id);
        Ok(())
    }

    // =========================================================================
    //  ADMIN
    // =========================================================================

    pub async fn list_admin(&self, query: &AdminPropertyQuery) -> Result<PropertyPage, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let (items, total) = self
            .repo
            .list_admin(query.status, query.search.as_deref(), pagination)
            .await?;
        Ok(PropertyPage::new(items, total, pagination))
    }

    /// Setter genérico: qualquer status para qualquer outro.
    pub async fn set_status(&self, id: Uuid, status: PropertyStatus) -> Result<Property, AppError> {
        let property = self.repo.set_status(id, status).await?.ok_or_else(not_found)?;
        tracing::info!("🔁 Anúncio {} agora está '{}'", id, status.as_str());
        Ok(property)
    }

    pub async fn review(&self, id: Uuid, decision: ReviewDecision) -> Result<Property, AppError> {
        let current = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;
        let next = review_transition(current.status, decision)?;

        // Outro moderador pode ter decidido no meio do caminho
        match self.repo.transition_status(id, current.status, next).await? {
            Some(property) => {
                tracing::info!("✅ Anúncio {} moderado: {}", id, next.as_str());
                Ok(property)
            }
            None => {
                let latest = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;
                Err(AppError::PropertyNotPending(latest.status.as_str().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::{auth::UserRole, property::ListingType};

    #[test]
    fn pending_listing_can_be_approved_or_rejected() {
        assert_eq!(
            review_transition(PropertyStatus::Pending, ReviewDecision::Approve).unwrap(),
            PropertyStatus::Published
        );
        assert_eq!(
            review_transition(PropertyStatus::Pending, ReviewDecision::Reject).unwrap(),
            PropertyStatus::Rejected
        );
    }

    #[test]
    fn review_only_applies_to_pending_listings() {
        for status in PropertyStatus::ALL.into_iter().filter(|s| *s != PropertyStatus::Pending) {
            for decision in [ReviewDecision::Approve, ReviewDecision::Reject] {
                let err = review_transition(status, decision).unwrap_err();
                assert!(matches!(err, AppError::PropertyNotPending(ref s) if s == status.as_str()));
            }
        }
    }

    #[test]
    fn only_owner_or_admin_can_manage() {
        let make_user = |role| User {
            id: Uuid::new_v4(),
            name: "U".into(),
            email: "u@email.com".into(),
            password_hash: String::new(),
            role,
            phone: None,
            address: None,
            membership_plan: String::new(),
            agent_bio: None,
            license_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let owner = make_user(UserRole::User);
        let stranger = make_user(UserRole::Agent);
        let admin = make_user(UserRole::Admin);

        let property = Property {
            id: Uuid::new_v4(),
            title: "Casa".into(),
            description: None,
            price: Decimal::new(100_000, 0),
            property_type: "house".into(),
            listing_type: ListingType::Sale,
            address: "Rua A, 1".into(),
            city: "Recife".into(),
            state_province: None,
            country: None,
            zip_code: None,
            bedrooms: 2,
            bathrooms: 1,
            area_sqft: None,
            year_built: None,
            images: vec![],
            features: vec![],
            status: PropertyStatus::Pending,
            featured: false,
            views: 0,
            owner_id: Some(owner.id),
            agent_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(can_manage(&owner, &property));
        assert!(can_manage(&admin, &property));
        assert!(!can_manage(&stranger, &property));
    }
}
