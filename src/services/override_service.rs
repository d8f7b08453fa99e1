use std::collections::HashMap;

use chrono::{NaiveTime, TimeZone, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::database::DbPool;
use crate::entities::{price_override_entity as po, profile_entity as profiles, room_entity as rooms};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::jwt::AuthUser;

#[derive(Clone)]
pub struct OverrideService {
    pool: DbPool,
}

impl OverrideService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Records one owner-level intervention. The row is a trace entry;
    /// overlapping ranges for the same room coexist in the log.
    pub async fn add_override(
        &self,
        user_id: i64,
        req: NewPriceOverride,
    ) -> AppResult<PriceOverrideResponse> {
        if req.end_date < req.start_date {
            return Err(AppError::ValidationError(
                "End date must not precede start date".to_string(),
            ));
        }
        if !req.has_effect() {
            return Err(AppError::ValidationError(
                "Override must set at least one of price, closed, min_stay, closed_on_arrival, closed_on_departure".to_string(),
            ));
        }
        if let Some(price) = req.price
            && price <= 0
        {
            return Err(AppError::ValidationError(
                "Price must be positive".to_string(),
            ));
        }
        if let Some(min_stay) = req.min_stay
            && min_stay <= 0
        {
            return Err(AppError::ValidationError(
                "Minimum stay must be positive".to_string(),
            ));
        }

        let room = rooms::Entity::find()
            .filter(rooms::Column::Id.eq(req.room_id))
            .filter(rooms::Column::UserId.eq(user_id))
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        let model = po::ActiveModel {
            user_id: Set(user_id),
            room_id: Set(room.id),
            room_name: Set(room.name),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            price: Set(req.price),
            closed: Set(req.closed),
            min_stay: Set(req.min_stay),
            closed_on_arrival: Set(req.closed_on_arrival),
            closed_on_departure: Set(req.closed_on_departure),
            batch_id: Set(None),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(model.into())
    }

    pub async fn get_overrides(&self, user_id: i64) -> AppResult<Vec<PriceOverrideResponse>> {
        let rows = po::Entity::find()
            .filter(po::Column::UserId.eq(user_id))
            .order_by_desc(po::Column::CreatedAt)
            .all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Owners delete their own rows; admins may delete any. Deleting a
    /// trace row does not revert anything remotely.
    pub async fn delete_override(&self, user: &AuthUser, id: i64) -> AppResult<()> {
        let row = po::Entity::find_by_id(id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Override not found".to_string()))?;

        if row.user_id != user.id && !user.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        row.delete(&*self.pool).await?;
        Ok(())
    }

    pub async fn get_all_admin(
        &self,
        query: &AdminOverrideQuery,
    ) -> AppResult<PaginatedResponse<AdminPriceOverrideResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = po::Entity::find();

        if let Some(client_name) = query.client_name.as_deref()
            && !client_name.trim().is_empty()
        {
            let user_ids = self.user_ids_by_name(client_name).await?;
            if user_ids.is_empty() {
                return Ok(PaginatedResponse::new(
                    vec![],
                    params.get_page(),
                    params.get_limit(),
                    0,
                ));
            }
            base = base.filter(po::Column::UserId.is_in(user_ids));
        }
        if let Some(room_id) = query.room_id {
            base = base.filter(po::Column::RoomId.eq(room_id));
        }
        if let Some(price) = query.price {
            base = base.filter(po::Column::Price.eq(price));
        }
        if let Some(min_stay) = query.min_stay {
            base = base.filter(po::Column::MinStay.eq(min_stay));
        }
        if let Some(from) = query.created_from {
            let from = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
            base = base.filter(po::Column::CreatedAt.gte(from));
        }
        if let Some(to) = query.created_to {
            // Filter is exclusive on the following midnight, so the bound
            // must stay representable.
            let next = to.succ_opt().ok_or_else(|| {
                AppError::ValidationError("created_to is outside the supported date range".to_string())
            })?;
            let next = Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN));
            base = base.filter(po::Column::CreatedAt.lt(next));
        }

        let total = base.clone().count(&*self.pool).await? as i64;

        let rows = base
            .order_by_desc(po::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&*self.pool)
            .await?;

        let names = self.names_for(rows.iter().map(|r| r.user_id)).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let client_name = names.get(&row.user_id).cloned();
                AdminPriceOverrideResponse::from_model(row, client_name)
            })
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    async fn user_ids_by_name(&self, client_name: &str) -> AppResult<Vec<i64>> {
        let pattern = format!("%{}%", client_name.trim().to_lowercase());
        let matches = profiles::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(profiles::Column::FullName))).like(pattern))
            .all(&*self.pool)
            .await?;
        Ok(matches.into_iter().map(|p| p.user_id).collect())
    }

    async fn names_for(
        &self,
        user_ids: impl Iterator<Item = i64>,
    ) -> AppResult<HashMap<i64, String>> {
        let mut ids: Vec<i64> = user_ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = profiles::Entity::find()
            .filter(profiles::Column::UserId.is_in(ids))
            .all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(|p| (p.user_id, p.full_name)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::UserRole;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn new_override() -> NewPriceOverride {
        NewPriceOverride {
            room_id: 3,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 14).unwrap(),
            price: Some(150),
            closed: None,
            min_stay: Some(3),
            closed_on_arrival: None,
            closed_on_departure: None,
        }
    }

    fn room(id: i64, user_id: i64) -> rooms::Model {
        rooms::Model {
            id,
            user_id,
            name: "Chambre Lavande".to_string(),
            cm_room_type_id: Some("42".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    fn override_row(id: i64, user_id: i64) -> po::Model {
        po::Model {
            id,
            user_id,
            room_id: 3,
            room_name: "Chambre Lavande".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 14).unwrap(),
            price: Some(150),
            closed: None,
            min_stay: Some(3),
            closed_on_arrival: None,
            closed_on_departure: None,
            batch_id: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_add_override_denormalizes_room_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room(3, 7)]])
            .append_query_results([vec![override_row(1, 7)]])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));

        let resp = service.add_override(7, new_override()).await.unwrap();
        assert_eq!(resp.room_name, "Chambre Lavande");
        assert_eq!(resp.price, Some(150));
    }

    #[tokio::test]
    async fn test_add_override_rejects_inverted_range_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = OverrideService::new(Arc::new(db));

        let mut req = new_override();
        req.end_date = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let err = service.add_override(7, req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_add_override_requires_an_effect() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = OverrideService::new(Arc::new(db));

        let mut req = new_override();
        req.price = None;
        req.min_stay = None;
        let err = service.add_override(7, req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_add_override_rejects_foreign_room() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rooms::Model>::new()])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));

        let err = service.add_override(7, new_override()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_override_is_owner_or_admin_only() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![override_row(1, 7)]])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));

        let stranger = AuthUser {
            id: 99,
            role: UserRole::Owner,
        };
        let err = service.delete_override(&stranger, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_admin_list_short_circuits_on_unknown_client() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profiles::Model>::new()])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));

        let query = AdminOverrideQuery {
            page: Some(1),
            per_page: Some(20),
            client_name: Some("nobody".to_string()),
            room_id: None,
            price: None,
            min_stay: None,
            created_from: None,
            created_to: None,
        };
        let page = service.get_all_admin(&query).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_cloned_service_shares_one_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![override_row(1, 7)]])
            .append_query_results([vec![override_row(2, 7)]])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));
        let clone = service.clone();

        let first = service.get_overrides(7).await.unwrap();
        let second = clone.get_overrides(7).await.unwrap();
        assert_eq!(first[0].id, 1);
        assert_eq!(second[0].id, 2);
    }

    #[tokio::test]
    async fn test_admin_list_reports_the_applied_page_size() {
        let count_row: BTreeMap<&str, sea_orm::Value> =
            BTreeMap::from([("num_items", 250i64.into())]);
        let profile = profiles::Model {
            user_id: 7,
            full_name: "Marie Dupont".to_string(),
            email: None,
            created_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row]])
            .append_query_results([vec![override_row(1, 7)]])
            .append_query_results([vec![profile]])
            .into_connection();
        let service = OverrideService::new(Arc::new(db));

        let query = AdminOverrideQuery {
            page: Some(1),
            per_page: Some(500),
            client_name: None,
            room_id: None,
            price: None,
            min_stay: None,
            created_from: None,
            created_to: None,
        };
        let page = service.get_all_admin(&query).await.unwrap();
        assert_eq!(page.page_size, 100);
        assert_eq!(page.total, 250);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data[0].client_name.as_deref(), Some("Marie Dupont"));
    }

    #[tokio::test]
    async fn test_admin_list_rejects_unrepresentable_created_to() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = OverrideService::new(Arc::new(db));

        let query = AdminOverrideQuery {
            page: None,
            per_page: None,
            client_name: None,
            room_id: None,
            price: None,
            min_stay: None,
            created_from: None,
            created_to: Some(NaiveDate::MAX),
        };
        let err = service.get_all_admin(&query).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
