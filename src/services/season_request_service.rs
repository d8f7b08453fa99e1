use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::database::DbPool;
use crate::entities::{
    SeasonPricingItem, SeasonPricingItems, SeasonRequestStatus, profile_entity as profiles,
    room_entity as rooms, season_price_request_entity as spr,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::jwt::AuthUser;

const MIN_SEASON_YEAR: i32 = 2000;
const MAX_SEASON_YEAR: i32 = 2100;

#[derive(Clone)]
pub struct SeasonRequestService {
    pool: DbPool,
}

impl SeasonRequestService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Creates a pending request for one room and season. A resubmission
    /// never edits an existing request; it goes through here again and a
    /// later apply records which done request it superseded.
    pub async fn create_request(
        &self,
        user_id: i64,
        req: CreateSeasonPricingRequest,
    ) -> AppResult<SeasonRequestResponse> {
        if !(MIN_SEASON_YEAR..=MAX_SEASON_YEAR).contains(&req.season_year) {
            return Err(AppError::ValidationError(format!(
                "Season year must be between {MIN_SEASON_YEAR} and {MAX_SEASON_YEAR}"
            )));
        }
        validate_items(&req.items)?;

        let room = rooms::Entity::find()
            .filter(rooms::Column::Id.eq(req.room_id))
            .filter(rooms::Column::UserId.eq(user_id))
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        let existing = spr::Entity::find()
            .filter(spr::Column::RoomId.eq(room.id))
            .filter(spr::Column::SeasonYear.eq(req.season_year))
            .filter(spr::Column::Status.ne(SeasonRequestStatus::Rejected))
            .all(&*self.pool)
            .await?;

        if existing
            .iter()
            .any(|r| r.status == SeasonRequestStatus::Pending)
        {
            return Err(AppError::Conflict(
                "A pending request already exists for this room and season".to_string(),
            ));
        }
        if !req.resubmission
            && existing
                .iter()
                .any(|r| r.status == SeasonRequestStatus::Done)
        {
            return Err(AppError::Conflict(
                "This room and season were already applied; submit as a resubmission to replace them"
                    .to_string(),
            ));
        }

        let insert = spr::ActiveModel {
            user_id: Set(user_id),
            season_year: Set(req.season_year),
            room_id: Set(room.id),
            room_name: Set(room.name),
            items: Set(SeasonPricingItems(req.items)),
            status: Set(SeasonRequestStatus::Pending),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await;

        // Two sessions can both pass the read check; the partial unique
        // index on pending (room_id, season_year) decides the race.
        let model = match insert {
            Ok(model) => model,
            Err(e) => {
                if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                    return Err(AppError::Conflict(
                        "A pending request already exists for this room and season".to_string(),
                    ));
                }
                return Err(e.into());
            }
        };

        Ok(model.into())
    }

    pub async fn list_requests(
        &self,
        user_id: i64,
        query: &SeasonRequestQuery,
    ) -> AppResult<PaginatedResponse<SeasonRequestResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = spr::Entity::find().filter(spr::Column::UserId.eq(user_id));
        if let Some(status) = query.status {
            base = base.filter(spr::Column::Status.eq(status));
        }
        if let Some(year) = query.season_year {
            base = base.filter(spr::Column::SeasonYear.eq(year));
        }

        let total = base.clone().count(&*self.pool).await? as i64;
        let rows = base
            .order_by_desc(spr::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&*self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Into::into).collect(),
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_request(&self, user: &AuthUser, id: i64) -> AppResult<SeasonRequestResponse> {
        let row = spr::Entity::find_by_id(id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Season request not found".to_string()))?;

        if row.user_id != user.id && !user.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(row.into())
    }

    pub async fn reject_request(&self, id: i64) -> AppResult<SeasonRequestResponse> {
        let row = spr::Entity::find_by_id(id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Season request not found".to_string()))?;

        if row.status != SeasonRequestStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending requests can be rejected, this one is {}",
                row.status
            )));
        }

        let mut am = row.into_active_model();
        am.status = Set(SeasonRequestStatus::Rejected);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&*self.pool).await?;
        Ok(updated.into())
    }

    /// Admin edit of a pending request's items before approval.
    pub async fn update_items(
        &self,
        id: i64,
        items: Vec<SeasonPricingItem>,
    ) -> AppResult<SeasonRequestResponse> {
        validate_items(&items)?;

        let row = spr::Entity::find_by_id(id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Season request not found".to_string()))?;

        if row.status != SeasonRequestStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending requests can be edited, this one is {}",
                row.status
            )));
        }

        let mut am = row.into_active_model();
        am.items = Set(SeasonPricingItems(items));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&*self.pool).await?;
        Ok(updated.into())
    }

    pub async fn list_admin(
        &self,
        query: &AdminSeasonRequestQuery,
    ) -> AppResult<PaginatedResponse<AdminSeasonRequestResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = spr::Entity::find();
        if let Some(status) = query.status {
            base = base.filter(spr::Column::Status.eq(status));
        }
        if let Some(year) = query.season_year {
            base = base.filter(spr::Column::SeasonYear.eq(year));
        }
        if let Some(room_id) = query.room_id {
            base = base.filter(spr::Column::RoomId.eq(room_id));
        }
        if let Some(flagged) = query.needs_reconciliation {
            base = base.filter(spr::Column::NeedsReconciliation.eq(flagged));
        }
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
            base = base.filter(spr::Column::UserId.is_in(user_ids));
        }

        let total = base.clone().count(&*self.pool).await? as i64;
        let rows = base
            .order_by_desc(spr::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&*self.pool)
            .await?;

        let names = self.names_for(rows.iter().map(|r| r.user_id)).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let client_name = names.get(&row.user_id).cloned();
                AdminSeasonRequestResponse::from_model(row, client_name)
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

fn validate_items(items: &[SeasonPricingItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "A season request needs at least one period".to_string(),
        ));
    }
    for item in items {
        if item.end_date < item.start_date {
            return Err(AppError::ValidationError(format!(
                "Period {} - {}: end date precedes start date",
                item.start_date, item.end_date
            )));
        }
        if let Some(price) = item.price
            && price <= 0
        {
            return Err(AppError::ValidationError(format!(
                "Period {} - {}: price must be positive",
                item.start_date, item.end_date
            )));
        }
        if let Some(min_stay) = item.min_stay
            && min_stay <= 0
        {
            return Err(AppError::ValidationError(format!(
                "Period {} - {}: minimum stay must be positive",
                item.start_date, item.end_date
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn item(price: Option<i32>) -> SeasonPricingItem {
        SeasonPricingItem {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            period_type: "Semaine".to_string(),
            season: "Haute Saison".to_string(),
            price,
            min_stay: Some(2),
            comment: "Vacances d'été".to_string(),
            closed: false,
            closed_on_arrival: false,
            closed_on_departure: false,
        }
    }

    fn create_req(resubmission: bool) -> CreateSeasonPricingRequest {
        CreateSeasonPricingRequest {
            season_year: 2026,
            room_id: 3,
            items: vec![item(Some(137))],
            resubmission,
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

    fn request_row(id: i64, status: SeasonRequestStatus) -> spr::Model {
        spr::Model {
            id,
            user_id: 7,
            season_year: 2026,
            room_id: 3,
            room_name: "Chambre Lavande".to_string(),
            items: SeasonPricingItems(vec![item(Some(137))]),
            status,
            supersedes_id: None,
            needs_reconciliation: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn no_inserts(log: &[Transaction]) {
        for t in log {
            let sql = format!("{t:?}");
            assert!(!sql.contains("INSERT"), "unexpected insert: {sql}");
        }
    }

    #[tokio::test]
    async fn test_create_request_happy_path() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room(3, 7)]])
            .append_query_results([Vec::<spr::Model>::new()])
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Pending)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let resp = service.create_request(7, create_req(false)).await.unwrap();
        assert_eq!(resp.status, SeasonRequestStatus::Pending);
        assert_eq!(resp.room_name, "Chambre Lavande");
        assert_eq!(resp.items.len(), 1);
    }

    #[tokio::test]
    async fn test_create_request_blocks_on_pending_duplicate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room(3, 7)]])
            .append_query_results([vec![request_row(11, SeasonRequestStatus::Pending)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let err = service.create_request(7, create_req(false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let pool = Arc::into_inner(service.pool).unwrap();
        no_inserts(&pool.into_transaction_log());
    }

    #[tokio::test]
    async fn test_create_request_blocks_on_done_without_resubmission() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room(3, 7)]])
            .append_query_results([vec![request_row(11, SeasonRequestStatus::Done)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let err = service.create_request(7, create_req(false)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_request_allows_resubmission_over_done() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room(3, 7)]])
            .append_query_results([vec![request_row(11, SeasonRequestStatus::Done)]])
            .append_query_results([vec![request_row(12, SeasonRequestStatus::Pending)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let resp = service.create_request(7, create_req(true)).await.unwrap();
        assert_eq!(resp.id, 12);
        assert_eq!(resp.status, SeasonRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_request_validates_items_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let mut req = create_req(false);
        req.items.clear();
        let err = service.create_request(7, req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let mut req = create_req(false);
        req.items = vec![item(Some(0))];
        let err = service.create_request(7, req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_get_request_scopes_to_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Pending)]])
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Pending)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let stranger = AuthUser {
            id: 99,
            role: crate::utils::jwt::UserRole::Owner,
        };
        let err = service.get_request(&stranger, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let admin = AuthUser {
            id: 99,
            role: crate::utils::jwt::UserRole::Admin,
        };
        let resp = service.get_request(&admin, 1).await.unwrap();
        assert_eq!(resp.id, 1);
    }

    #[tokio::test]
    async fn test_reject_request_requires_pending() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Done)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let err = service.reject_request(1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_items_requires_pending() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Rejected)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let err = service.update_items(1, vec![item(Some(120))]).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_requests_reports_the_applied_page_size() {
        let count_row: BTreeMap<&str, sea_orm::Value> =
            BTreeMap::from([("num_items", 250i64.into())]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row]])
            .append_query_results([vec![request_row(1, SeasonRequestStatus::Pending)]])
            .into_connection();
        let service = SeasonRequestService::new(Arc::new(db));

        let query = SeasonRequestQuery {
            page: Some(1),
            per_page: Some(500),
            status: None,
            season_year: None,
        };
        let page = service.list_requests(7, &query).await.unwrap();
        assert_eq!(page.page_size, 100);
        assert_eq!(page.total, 250);
        assert_eq!(page.total_pages, 3);
    }
}
