use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::DbPool;
use crate::entities::{
    SeasonPricingItem, SeasonRequestStatus, price_override_entity as po, room_entity as rooms,
    season_price_request_entity as spr,
};
use crate::error::{AppError, AppResult};
use crate::external::{ChannelManagerApi, CmBlock, CmRestrictions};
use crate::models::ApplySeasonRequestResponse;
use crate::utils::dates::format_iso_date;

/// Turns an approved season request into channel-manager blocks, pushes
/// them, and records the trace rows.
#[derive(Clone)]
pub struct ReconciliationService {
    pool: DbPool,
    cm_api: Arc<Mutex<ChannelManagerApi>>,
}

/// One block per pricing item, in item order. `MINST` falls back to 2
/// nights when the item does not carry a minimum stay.
pub fn build_blocks(
    id_room_type: i64,
    id_rate: i32,
    cod_channel: &str,
    items: &[SeasonPricingItem],
) -> Vec<CmBlock> {
    items
        .iter()
        .map(|item| CmBlock {
            id_room_type,
            id_rate,
            cod_channel: cod_channel.to_string(),
            date_from: format_iso_date(item.start_date),
            date_to: format_iso_date(item.end_date),
            price: item.price,
            closed: item.closed.then_some(true),
            restrictions: CmRestrictions {
                min_stay: item.min_stay.unwrap_or(2),
                closed_on_arrival: item.closed_on_arrival.then_some(true),
                closed_on_departure: item.closed_on_departure.then_some(true),
            },
        })
        .collect()
}

impl ReconciliationService {
    pub fn new(pool: DbPool, cm_api: Arc<Mutex<ChannelManagerApi>>) -> Self {
        Self { pool, cm_api }
    }

    /// Applies a pending request: resolve the room type, push all blocks
    /// in one remote call, then record everything locally in one
    /// transaction. Validation failures abort before any side effect;
    /// a remote failure leaves the request pending and untouched.
    pub async fn apply_request(&self, request_id: i64) -> AppResult<ApplySeasonRequestResponse> {
        let request = spr::Entity::find_by_id(request_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Season request not found".to_string()))?;

        if request.status != SeasonRequestStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending requests can be applied, this one is {}",
                request.status
            )));
        }

        let (room, id_room_type) = self.resolve_room(&request).await?;

        let blocks = {
            let api = self.cm_api.lock().await;
            let blocks = build_blocks(id_room_type, api.id_rate(), api.cod_channel(), &request.items.0);
            api.save_settings(&blocks).await?;
            blocks
        };

        let batch_id = Uuid::new_v4();
        let updated = self.record_or_flag(&request, &room, batch_id).await?;
        Ok(ApplySeasonRequestResponse {
            request: updated.into(),
            batch_id,
            blocks_pushed: blocks.len(),
        })
    }

    /// Runs after the remote already accepted the push. Unwinding with a
    /// second call is not safe while the channel manager's idempotency
    /// contract is unverified, so a bookkeeping failure flags the request
    /// for a manual check instead.
    async fn record_or_flag(
        &self,
        request: &spr::Model,
        room: &rooms::Model,
        batch_id: Uuid,
    ) -> AppResult<spr::Model> {
        match self.record_apply(request, room, batch_id).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                log::error!(
                    "Request {}: channel manager accepted {} blocks but local bookkeeping failed: {e}",
                    request.id,
                    request.items.0.len()
                );
                self.flag_needs_reconciliation(request.id).await;
                Err(e)
            }
        }
    }

    /// Matches the request to the room mirror, by id first and by the
    /// denormalized name as a fallback for stale requests.
    async fn resolve_room(&self, request: &spr::Model) -> AppResult<(rooms::Model, i64)> {
        let mut room = rooms::Entity::find()
            .filter(rooms::Column::UserId.eq(request.user_id))
            .filter(rooms::Column::Id.eq(request.room_id))
            .one(&*self.pool)
            .await?;

        if room.is_none() {
            room = rooms::Entity::find()
                .filter(rooms::Column::UserId.eq(request.user_id))
                .filter(rooms::Column::Name.eq(request.room_name.clone()))
                .one(&*self.pool)
                .await?;
        }

        let room = room.ok_or_else(|| {
            AppError::ValidationError(format!(
                "No room of user {} matches '{}'",
                request.user_id, request.room_name
            ))
        })?;

        let id_room_type = room.channel_room_type_id().ok_or_else(|| {
            AppError::ValidationError(format!(
                "Room '{}' has no usable channel-manager room type",
                room.name
            ))
        })?;

        Ok((room, id_room_type))
    }

    async fn record_apply(
        &self,
        request: &spr::Model,
        room: &rooms::Model,
        batch_id: Uuid,
    ) -> AppResult<spr::Model> {
        let txn = self.pool.begin().await?;

        for item in &request.items.0 {
            po::ActiveModel {
                user_id: Set(request.user_id),
                room_id: Set(room.id),
                room_name: Set(room.name.clone()),
                start_date: Set(item.start_date),
                end_date: Set(item.end_date),
                price: Set(item.price),
                closed: Set(item.closed.then_some(true)),
                min_stay: Set(item.min_stay),
                closed_on_arrival: Set(item.closed_on_arrival.then_some(true)),
                closed_on_departure: Set(item.closed_on_departure.then_some(true)),
                batch_id: Set(Some(batch_id)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let superseded = spr::Entity::find()
            .filter(spr::Column::RoomId.eq(request.room_id))
            .filter(spr::Column::SeasonYear.eq(request.season_year))
            .filter(spr::Column::Status.eq(SeasonRequestStatus::Done))
            .filter(spr::Column::Id.ne(request.id))
            .order_by_desc(spr::Column::CreatedAt)
            .one(&txn)
            .await?;

        let mut am = request.clone().into_active_model();
        am.status = Set(SeasonRequestStatus::Done);
        am.supersedes_id = Set(superseded.map(|s| s.id));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    async fn flag_needs_reconciliation(&self, request_id: i64) {
        let flag = spr::Entity::update_many()
            .col_expr(spr::Column::NeedsReconciliation, Expr::value(true))
            .filter(spr::Column::Id.eq(request_id))
            .exec(&*self.pool)
            .await;
        if let Err(e) = flag {
            log::error!("Failed to flag request {request_id} for reconciliation: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelManagerConfig;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Transaction};

    fn item(price: Option<i32>, min_stay: Option<i32>) -> SeasonPricingItem {
        SeasonPricingItem {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            period_type: "Semaine".to_string(),
            season: "Haute Saison".to_string(),
            price,
            min_stay,
            comment: String::new(),
            closed: false,
            closed_on_arrival: false,
            closed_on_departure: false,
        }
    }

    fn room(cm_room_type_id: Option<&str>) -> rooms::Model {
        rooms::Model {
            id: 3,
            user_id: 7,
            name: "Chambre Lavande".to_string(),
            cm_room_type_id: cm_room_type_id.map(|s| s.to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    fn request(status: SeasonRequestStatus) -> spr::Model {
        spr::Model {
            id: 1,
            user_id: 7,
            season_year: 2026,
            room_id: 3,
            room_name: "Chambre Lavande".to_string(),
            items: crate::entities::SeasonPricingItems(vec![item(Some(137), Some(3))]),
            status,
            supersedes_id: None,
            needs_reconciliation: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn unauthenticated_api() -> Arc<Mutex<ChannelManagerApi>> {
        Arc::new(Mutex::new(ChannelManagerApi::new(ChannelManagerConfig {
            base_url: "http://cm.invalid".to_string(),
            username: "kerelia".to_string(),
            password: "secret".to_string(),
            cod_channel: "BE".to_string(),
            id_rate: 1,
        })))
    }

    fn assert_no_writes(log: &[Transaction]) {
        for t in log {
            let sql = format!("{t:?}");
            assert!(
                !sql.contains("INSERT") && !sql.contains("UPDATE"),
                "unexpected write: {sql}"
            );
        }
    }

    #[test]
    fn test_build_blocks_maps_items() {
        let items = vec![item(Some(137), Some(3)), item(None, None)];
        let blocks = build_blocks(42, 1, "BE", &items);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id_room_type, 42);
        assert_eq!(blocks[0].id_rate, 1);
        assert_eq!(blocks[0].cod_channel, "BE");
        assert_eq!(blocks[0].date_from, "2026-07-01");
        assert_eq!(blocks[0].date_to, "2026-08-31");
        assert_eq!(blocks[0].price, Some(137));
        assert_eq!(blocks[0].restrictions.min_stay, 3);

        // no price, no min stay: price omitted and MINST falls back to 2
        assert_eq!(blocks[1].price, None);
        assert_eq!(blocks[1].restrictions.min_stay, 2);
    }

    #[test]
    fn test_build_blocks_emits_flags_only_when_set() {
        let mut closed_item = item(None, None);
        closed_item.closed = true;
        closed_item.closed_on_arrival = true;
        let blocks = build_blocks(42, 1, "BE", &[closed_item, item(Some(100), None)]);

        assert_eq!(blocks[0].closed, Some(true));
        assert_eq!(blocks[0].restrictions.closed_on_arrival, Some(true));
        assert_eq!(blocks[0].restrictions.closed_on_departure, None);
        assert_eq!(blocks[1].closed, None);
        assert_eq!(blocks[1].restrictions.closed_on_arrival, None);
    }

    #[test]
    fn test_room_type_id_parsing() {
        assert_eq!(room(Some("42")).channel_room_type_id(), Some(42));
        assert_eq!(room(Some(" 7 ")).channel_room_type_id(), Some(7));
        assert_eq!(room(Some("abc")).channel_room_type_id(), None);
        assert_eq!(room(Some("-3")).channel_room_type_id(), None);
        assert_eq!(room(Some("0")).channel_room_type_id(), None);
        assert_eq!(room(None).channel_room_type_id(), None);
    }

    #[tokio::test]
    async fn test_apply_requires_pending() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(SeasonRequestStatus::Done)]])
            .into_connection();
        let service = ReconciliationService::new(Arc::new(db), unauthenticated_api());

        let err = service.apply_request(1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_apply_aborts_without_room_type_before_any_side_effect() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(SeasonRequestStatus::Pending)]])
            .append_query_results([vec![room(None)]])
            .into_connection();
        let service = ReconciliationService::new(Arc::new(db), unauthenticated_api());

        let err = service.apply_request(1).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let pool = Arc::into_inner(service.pool).unwrap();
        assert_no_writes(&pool.into_transaction_log());
    }

    #[tokio::test]
    async fn test_apply_remote_failure_leaves_request_untouched() {
        // The api holds no token, so the push fails before reaching the
        // network; nothing may be written locally and nothing flagged.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(SeasonRequestStatus::Pending)]])
            .append_query_results([vec![room(Some("42"))]])
            .into_connection();
        let service = ReconciliationService::new(Arc::new(db), unauthenticated_api());

        let err = service.apply_request(1).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApiError(_)));
        let pool = Arc::into_inner(service.pool).unwrap();
        assert_no_writes(&pool.into_transaction_log());
    }

    fn trace_row(id: i64) -> po::Model {
        po::Model {
            id,
            user_id: 7,
            room_id: 3,
            room_name: "Chambre Lavande".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            price: Some(137),
            closed: None,
            min_stay: Some(3),
            closed_on_arrival: None,
            closed_on_departure: None,
            batch_id: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_record_apply_links_the_superseded_request() {
        let mut prior = request(SeasonRequestStatus::Done);
        prior.id = 9;
        let mut applied = request(SeasonRequestStatus::Done);
        applied.supersedes_id = Some(9);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![trace_row(21)]])
            .append_query_results([vec![prior]])
            .append_query_results([vec![applied]])
            .into_connection();
        let service = ReconciliationService::new(Arc::new(db), unauthenticated_api());

        let updated = service
            .record_apply(
                &request(SeasonRequestStatus::Pending),
                &room(Some("42")),
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, SeasonRequestStatus::Done);
        assert_eq!(updated.supersedes_id, Some(9));
    }

    #[tokio::test]
    async fn test_failed_bookkeeping_flags_the_request() {
        // Trace insert refused, so the recording transaction rolls back
        // and the request must end up flagged for a manual check.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("trace insert refused".to_string())])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = ReconciliationService::new(Arc::new(db), unauthenticated_api());

        let err = service
            .record_or_flag(
                &request(SeasonRequestStatus::Pending),
                &room(Some("42")),
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));

        let pool = Arc::into_inner(service.pool).unwrap();
        let flagged = pool.into_transaction_log().iter().any(|t| {
            let sql = format!("{t:?}");
            sql.contains("UPDATE") && sql.contains("needs_reconciliation")
        });
        assert!(flagged, "reconciliation flag update was not issued");
    }
}
