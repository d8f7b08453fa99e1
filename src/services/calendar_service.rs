use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tokio::sync::Mutex;

use crate::database::DbPool;
use crate::entities::room_entity as rooms;
use crate::error::{AppError, AppResult};
use crate::external::{ChannelManagerApi, CmDayPrice};
use crate::models::{
    CalendarQuery, DayPrice, PriceCalendarResponse, RoomPriceCalendar, RoomResponse,
};

const MAX_GRID_DAYS: i64 = 366;

#[derive(Clone)]
pub struct CalendarService {
    pool: DbPool,
    cm_api: Arc<Mutex<ChannelManagerApi>>,
}

impl CalendarService {
    pub fn new(pool: DbPool, cm_api: Arc<Mutex<ChannelManagerApi>>) -> Self {
        Self { pool, cm_api }
    }

    pub async fn list_rooms(&self, user_id: i64) -> AppResult<Vec<RoomResponse>> {
        let rows = rooms::Entity::find()
            .filter(rooms::Column::UserId.eq(user_id))
            .order_by_asc(rooms::Column::Name)
            .all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Per-room nightly prices straight from the channel manager. Rooms
    /// are fetched concurrently; one failing room gets an error slot
    /// while the others still come back filled.
    pub async fn price_grid(
        &self,
        user_id: i64,
        query: &CalendarQuery,
    ) -> AppResult<PriceCalendarResponse> {
        if query.date_to < query.date_from {
            return Err(AppError::ValidationError(
                "date_to must not precede date_from".to_string(),
            ));
        }
        if (query.date_to - query.date_from).num_days() >= MAX_GRID_DAYS {
            return Err(AppError::ValidationError(
                "Date range cannot exceed a year".to_string(),
            ));
        }
        let room_ids = parse_room_ids(&query.room_ids)?;

        let selected = rooms::Entity::find()
            .filter(rooms::Column::UserId.eq(user_id))
            .filter(rooms::Column::Id.is_in(room_ids))
            .order_by_asc(rooms::Column::Id)
            .all(&*self.pool)
            .await?;
        if selected.is_empty() {
            return Err(AppError::NotFound("No matching rooms".to_string()));
        }

        let api = self.cm_api.lock().await;
        let fetches = selected.iter().map(|room| {
            let api = &api;
            async move {
                match room.channel_room_type_id() {
                    Some(id_room_type) => {
                        api.get_room_prices(id_room_type, query.date_from, query.date_to)
                            .await
                    }
                    None => Err(AppError::ValidationError(
                        "Room is not connected to the channel manager".to_string(),
                    )),
                }
            }
        });
        let results = join_all(fetches).await;
        drop(api);

        Ok(grid_from_results(
            query.date_from,
            query.date_to,
            selected,
            results,
        ))
    }
}

fn parse_room_ids(raw: &str) -> AppResult<Vec<i64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::ValidationError(format!("Invalid room id '{s}'")))
        })
        .collect::<AppResult<Vec<i64>>>()?;
    if ids.is_empty() {
        return Err(AppError::ValidationError(
            "At least one room id is required".to_string(),
        ));
    }
    Ok(ids)
}

/// Assembles the response grid: one day slot per date in range, filled
/// from whatever the channel manager returned for that room.
fn grid_from_results(
    date_from: NaiveDate,
    date_to: NaiveDate,
    selected: Vec<rooms::Model>,
    results: Vec<AppResult<Vec<CmDayPrice>>>,
) -> PriceCalendarResponse {
    let rooms_out = selected
        .into_iter()
        .zip(results)
        .map(|(room, result)| match result {
            Ok(day_prices) => {
                let by_date: HashMap<NaiveDate, CmDayPrice> =
                    day_prices.into_iter().map(|d| (d.date, d)).collect();
                let days = date_from
                    .iter_days()
                    .take_while(|d| *d <= date_to)
                    .map(|date| match by_date.get(&date) {
                        Some(d) => DayPrice {
                            date,
                            price: d.price,
                            closed: d.closed,
                            min_stay: d.min_stay,
                        },
                        None => DayPrice {
                            date,
                            price: None,
                            closed: None,
                            min_stay: None,
                        },
                    })
                    .collect();
                RoomPriceCalendar {
                    room_id: room.id,
                    room_name: room.name,
                    days,
                    error: None,
                }
            }
            Err(e) => RoomPriceCalendar {
                room_id: room.id,
                room_name: room.name,
                days: vec![],
                error: Some(e.to_string()),
            },
        })
        .collect();

    PriceCalendarResponse {
        date_from,
        date_to,
        rooms: rooms_out,
    }
}
