use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ChannelManagerConfig;
use crate::error::{AppError, AppResult};
use crate::utils::dates::format_iso_date;

#[derive(Debug, Serialize, Deserialize)]
pub struct CmResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmRestrictions {
    #[serde(rename = "MINST")]
    pub min_stay: i32,
    #[serde(rename = "CLARR", skip_serializing_if = "Option::is_none")]
    pub closed_on_arrival: Option<bool>,
    #[serde(rename = "CLDEP", skip_serializing_if = "Option::is_none")]
    pub closed_on_departure: Option<bool>,
}

/// One per-date-range setting pushed to the channel manager. Dates are
/// ISO `yyyy-MM-dd` on this wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmBlock {
    pub id_room_type: i64,
    pub id_rate: i32,
    pub cod_channel: String,
    pub date_from: String,
    pub date_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    pub restrictions: CmRestrictions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmDayPrice {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub closed: Option<bool>,
    pub min_stay: Option<i32>,
}

/// Builds the `{cm: {block_0: …, block_1: …}}` payload the channel
/// manager expects for a settings push.
pub fn build_settings_payload(blocks: &[CmBlock]) -> serde_json::Value {
    let mut cm = serde_json::Map::new();
    for (i, block) in blocks.iter().enumerate() {
        cm.insert(format!("block_{i}"), json!(block));
    }
    json!({ "cm": cm })
}

pub struct ChannelManagerApi {
    client: Client,
    config: ChannelManagerConfig,
    token: Option<String>,
}

impl ChannelManagerApi {
    pub fn new(config: ChannelManagerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
        }
    }

    pub fn cod_channel(&self) -> &str {
        &self.config.cod_channel
    }

    pub fn id_rate(&self) -> i32 {
        self.config.id_rate
    }

    pub async fn login(&mut self) -> AppResult<()> {
        let url = format!("{}/auth/login", self.config.base_url);
        let password_hash = format!("{:x}", md5::compute(&self.config.password));

        let data = json!({
            "username": self.config.username,
            "password": password_hash,
        });

        let response = self.client.post(&url).json(&data).send().await?;
        let result: CmResponse<serde_json::Value> = response.json().await?;

        if !result.success {
            return Err(AppError::ExternalApiError(format!(
                "Channel manager login failed: {}",
                result.message
            )));
        }

        let data = result.data.ok_or_else(|| {
            AppError::ExternalApiError("Channel manager login returned no data".to_string())
        })?;

        self.token = data["token"].as_str().map(|s| s.to_string());
        if self.token.is_none() {
            return Err(AppError::ExternalApiError(
                "Channel manager login returned no token".to_string(),
            ));
        }

        log::info!("Channel manager login ok");
        Ok(())
    }

    /// Pushes all blocks in one request. The remote applies the payload
    /// as a whole or rejects it; there is no per-block status.
    pub async fn save_settings(&self, blocks: &[CmBlock]) -> AppResult<()> {
        let token = self.ensure_logged_in()?;

        let url = format!("{}/cm/settings", self.config.base_url);
        let payload = build_settings_payload(blocks);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .header("Authorization", token)
            .send()
            .await?;

        let result: CmResponse<serde_json::Value> = response.json().await?;

        if !result.success {
            return Err(AppError::ExternalApiError(format!(
                "Channel manager rejected settings: {}",
                result.message
            )));
        }

        log::info!("Pushed {} blocks to channel manager", blocks.len());
        Ok(())
    }

    pub async fn get_room_prices(
        &self,
        id_room_type: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> AppResult<Vec<CmDayPrice>> {
        let token = self.ensure_logged_in()?;

        let url = format!("{}/cm/room-prices", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("id_room_type", id_room_type.to_string()),
                ("date_from", format_iso_date(date_from)),
                ("date_to", format_iso_date(date_to)),
            ])
            .header("Authorization", token)
            .send()
            .await?;

        let result: CmResponse<Vec<CmDayPrice>> = response.json().await?;

        if !result.success {
            return Err(AppError::ExternalApiError(format!(
                "Channel manager price fetch failed: {}",
                result.message
            )));
        }

        result.data.ok_or_else(|| {
            AppError::ExternalApiError("Channel manager price fetch returned no data".to_string())
        })
    }

    fn ensure_logged_in(&self) -> AppResult<&str> {
        self.token.as_deref().ok_or_else(|| {
            AppError::ExternalApiError("Not logged in to the channel manager".to_string())
        })
    }
}
