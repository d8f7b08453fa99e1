use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::dates::format_csv_date;

/// One line of the season calendar, as parsed from the yearly CSV.
/// Never persisted; the file is re-parsed on each load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_type: String,
    pub season: String,
    pub min_stay_text: String,
    pub comment: String,
}

/// A calendar row that could not be used, reported instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeasonCsvIssue {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonPeriodResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `dd/MM/yyyy`, as shown in the owner's form.
    pub start_date_display: String,
    pub end_date_display: String,
    pub period_type: String,
    pub season: String,
    pub min_stay_text: String,
    pub comment: String,
}

impl From<SeasonPeriod> for SeasonPeriodResponse {
    fn from(p: SeasonPeriod) -> Self {
        Self {
            start_date_display: format_csv_date(p.start_date),
            end_date_display: format_csv_date(p.end_date),
            start_date: p.start_date,
            end_date: p.end_date,
            period_type: p.period_type,
            season: p.season,
            min_stay_text: p.min_stay_text,
            comment: p.comment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonCalendarResponse {
    pub year: i32,
    pub periods: Vec<SeasonPeriodResponse>,
    pub issues: Vec<SeasonCsvIssue>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionQuery {
    pub base_min: Option<i32>,
    pub base_standard: Option<i32>,
    pub base_max: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonSuggestionResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_date_display: String,
    pub end_date_display: String,
    pub period_type: String,
    pub season: String,
    pub min_stay_text: String,
    pub comment: String,
    pub suggested_price: Option<i32>,
    pub suggested_min_stay: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeasonSuggestionsResponse {
    pub year: i32,
    pub periods: Vec<SeasonSuggestionResponse>,
    pub issues: Vec<SeasonCsvIssue>,
}
