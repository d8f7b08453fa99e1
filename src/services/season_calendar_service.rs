use std::path::PathBuf;

use crate::config::SeasonConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    SeasonCalendarResponse, SeasonPeriodResponse, SeasonSuggestionResponse,
    SeasonSuggestionsResponse, SuggestionQuery,
};
use crate::utils::min_stay::parse_min_stay_text;
use crate::utils::price_suggestion::suggest_price;
use crate::utils::season_csv::{SeasonCalendarParse, parse_season_csv};

/// Loads the yearly season calendar from the asset directory. The file
/// is small and re-parsed on every request; nothing is cached.
#[derive(Clone)]
pub struct SeasonCalendarService {
    config: SeasonConfig,
}

impl SeasonCalendarService {
    pub fn new(config: SeasonConfig) -> Self {
        Self { config }
    }

    fn calendar_path(&self, year: i32) -> PathBuf {
        PathBuf::from(&self.config.calendar_dir).join(format!("SAISON {year}.csv"))
    }

    async fn load_parsed(&self, year: i32) -> AppResult<SeasonCalendarParse> {
        let path = self.calendar_path(year);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("No season calendar for {year}")));
            }
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Failed to read season calendar {}: {e}",
                    path.display()
                )));
            }
        };

        let parse = parse_season_csv(&text);
        for issue in &parse.issues {
            log::warn!(
                "Season calendar {year}: line {} unusable: {}",
                issue.line,
                issue.reason
            );
        }
        Ok(parse)
    }

    pub async fn load_year(&self, year: i32) -> AppResult<SeasonCalendarResponse> {
        let parse = self.load_parsed(year).await?;
        Ok(SeasonCalendarResponse {
            year,
            periods: parse
                .periods
                .into_iter()
                .map(SeasonPeriodResponse::from)
                .collect(),
            issues: parse.issues,
        })
    }

    /// The periods decorated with suggestions, used to preload the
    /// owner's season form from their three base prices.
    pub async fn load_suggestions(
        &self,
        year: i32,
        query: &SuggestionQuery,
    ) -> AppResult<SeasonSuggestionsResponse> {
        let parse = self.load_parsed(year).await?;

        let periods = parse
            .periods
            .into_iter()
            .map(|p| {
                let suggested_price =
                    suggest_price(&p, query.base_min, query.base_standard, query.base_max);
                let suggested_min_stay = parse_min_stay_text(&p.min_stay_text);
                let d = SeasonPeriodResponse::from(p);
                SeasonSuggestionResponse {
                    start_date: d.start_date,
                    end_date: d.end_date,
                    start_date_display: d.start_date_display,
                    end_date_display: d.end_date_display,
                    period_type: d.period_type,
                    season: d.season,
                    min_stay_text: d.min_stay_text,
                    comment: d.comment,
                    suggested_price,
                    suggested_min_stay,
                }
            })
            .collect();

        Ok(SeasonSuggestionsResponse {
            year,
            periods,
            issues: parse.issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_calendar(year: i32, content: &str) -> SeasonCalendarService {
        let dir = std::env::temp_dir().join(format!(
            "season-calendar-test-{}-{}",
            std::process::id(),
            year
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("SAISON {year}.csv")), content).unwrap();
        SeasonCalendarService::new(SeasonConfig {
            calendar_dir: dir.to_string_lossy().into_owned(),
        })
    }

    const CSV: &str = "\
Début;Fin;Type;Saison;Séjour minimum;Commentaire
01/07/2026;31/08/2026;Semaine;Haute Saison;2 nuits;Vacances d'été
01/09/2026;30/09/2026;Semaine;Moyenne;2 nuits;
pas une ligne valide
";

    #[tokio::test]
    async fn test_load_year_returns_periods_and_issues() {
        let service = service_with_calendar(2026, CSV);
        let calendar = service.load_year(2026).await.unwrap();
        assert_eq!(calendar.year, 2026);
        assert_eq!(calendar.periods.len(), 2);
        assert_eq!(calendar.periods[0].start_date_display, "01/07/2026");
        assert_eq!(calendar.issues.len(), 1);
        assert_eq!(calendar.issues[0].line, 4);
    }

    #[tokio::test]
    async fn test_missing_year_is_not_found() {
        let service = service_with_calendar(2030, CSV);
        let err = service.load_year(2031).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unreadable_calendar_is_not_reported_missing() {
        let service = service_with_calendar(2032, CSV);
        let path = service.calendar_path(2032);
        std::fs::write(path, [0xff, 0xfe, 0x00]).unwrap();

        let err = service.load_year(2032).await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_suggestions_decorate_periods() {
        let service = service_with_calendar(2027, CSV);
        let query = SuggestionQuery {
            base_min: Some(90),
            base_standard: Some(120),
            base_max: Some(180),
        };
        let suggestions = service.load_suggestions(2027, &query).await.unwrap();
        assert_eq!(suggestions.periods.len(), 2);
        // 120 * 1.10 (haute) * 1.04 (vacances) = 137.28 -> 137
        assert_eq!(suggestions.periods[0].suggested_price, Some(137));
        assert_eq!(suggestions.periods[0].suggested_min_stay, Some(2));
        // 120 * 1.00 (moyenne) = 120
        assert_eq!(suggestions.periods[1].suggested_price, Some(120));
    }

    #[tokio::test]
    async fn test_suggestions_without_standard_price() {
        let service = service_with_calendar(2028, CSV);
        let query = SuggestionQuery {
            base_min: None,
            base_standard: None,
            base_max: None,
        };
        let suggestions = service.load_suggestions(2028, &query).await.unwrap();
        assert!(suggestions.periods.iter().all(|p| p.suggested_price.is_none()));
    }
}
