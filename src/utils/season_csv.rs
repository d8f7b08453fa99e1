use csv::ReaderBuilder;

use crate::models::{SeasonCsvIssue, SeasonPeriod};
use crate::utils::dates::parse_csv_date;

#[derive(Debug, Default)]
pub struct SeasonCalendarParse {
    pub periods: Vec<SeasonPeriod>,
    pub issues: Vec<SeasonCsvIssue>,
}

/// Parses a semicolon-delimited season calendar. The header row is
/// skipped, blank lines are ignored, and every malformed data row is
/// reported as an issue instead of being dropped silently.
pub fn parse_season_csv(text: &str) -> SeasonCalendarParse {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut parse = SeasonCalendarParse::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                parse.issues.push(SeasonCsvIssue {
                    line,
                    reason: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        if record.len() < 6 {
            parse.issues.push(SeasonCsvIssue {
                line,
                reason: format!("expected at least 6 fields, got {}", record.len()),
            });
            continue;
        }

        let start_date = match parse_csv_date(&record[0]) {
            Ok(d) => d,
            Err(_) => {
                parse.issues.push(SeasonCsvIssue {
                    line,
                    reason: format!("invalid start date '{}'", record[0].trim()),
                });
                continue;
            }
        };
        let end_date = match parse_csv_date(&record[1]) {
            Ok(d) => d,
            Err(_) => {
                parse.issues.push(SeasonCsvIssue {
                    line,
                    reason: format!("invalid end date '{}'", record[1].trim()),
                });
                continue;
            }
        };

        if end_date < start_date {
            parse.issues.push(SeasonCsvIssue {
                line,
                reason: format!(
                    "end date {} before start date {}",
                    record[1].trim(),
                    record[0].trim()
                ),
            });
            continue;
        }

        parse.periods.push(SeasonPeriod {
            start_date,
            end_date,
            period_type: record[2].trim().to_string(),
            season: record[3].trim().to_string(),
            min_stay_text: record[4].trim().to_string(),
            comment: record[5].trim().to_string(),
        });
    }

    parse
}
