use crate::models::SeasonPeriod;

/// Multiplier applied to the standard nightly price depending on the
/// season label. Substring match, case-insensitive; "très haute" must be
/// checked before "haute" to avoid a false positive.
pub fn season_multiplier(season: &str) -> f64 {
    let label = season.to_lowercase();
    if label.contains("très haute") || label.contains("tres haute") {
        1.20
    } else if label.contains("haute") {
        1.10
    } else if label.contains("moyenne") {
        1.00
    } else if label.contains("basse") {
        0.90
    } else {
        1.00
    }
}

/// Additive boost on top of the season multiplier: week-end periods sell
/// higher, and so do school-holiday weeks. The trailing space in "zone "
/// is intentional, to match "zone A"/"zone B,C" comments without firing on
/// unrelated words.
pub fn extra_boost(period_type: &str, comment: &str) -> f64 {
    let mut boost = 0.0;
    let period_type = period_type.to_lowercase();
    if period_type.contains("week-end") || period_type.contains("weekend") {
        boost += 0.08;
    }
    let comment = comment.to_lowercase();
    if comment.contains("vacances") || comment.contains("zone ") {
        boost += 0.04;
    }
    1.0 + boost
}

/// Suggest a nightly price for a period from the owner's base prices.
/// Returns None when no usable standard price is given; otherwise the
/// rounded suggestion, clamped to [base_min, base_max] for whichever
/// bounds are present and positive.
pub fn suggest_price(
    period: &SeasonPeriod,
    base_min: Option<i32>,
    base_standard: Option<i32>,
    base_max: Option<i32>,
) -> Option<i32> {
    let standard = base_standard.filter(|v| *v > 0)?;

    let raw = (standard as f64)
        * season_multiplier(&period.season)
        * extra_boost(&period.period_type, &period.comment);
    let mut price = raw.round() as i32;

    if let Some(min) = base_min.filter(|v| *v > 0) {
        price = price.max(min);
    }
    if let Some(max) = base_max.filter(|v| *v > 0) {
        price = price.min(max);
    }

    Some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(period_type: &str, season: &str, comment: &str) -> SeasonPeriod {
        SeasonPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            period_type: period_type.to_string(),
            season: season.to_string(),
            min_stay_text: "2 nuits".to_string(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_season_multiplier() {
        assert_eq!(season_multiplier("Très Haute Saison"), 1.20);
        assert_eq!(season_multiplier("tres haute saison"), 1.20);
        assert_eq!(season_multiplier("Haute Saison"), 1.10);
        assert_eq!(season_multiplier("Moyenne"), 1.00);
        assert_eq!(season_multiplier("Basse"), 0.90);
        assert_eq!(season_multiplier("BASSE SAISON"), 0.90);
        assert_eq!(season_multiplier("n/a"), 1.00);
        assert_eq!(season_multiplier(""), 1.00);
    }

    #[test]
    fn test_extra_boost() {
        assert_eq!(extra_boost("Week-end", ""), 1.08);
        assert_eq!(extra_boost("weekend", ""), 1.08);
        assert_eq!(extra_boost("", "Vacances de Noël"), 1.04);
        assert_eq!(extra_boost("", "zone A"), 1.04);
        // "zone " needs its trailing space: "amazone" must not match
        assert_eq!(extra_boost("", "amazone"), 1.0);
        // both boosts combine additively
        assert_eq!(extra_boost("Week-end", "Vacances d'hiver"), 1.12);
        assert_eq!(extra_boost("Semaine", ""), 1.0);
    }

    #[test]
    fn test_suggest_price_requires_standard() {
        let p = period("Semaine", "Haute Saison", "");
        assert_eq!(suggest_price(&p, Some(90), None, Some(180)), None);
        assert_eq!(suggest_price(&p, Some(90), Some(0), Some(180)), None);
        assert_eq!(suggest_price(&p, Some(90), Some(-5), Some(180)), None);
    }

    #[test]
    fn test_suggest_price_worked_example() {
        // 120 * 1.10 * 1.04 = 137.28 -> 137, inside [90, 180]
        let p = period("Semaine", "Haute Saison", "Vacances d'été");
        assert_eq!(suggest_price(&p, Some(90), Some(120), Some(180)), Some(137));
    }

    #[test]
    fn test_suggest_price_clamps_to_bounds() {
        let p = period("Week-end", "Très Haute Saison", "Vacances de Noël");
        // 100 * 1.20 * 1.12 = 134.4 -> 134, clamped to max 120
        assert_eq!(suggest_price(&p, Some(80), Some(100), Some(120)), Some(120));

        let p = period("Semaine", "Basse", "");
        // 100 * 0.90 = 90, clamped up to min 95
        assert_eq!(suggest_price(&p, Some(95), Some(100), Some(200)), Some(95));
    }

    #[test]
    fn test_suggest_price_ignores_non_positive_bounds() {
        let p = period("Semaine", "Basse", "");
        // min/max of 0 act as absent bounds
        assert_eq!(suggest_price(&p, Some(0), Some(100), Some(0)), Some(90));
        assert_eq!(suggest_price(&p, None, Some(100), None), Some(90));
    }

    #[test]
    fn test_suggest_price_within_bounds_property() {
        let cases = [
            ("Semaine", "Basse", ""),
            ("Semaine", "Moyenne", ""),
            ("Week-end", "Haute Saison", "Vacances de printemps zone B"),
            ("Week-end", "Très Haute Saison", "Vacances d'été"),
        ];
        for (t, s, c) in cases {
            let p = period(t, s, c);
            let suggested = suggest_price(&p, Some(90), Some(120), Some(180)).unwrap();
            assert!((90..=180).contains(&suggested), "{suggested} out of bounds");
        }
    }
}
