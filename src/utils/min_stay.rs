use regex::Regex;

/// Extract a numeric minimum stay from the calendar's free-text column
/// ("2 nuits", "3 nuits minimum", "7"). Returns None when the text holds
/// no usable number.
pub fn parse_min_stay_text(text: &str) -> Option<i32> {
    let re = Regex::new(r"\d+").unwrap();
    re.find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .filter(|n| *n > 0)
}
