pub mod dates;
pub mod jwt;
pub mod min_stay;
pub mod price_suggestion;
pub mod season_csv;
