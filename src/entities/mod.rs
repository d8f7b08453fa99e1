pub mod price_overrides;
pub mod profiles;
pub mod rooms;
pub mod season_price_requests;

pub use price_overrides as price_override_entity;
pub use profiles as profile_entity;
pub use rooms as room_entity;
pub use season_price_requests as season_price_request_entity;

pub use season_price_requests::{SeasonPricingItem, SeasonPricingItems, SeasonRequestStatus};
