pub mod season;
pub mod room;
pub mod calendar;
pub mod overrides;
pub mod season_request;
pub mod admin;

pub use season::season_config;
pub use room::room_config;
pub use calendar::calendar_config;
pub use overrides::overrides_config;
pub use season_request::season_request_config;
pub use admin::admin_config;
