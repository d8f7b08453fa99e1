pub mod calendar_service;
pub mod override_service;
pub mod reconciliation_service;
pub mod season_calendar_service;
pub mod season_request_service;

pub use calendar_service::*;
pub use override_service::*;
pub use reconciliation_service::*;
pub use season_calendar_service::*;
pub use season_request_service::*;
