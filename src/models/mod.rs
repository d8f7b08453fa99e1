pub mod calendar;
pub mod common;
pub mod pagination;
pub mod price_override;
pub mod room;
pub mod season;
pub mod season_request;

pub use calendar::*;
pub use common::*;
pub use pagination::*;
pub use price_override::*;
pub use room::*;
pub use season::*;
pub use season_request::*;
