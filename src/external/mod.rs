pub mod channel_manager;

pub use channel_manager::*;
