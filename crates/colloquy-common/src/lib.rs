pub mod errors;
pub mod id;
pub mod notice;

pub use errors::{ColloquyError, ConfigError};
pub use id::{new_id, new_short_id, SessionId, TurnId};
pub use notice::{Notice, NoticeLevel};
