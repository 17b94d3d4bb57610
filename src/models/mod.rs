//! Models contains all structures that are used in different
//! modules of the app

pub mod comment;
pub mod locale;
pub mod moderation;
pub mod notification;
pub mod pagination;
pub mod types;
pub mod validation_rules;

pub use self::comment::*;
pub use self::locale::*;
pub use self::moderation::*;
pub use self::notification::*;
pub use self::pagination::*;
pub use self::types::*;
pub use self::validation_rules::*;
