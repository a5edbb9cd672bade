mod session;

pub use session::{logout_handler, me_handler};

/// Session key holding the authenticated [`ecoplaza_core::UserIdentity`].
pub const SESSION_USER_KEY: &str = "user_identity";
