//! Admin-local types. Domain records come from `granite-world-core`.

pub mod session;

pub use session::{CurrentAdmin, Flash, keys as session_keys};
