//! Session credentials, lifecycle states, and the signed-in user profile.

pub mod profile;
pub mod secret;
pub mod session;

pub use profile::*;
pub use secret::*;
pub use session::*;
