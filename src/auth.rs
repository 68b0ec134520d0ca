//! Auth-domain identifiers, credentials, and the normalized identity model.

pub mod id;
pub mod identity;
pub mod token;

pub use id::*;
pub use identity::*;
pub use token::*;
