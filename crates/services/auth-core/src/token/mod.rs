//! Access token issuance and validation.

mod clock;
mod token_service;

pub use clock::{Clock, SystemClock};
pub use token_service::{Claims, TokenError, TokenService};
