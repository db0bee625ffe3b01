pub mod quote;
pub mod token;
pub mod user;

pub use quote::{QuoteResponse, QuoteResult, SoftError};
pub use token::{AccessToken, Claims, TokenPair};
pub use user::{CurrentUser, User};
