//! Domain types for the token lifecycle subsystem.

pub mod client;
pub mod refresh_token;
pub mod token_pair;

pub use client::{Client, Scope};
pub use refresh_token::RefreshTokenRecord;
pub use token_pair::{AccessGrant, TOKEN_TYPE_BEARER, TokenPair};
