//! Token signing and issuance.

pub mod issuer;
pub mod jwt;

pub use issuer::{TokenConfig, TokenService};
pub use jwt::{Claims, JwtError, JwtService, REFRESH_TOKEN_TYPE, SigningKeyPair};
