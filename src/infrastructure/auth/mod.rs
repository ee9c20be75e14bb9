//! Token authentication infrastructure

mod jwt;

pub use jwt::{
    IssuedToken, JwtClaims, JwtConfig, JwtService, TokenError, TokenService,
    DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, MIN_TOKEN_TTL_SECS,
};
