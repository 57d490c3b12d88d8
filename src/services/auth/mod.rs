pub mod factory;
pub mod jwt;
pub mod password;
pub mod token_service;

pub use factory::{build_password_hasher, build_token_service};
pub use jwt::JwtCodec;
pub use password::PasswordHasher;
pub use token_service::TokenService;
