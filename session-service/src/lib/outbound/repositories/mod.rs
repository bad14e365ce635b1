pub mod refresh_token;
pub mod user;

pub use refresh_token::PostgresRefreshTokenRepository;
pub use user::PostgresUserRepository;
