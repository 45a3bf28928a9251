//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod obtain_token;
pub mod refresh_token;
pub mod request_code;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::IdentityConfig;
pub use obtain_token::ObtainTokenUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use request_code::RequestCodeUseCase;
