//! Value Objects

pub mod confirmation_code;
pub mod email;
pub mod username;

pub use confirmation_code::ConfirmationCode;
pub use email::Email;
pub use username::Username;
