//! Platform - Infrastructure collaborators shared by the domain crates
//!
//! - `token`: signed access/refresh token issuance and verification
//! - `mailer`: email delivery behind a trait, with a log-based transport

pub mod mailer;
pub mod token;
