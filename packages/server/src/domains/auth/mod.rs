//! Auth domain - token verification for the admin API
//!
//! Sign-in itself happens elsewhere; this side only issues tokens for
//! tooling and verifies the ones presented to the API.

pub mod jwt;

pub use jwt::{Claims, JwtService};
