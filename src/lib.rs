//! Invoice and customer administration dashboard.
//!
//! The crate is layered the usual hexagonal way: `domain` holds entities,
//! value objects and ports, `application` holds the use cases driven by
//! form submissions, `adapters` holds the HTTP surface and `infrastructure`
//! holds the Postgres, Redis and Argon2 implementations of the ports.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_support;
