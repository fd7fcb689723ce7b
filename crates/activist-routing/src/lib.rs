//! Activist Domain Resolution
//!
//! This crate classifies an incoming request by hostname:
//! - `HostConfig`: the reserved admin and root hostnames
//! - `DomainResolver`: maps `(path, hostname)` to a `RouteContext`
//! - `RouteContext`: admin, public host, public tenant or not found

pub mod host;
pub mod resolver;

pub use host::{HostConfig, hostname_from_authority, normalize_hostname};
pub use resolver::{DomainResolver, RouteContext};
