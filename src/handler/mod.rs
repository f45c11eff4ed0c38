//! Request handling module
//!
//! Routes `/proxy`, health probes and static files.

pub mod router;
pub mod static_files;

pub use router::{handle_request, PROXY_PATH};
