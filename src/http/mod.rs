//! HTTP protocol layer module
//!
//! Response builders and common headers, decoupled from routing.

pub mod response;

pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_500_response,
    build_file_response, build_health_response, build_json_response, build_options_response,
};
