//! Content identity and conditional-request negotiation.

mod hash;
mod negotiate;

pub use hash::{ContentHash, compute_file_hash, compute_stream_hash};
pub use negotiate::{
    CacheDecision, format_http_date, negotiate, parse_http_date, truncate_to_secs,
};
