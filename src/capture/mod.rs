//! Capture subsystem shared by both interceptor placements.
//!
//! # Data Flow
//! ```text
//! request parts + buffered body
//!     → extract.rs (method, absolute URI, caller ip, headers, media type)
//!     → normalize.rs (body text without line breaks)
//!     → record.rs (RequestRecord / ResponseRecord / ExchangeRecord)
//!     → Auditor (serialize, emit to sink)
//! ```

pub mod extract;
pub mod normalize;
pub mod record;

pub use normalize::strip_line_breaks;
pub use record::{ExchangeRecord, HeaderEntry, RequestRecord, RequestSide, ResponseRecord, ResponseSide};
