//! Push notification payloads and their size-bounded JSON encoding.
//!
//! # Payload Pipeline
//!
//! Building the wire payload for a [`Payload`] goes through three steps:
//!
//! - Shape selection: a non-empty `alert_text` renders `alert` as a string,
//!   otherwise the [`RichAlert`] is rendered as an object
//! - Envelope assembly: the `aps` object is combined with the caller's custom
//!   fields; a custom field named `aps` is rejected
//! - Rendering: the envelope is encoded with a fixed field order and, if it is
//!   larger than the budget, the alert text is trimmed once and suffixed with
//!   `...`
//!
//! # Example
//!
//! ```
//! use ara_push_payload::notification::{Payload, MAX_PAYLOAD_SIZE};
//!
//! let payload = Payload::builder()
//!     .alert_text("Hello")
//!     .badge(0)
//!     .build();
//!
//! let bytes = payload.marshal(MAX_PAYLOAD_SIZE).unwrap();
//! assert_eq!(bytes, br#"{"aps":{"alert":"Hello","badge":0}}"#);
//! ```

mod encoding;
mod envelope;
mod marshal;
mod types;

pub use encoding::{Alert, Aps};
pub use envelope::{Envelope, RESERVED_KEY};
pub use marshal::{render, render_with_outcome, Rendered, ELLIPSIS};
pub use types::{
    AlertShape, Payload, PayloadBuilder, PayloadError, PayloadResult, Priority, RichAlert,
    LEGACY_MAX_PAYLOAD_SIZE, MAX_PAYLOAD_SIZE,
};
