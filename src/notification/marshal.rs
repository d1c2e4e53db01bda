//! Size-bounded rendering of a payload envelope

use super::encoding::Aps;
use super::envelope::Envelope;
use super::types::{Payload, PayloadError, PayloadResult};

/// Marker appended to truncated alert text
pub const ELLIPSIS: &str = "...";

/// Rendered payload bytes and whether the alert text was trimmed to fit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

impl Payload {
    /// Encode the payload as JSON no larger than `max_bytes`.
    ///
    /// When the full encoding is too long the alert text (or the rich alert
    /// body) is shortened once and suffixed with `...`. The payload itself is
    /// left untouched.
    pub fn marshal(&self, max_bytes: usize) -> PayloadResult<Vec<u8>> {
        self.marshal_rendered(max_bytes).map(|rendered| rendered.bytes)
    }

    /// Same as [`Payload::marshal`], also reporting whether a trim happened
    pub fn marshal_rendered(&self, max_bytes: usize) -> PayloadResult<Rendered> {
        let envelope = Envelope::assemble(Aps::from_payload(self), &self.custom_fields)?;
        render_with_outcome(envelope, max_bytes)
    }
}

/// Render `envelope`, trimming its alert text once if it exceeds `max_bytes`.
///
/// The trim removes `overflow + 3` bytes from the end of the alert so the
/// ellipsis fits in the space freed. Only a single pass is made: the result is
/// not re-measured after the trim. Lengths are in bytes; a cut that would
/// split a multi-byte character moves back to the previous character
/// boundary.
pub fn render(envelope: Envelope<'_>, max_bytes: usize) -> PayloadResult<Vec<u8>> {
    render_with_outcome(envelope, max_bytes).map(|rendered| rendered.bytes)
}

/// [`render`], keeping track of whether the alert text was trimmed
pub fn render_with_outcome(
    mut envelope: Envelope<'_>,
    max_bytes: usize,
) -> PayloadResult<Rendered> {
    let encoded = envelope.encode();
    if encoded.len() <= max_bytes {
        return Ok(Rendered {
            bytes: encoded,
            truncated: false,
        });
    }

    let clip = encoded.len() - max_bytes + ELLIPSIS.len();
    let alert = envelope.aps().alert_text();
    if clip > alert.len() {
        return Err(PayloadError::PayloadTooLarge { max_bytes });
    }

    let truncated = truncate_with_ellipsis(alert, clip);
    envelope.aps_mut().set_alert_text(truncated);
    Ok(Rendered {
        bytes: envelope.encode(),
        truncated: true,
    })
}

/// Drop `clip` bytes from the end of `text` and append the ellipsis.
/// `clip` must not exceed `text.len()`.
fn truncate_with_ellipsis(text: &str, clip: usize) -> String {
    let mut end = text.len() - clip;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }

    let mut out = String::with_capacity(end + ELLIPSIS.len());
    out.push_str(&text[..end]);
    out.push_str(ELLIPSIS);
    out
}
