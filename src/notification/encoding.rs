//! Canonical JSON encoding of the `aps` object.
//!
//! Field order and omission rules are fixed by hand; alert truncation depends
//! on the exact encoded size.
//!
//! - `aps`: `alert`, `badge`, `category`, `content-available`, `sound`
//! - rich `alert`: `body`, `action-loc-key`, `launch-image`, `loc-args`,
//!   `loc-key`, `title`, `title-loc-args`, `title-loc-key`
//!
//! Empty strings, empty arrays, an unset badge and a zero `content-available`
//! are omitted.

use std::borrow::Cow;

use super::types::{AlertShape, Payload, RichAlert};

/// Alert portion of the `aps` object
#[derive(Debug, Clone, PartialEq)]
pub enum Alert<'a> {
    /// Plain string alert
    Simple(Cow<'a, str>),
    /// Structured alert, split so the body can be replaced on its own
    Rich {
        /// Rendered as `body`; always wins over `rest.body`
        body: Cow<'a, str>,
        /// Every other alert field; `rest.body` is never read
        rest: &'a RichAlert,
    },
}

/// The notification object stored under the reserved `aps` key
#[derive(Debug, Clone, PartialEq)]
pub struct Aps<'a> {
    pub alert: Alert<'a>,
    pub badge: Option<i64>,
    pub sound: &'a str,
    pub category: &'a str,
    pub content_available: i64,
}

impl<'a> Aps<'a> {
    /// Build the `aps` object for the payload's alert shape
    pub fn from_payload(payload: &'a Payload) -> Self {
        let alert = match payload.shape() {
            AlertShape::Simple => Alert::Simple(Cow::Borrowed(payload.alert_text.as_str())),
            AlertShape::Rich => Alert::Rich {
                body: Cow::Borrowed(payload.alert_body.body.as_str()),
                rest: &payload.alert_body,
            },
        };

        Self {
            alert,
            badge: payload.badge,
            sound: &payload.sound,
            category: &payload.category,
            content_available: payload.content_available,
        }
    }

    /// The text subject to truncation: the simple alert or the rich body
    pub fn alert_text(&self) -> &str {
        match &self.alert {
            Alert::Simple(text) => text,
            Alert::Rich { body, .. } => body,
        }
    }

    /// Replace the truncatable alert text
    pub fn set_alert_text(&mut self, text: String) {
        match &mut self.alert {
            Alert::Simple(current) => *current = Cow::Owned(text),
            Alert::Rich { body, .. } => *body = Cow::Owned(text),
        }
    }

    pub(crate) fn encode_into(&self, out: &mut String) {
        let mut obj = ObjectWriter::begin(out);

        match &self.alert {
            Alert::Simple(text) => obj.string("alert", text),
            Alert::Rich { body, rest } => {
                obj.key("alert");
                encode_rich_alert(obj.out, body, rest);
            }
        }

        if let Some(badge) = self.badge {
            obj.int("badge", badge);
        }
        if !self.category.is_empty() {
            obj.string("category", self.category);
        }
        if self.content_available != 0 {
            obj.int("content-available", self.content_available);
        }
        if !self.sound.is_empty() {
            obj.string("sound", self.sound);
        }

        obj.end();
    }
}

fn encode_rich_alert(out: &mut String, body: &str, alert: &RichAlert) {
    let mut obj = ObjectWriter::begin(out);

    obj.string("body", body);
    obj.string_if_present("action-loc-key", &alert.action_loc_key);
    obj.string_if_present("launch-image", &alert.launch_image);
    obj.string_array_if_present("loc-args", &alert.loc_args);
    obj.string_if_present("loc-key", &alert.loc_key);
    obj.string_if_present("title", &alert.title);
    obj.string_array_if_present("title-loc-args", &alert.title_loc_args);
    obj.string_if_present("title-loc-key", &alert.title_loc_key);

    obj.end();
}

/// Writes a JSON object one member at a time, handling separators
pub(crate) struct ObjectWriter<'o> {
    pub(crate) out: &'o mut String,
    first: bool,
}

impl<'o> ObjectWriter<'o> {
    pub(crate) fn begin(out: &'o mut String) -> Self {
        out.push('{');
        Self { out, first: true }
    }

    /// Write a member name and the `:` separator; the caller writes the value
    pub(crate) fn key(&mut self, key: &str) {
        if !self.first {
            self.out.push(',');
        }
        self.first = false;
        write_escaped_str(self.out, key);
        self.out.push(':');
    }

    pub(crate) fn string(&mut self, key: &str, value: &str) {
        self.key(key);
        write_escaped_str(self.out, value);
    }

    fn string_if_present(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.string(key, value);
        }
    }

    fn int(&mut self, key: &str, value: i64) {
        self.key(key);
        self.out.push_str(&value.to_string());
    }

    fn string_array_if_present(&mut self, key: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        self.key(key);
        self.out.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            write_escaped_str(self.out, value);
        }
        self.out.push(']');
    }

    pub(crate) fn end(self) {
        self.out.push('}');
    }
}

/// Write `value` as a quoted JSON string literal.
///
/// Escapes `"`, `\` and every control character below U+0020, using the
/// short forms where JSON has them. Matches `serde_json` output byte for byte.
pub(crate) fn write_escaped_str(out: &mut String, value: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    out.push('"');
    let mut start = 0;
    for (i, byte) in value.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0c => "\\f",
            0x00..=0x1f => "",
            _ => continue,
        };

        // ASCII bytes never split a code point, so slicing here is safe
        out.push_str(&value[start..i]);
        if escape.is_empty() {
            out.push_str("\\u00");
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        } else {
            out.push_str(escape);
        }
        start = i + 1;
    }
    out.push_str(&value[start..]);
    out.push('"');
}
