//! Top-level envelope: the `aps` object followed by caller custom fields

use super::encoding::{Aps, ObjectWriter};
use super::types::{PayloadError, PayloadResult};

/// Reserved top-level key holding the notification object
pub const RESERVED_KEY: &str = "aps";

/// The full JSON object sent to the push service
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<'a> {
    aps: Aps<'a>,
    custom_fields: &'a serde_json::Map<String, serde_json::Value>,
}

impl<'a> Envelope<'a> {
    /// Combine the notification object with custom fields.
    ///
    /// Fails with [`PayloadError::ReservedKeyCollision`] when a custom field is
    /// named `aps`; the custom field is never allowed to replace the
    /// notification object.
    pub fn assemble(
        aps: Aps<'a>,
        custom_fields: &'a serde_json::Map<String, serde_json::Value>,
    ) -> PayloadResult<Self> {
        if custom_fields.contains_key(RESERVED_KEY) {
            return Err(PayloadError::ReservedKeyCollision);
        }
        Ok(Self { aps, custom_fields })
    }

    pub fn aps(&self) -> &Aps<'a> {
        &self.aps
    }

    pub fn aps_mut(&mut self) -> &mut Aps<'a> {
        &mut self.aps
    }

    /// Encode the envelope: `aps` first, then custom fields in insertion order
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        let mut obj = ObjectWriter::begin(&mut out);

        obj.key(RESERVED_KEY);
        self.aps.encode_into(obj.out);

        for (key, value) in self.custom_fields {
            obj.key(key);
            obj.out.push_str(&value.to_string());
        }

        obj.end();
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Payload;
    use serde_json::json;

    #[test]
    fn test_assemble_without_custom_fields() {
        let payload = Payload::new("Hello");
        let envelope = Envelope::assemble(Aps::from_payload(&payload), &payload.custom_fields)
            .unwrap();
        assert_eq!(envelope.encode(), br#"{"aps":{"alert":"Hello"}}"#.to_vec());
    }

    #[test]
    fn test_custom_fields_keep_insertion_order() {
        let payload = Payload::builder()
            .alert_text("Hi")
            .custom_field("zeta", json!(1))
            .custom_field("alpha", json!({"k": [true, null, "v"]}))
            .custom_field("mid", json!("text\n"))
            .build();

        let envelope = Envelope::assemble(Aps::from_payload(&payload), &payload.custom_fields)
            .unwrap();
        assert_eq!(
            String::from_utf8(envelope.encode()).unwrap(),
            r#"{"aps":{"alert":"Hi"},"zeta":1,"alpha":{"k":[true,null,"v"]},"mid":"text\n"}"#
        );
    }

    #[test]
    fn test_custom_keys_are_escaped() {
        let payload = Payload::builder()
            .alert_text("Hi")
            .custom_field("we\"ird", json!(false))
            .build();

        let envelope = Envelope::assemble(Aps::from_payload(&payload), &payload.custom_fields)
            .unwrap();
        assert_eq!(
            String::from_utf8(envelope.encode()).unwrap(),
            r#"{"aps":{"alert":"Hi"},"we\"ird":false}"#
        );
    }

    #[test]
    fn test_reserved_key_rejected() {
        let payload = Payload::builder()
            .alert_text("Hi")
            .custom_field("first", json!(1))
            .custom_field("aps", json!({"alert": "spoofed"}))
            .build();

        let result = Envelope::assemble(Aps::from_payload(&payload), &payload.custom_fields);
        assert_eq!(result, Err(PayloadError::ReservedKeyCollision));
    }

    #[test]
    fn test_similar_keys_allowed() {
        let payload = Payload::builder()
            .alert_text("Hi")
            .custom_field("APS", json!(1))
            .custom_field("aps2", json!(2))
            .build();

        let envelope = Envelope::assemble(Aps::from_payload(&payload), &payload.custom_fields);
        assert!(envelope.is_ok());
    }
}
