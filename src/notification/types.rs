use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload size limit of the HTTP/2 provider API, in bytes
pub const MAX_PAYLOAD_SIZE: usize = 2048;

/// Payload size limit of the legacy binary interface, in bytes
pub const LEGACY_MAX_PAYLOAD_SIZE: usize = 256;

/// Errors produced while building a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Cannot have a custom field named aps")]
    ReservedKeyCollision,

    #[error("Payload was too long to successfully marshal to less than {max_bytes}")]
    PayloadTooLarge { max_bytes: usize },
}

/// Result type for payload operations
pub type PayloadResult<T> = Result<T, PayloadError>;

/// A push notification payload as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    /// Plain alert text; when non-empty the simple alert shape is used
    pub alert_text: String,
    /// Structured alert, used only when `alert_text` is empty
    pub alert_body: RichAlert,
    /// Badge number; `Some(0)` clears the badge, `None` leaves it untouched
    pub badge: Option<i64>,
    pub sound: String,
    pub content_available: i64,
    pub category: String,

    /// Extra top-level fields, rendered after `aps` in insertion order
    pub custom_fields: serde_json::Map<String, serde_json::Value>,

    /// UNIX time in seconds after which the notification is invalid
    pub expiration_time: u32,
    /// Raw delivery priority, see [`Payload::priority`]
    pub priority: u8,
    /// Device push token
    pub token: String,
    /// Caller data kept alongside the payload for error handling; never sent
    pub extra_data: serde_json::Value,
}

/// Structured alert with display and localization fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichAlert {
    /// Text of the alert
    pub body: String,

    pub action_loc_key: String,
    pub loc_key: String,
    pub loc_args: Vec<String>,
    pub launch_image: String,

    pub title: String,
    pub title_loc_key: String,
    pub title_loc_args: Vec<String>,
}

impl RichAlert {
    /// Create a rich alert carrying only a body
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// Which alert representation a payload renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertShape {
    /// `alert` is a plain string
    Simple,
    /// `alert` is an object with localization fields
    Rich,
}

/// Delivery priority understood by the push service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    /// Delivered at a time that conserves power on the device (5)
    #[default]
    PowerConserving,
    /// Delivered immediately (10)
    Immediate,
}

impl Priority {
    /// Interpret a raw priority; anything other than 5 or 10 falls back to 5
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            10 => Priority::Immediate,
            _ => Priority::PowerConserving,
        }
    }

    /// Wire value of this priority
    pub fn as_u8(&self) -> u8 {
        match self {
            Priority::PowerConserving => 5,
            Priority::Immediate => 10,
        }
    }
}

impl Payload {
    /// Create a simple payload with only alert text
    pub fn new(alert_text: impl Into<String>) -> Self {
        Self {
            alert_text: alert_text.into(),
            ..Self::default()
        }
    }

    /// Create a builder for a payload
    pub fn builder() -> PayloadBuilder {
        PayloadBuilder::new()
    }

    /// Select the alert shape: non-empty `alert_text` wins, otherwise rich
    pub fn shape(&self) -> AlertShape {
        if self.alert_text.is_empty() {
            AlertShape::Rich
        } else {
            AlertShape::Simple
        }
    }

    /// Effective delivery priority
    pub fn priority(&self) -> Priority {
        Priority::from_raw(self.priority)
    }

    /// Expiry instant, `None` when no expiration time is set
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expiration_time == 0 {
            return None;
        }
        DateTime::<Utc>::from_timestamp(i64::from(self.expiration_time), 0)
    }

    /// Check whether the payload has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| now > expiry)
    }
}

/// Builder for creating payloads
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    payload: Payload,
}

impl PayloadBuilder {
    /// Create a new, empty payload builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simple alert text
    pub fn alert_text(mut self, text: impl Into<String>) -> Self {
        self.payload.alert_text = text.into();
        self
    }

    /// Set the rich alert
    pub fn alert_body(mut self, alert: RichAlert) -> Self {
        self.payload.alert_body = alert;
        self
    }

    /// Set the badge number (zero is rendered)
    pub fn badge(mut self, badge: i64) -> Self {
        self.payload.badge = Some(badge);
        self
    }

    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.payload.sound = sound.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.payload.category = category.into();
        self
    }

    pub fn content_available(mut self, value: i64) -> Self {
        self.payload.content_available = value;
        self
    }

    /// Append a custom top-level field
    pub fn custom_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.custom_fields.insert(key.into(), value);
        self
    }

    /// Append a custom top-level field from a serializable value
    pub fn custom_field_from<T: Serialize>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.payload.custom_fields.insert(key.into(), value);
        Ok(self)
    }

    /// Set the expiration time as UNIX seconds
    pub fn expiration_time(mut self, unix_seconds: u32) -> Self {
        self.payload.expiration_time = unix_seconds;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.payload.priority = priority.as_u8();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.payload.token = token.into();
        self
    }

    pub fn extra_data(mut self, data: serde_json::Value) -> Self {
        self.payload.extra_data = data;
        self
    }

    /// Build the payload
    pub fn build(self) -> Payload {
        self.payload
    }
}
