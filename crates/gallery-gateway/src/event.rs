//! Access events

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Value of the `type` field
pub const IMAGE_ACCESS: &str = "Image Access";

/// One image request, as posted to the webhook
///
/// ```json
/// {"type":"Image Access","filename":"a.png","ip":"1.2.3.4","userAgent":"curl/8","timestamp":"2024-05-01T10:00:00.000Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub filename: String,
    pub ip: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl AccessEvent {
    /// Event stamped with the current time
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self::at(filename, ip, user_agent, Utc::now())
    }

    /// Event with an explicit timestamp
    #[must_use]
    pub fn at(
        filename: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: IMAGE_ACCESS.to_string(),
            filename: filename.into(),
            ip: ip.into(),
            user_agent: user_agent.into(),
            timestamp,
        }
    }
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_format() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let event = AccessEvent::at("a.png", "203.0.113.9", "curl/8.5", ts);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Image Access",
                "filename": "a.png",
                "ip": "203.0.113.9",
                "userAgent": "curl/8.5",
                "timestamp": "2024-05-01T10:00:00.000Z",
            })
        );

        let back: AccessEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
