//! Change-event types for the concurrent-edit feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{IntervalId, StayInterval};

/// Operation tag on a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// One inbound change from a concurrent editor.
///
/// Inserts and updates carry the full post-image; deletes carry only the id
/// (a post-image, if present, is ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub op: ChangeOp,
    pub id: IntervalId,
    pub post_image: Option<StayInterval>,
    pub received_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn insert(interval: StayInterval) -> Self {
        Self {
            op: ChangeOp::Insert,
            id: interval.id,
            post_image: Some(interval),
            received_at: Utc::now(),
        }
    }

    pub fn update(interval: StayInterval) -> Self {
        Self {
            op: ChangeOp::Update,
            id: interval.id,
            post_image: Some(interval),
            received_at: Utc::now(),
        }
    }

    pub fn delete(id: IntervalId) -> Self {
        Self {
            op: ChangeOp::Delete,
            id,
            post_image: None,
            received_at: Utc::now(),
        }
    }
}

/// Errors from the change-event feed boundary.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The event is structurally unusable and must be dropped (and logged)
    /// by the reconciliation loop, never crash it.
    #[error("malformed change event: {reason}")]
    Malformed { reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Decode a raw feed payload into a typed event.
///
/// Expected shape: `{"op": "...", "id": N, "post_image": {...}}`. Inserts and
/// updates without a decodable post-image are malformed; deletes need only
/// the id.
pub fn decode_change_event(raw: &serde_json::Value) -> Result<ChangeEvent, SyncError> {
    let op_str = raw["op"]
        .as_str()
        .ok_or_else(|| SyncError::Malformed { reason: "missing op".into() })?;

    let op = match op_str {
        "insert" => ChangeOp::Insert,
        "update" => ChangeOp::Update,
        "delete" => ChangeOp::Delete,
        other => {
            return Err(SyncError::Malformed {
                reason: format!("unknown op: {other}"),
            })
        }
    };

    let id = raw["id"]
        .as_i64()
        .ok_or_else(|| SyncError::Malformed { reason: "missing id".into() })?;

    let post_image = match op {
        ChangeOp::Delete => None,
        ChangeOp::Insert | ChangeOp::Update => {
            let image: StayInterval = serde_json::from_value(raw["post_image"].clone())
                .map_err(|e| SyncError::Malformed {
                    reason: format!("undecodable post_image: {e}"),
                })?;
            if image.id != id {
                return Err(SyncError::Malformed {
                    reason: format!("post_image id {} does not match event id {id}", image.id),
                });
            }
            Some(image)
        }
    };

    Ok(ChangeEvent {
        op,
        id,
        post_image,
        received_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_interval() -> StayInterval {
        StayInterval::try_new(
            42,
            5,
            NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 12).unwrap(),
            "Keller",
        )
        .unwrap()
    }

    #[test]
    fn decode_insert_event() {
        let raw = serde_json::json!({
            "op": "insert",
            "id": 42,
            "post_image": serde_json::to_value(sample_interval()).unwrap(),
        });

        let event = decode_change_event(&raw).unwrap();
        assert_eq!(event.op, ChangeOp::Insert);
        assert_eq!(event.id, 42);
        assert_eq!(event.post_image.unwrap().guest_name, "Keller");
    }

    #[test]
    fn decode_delete_needs_only_id() {
        let raw = serde_json::json!({ "op": "delete", "id": 7 });
        let event = decode_change_event(&raw).unwrap();
        assert_eq!(event.op, ChangeOp::Delete);
        assert_eq!(event.id, 7);
        assert!(event.post_image.is_none());
    }

    #[test]
    fn missing_op_is_malformed() {
        let raw = serde_json::json!({ "id": 7 });
        assert!(matches!(
            decode_change_event(&raw),
            Err(SyncError::Malformed { .. })
        ));
    }

    #[test]
    fn update_without_post_image_is_malformed() {
        let raw = serde_json::json!({ "op": "update", "id": 7 });
        assert!(matches!(
            decode_change_event(&raw),
            Err(SyncError::Malformed { .. })
        ));
    }

    #[test]
    fn mismatched_post_image_id_is_malformed() {
        let raw = serde_json::json!({
            "op": "update",
            "id": 99,
            "post_image": serde_json::to_value(sample_interval()).unwrap(),
        });
        assert!(matches!(
            decode_change_event(&raw),
            Err(SyncError::Malformed { .. })
        ));
    }
}
