//! Read-mark join entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Records that `uid` has viewed `notification_id`.
///
/// One row per pair is enforced at creation time; readers still tolerate
/// duplicates and use the most recent row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationMark {
    pub id: Uuid,
    pub notification_id: Uuid,
    pub uid: Uuid,
    pub created_at: DateTime<Utc>,
}

impl NotificationMark {
    /// Keep only the most recent mark per notification.
    pub fn latest_per_notification(
        marks: impl IntoIterator<Item = NotificationMark>,
    ) -> std::collections::HashMap<Uuid, NotificationMark> {
        let mut latest = std::collections::HashMap::new();
        for mark in marks {
            latest
                .entry(mark.notification_id)
                .and_modify(|current: &mut NotificationMark| {
                    if mark.created_at >= current.created_at {
                        *current = mark.clone();
                    }
                })
                .or_insert(mark);
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_latest_per_notification_prefers_newest() {
        let nid = Uuid::new_v4();
        let uid = Uuid::new_v4();
        let older = Utc::now() - Duration::minutes(5);
        let newer = Utc::now();
        let marks = vec![
            NotificationMark {
                id: Uuid::new_v4(),
                notification_id: nid,
                uid,
                created_at: newer,
            },
            NotificationMark {
                id: Uuid::new_v4(),
                notification_id: nid,
                uid,
                created_at: older,
            },
        ];

        let latest = NotificationMark::latest_per_notification(marks);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&nid].created_at, newer);
    }
}
