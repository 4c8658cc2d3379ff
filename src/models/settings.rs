//! Per-user preference settings.
//!
//! Four independent namespaces stored as JSONB. Updates are merge-patches:
//! only the keys present in the request change, everything else is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ServiceError;

#[derive(Debug, Clone, FromRow)]
pub struct Settings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notifications: Json<Notifications>,
    pub privacy: Json<Privacy>,
    pub discovery: Json<Discovery>,
    pub blockchain: Json<Blockchain>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    pub matches: bool,
    pub messages: bool,
    pub nft_updates: bool,
    pub date_reminders: bool,
    pub sound: bool,
    pub vibration: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            matches: true,
            messages: true,
            nft_updates: true,
            date_reminders: true,
            sound: true,
            vibration: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Privacy {
    pub show_online: bool,
    pub show_distance: bool,
    pub show_nft_balance: bool,
    pub incognito: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Self {
            show_online: true,
            show_distance: true,
            show_nft_balance: false,
            incognito: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    pub show_me: bool,
    pub age_range: AgeRange,
    /// Kilometers
    pub max_distance: i32,
    pub show_recently_active: bool,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            show_me: true,
            age_range: AgeRange { min: 18, max: 55 },
            max_distance: 50,
            show_recently_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blockchain {
    pub auto_withdraw: bool,
    pub withdraw_threshold: f64,
    pub show_transactions: bool,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self {
            auto_withdraw: false,
            withdraw_threshold: 10.0,
            show_transactions: true,
        }
    }
}

// ============================================================================
// Merge-patch types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub notifications: Option<NotificationsPatch>,
    pub privacy: Option<PrivacyPatch>,
    pub discovery: Option<DiscoveryPatch>,
    pub blockchain: Option<BlockchainPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsPatch {
    pub matches: Option<bool>,
    pub messages: Option<bool>,
    pub nft_updates: Option<bool>,
    pub date_reminders: Option<bool>,
    pub sound: Option<bool>,
    pub vibration: Option<bool>,
}

impl NotificationsPatch {
    pub fn apply(&self, current: &mut Notifications) {
        if let Some(v) = self.matches {
            current.matches = v;
        }
        if let Some(v) = self.messages {
            current.messages = v;
        }
        if let Some(v) = self.nft_updates {
            current.nft_updates = v;
        }
        if let Some(v) = self.date_reminders {
            current.date_reminders = v;
        }
        if let Some(v) = self.sound {
            current.sound = v;
        }
        if let Some(v) = self.vibration {
            current.vibration = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivacyPatch {
    pub show_online: Option<bool>,
    pub show_distance: Option<bool>,
    pub show_nft_balance: Option<bool>,
    pub incognito: Option<bool>,
}

impl PrivacyPatch {
    pub fn apply(&self, current: &mut Privacy) {
        if let Some(v) = self.show_online {
            current.show_online = v;
        }
        if let Some(v) = self.show_distance {
            current.show_distance = v;
        }
        if let Some(v) = self.show_nft_balance {
            current.show_nft_balance = v;
        }
        if let Some(v) = self.incognito {
            current.incognito = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgeRangePatch {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryPatch {
    pub show_me: Option<bool>,
    pub age_range: Option<AgeRangePatch>,
    pub max_distance: Option<i32>,
    pub show_recently_active: Option<bool>,
}

impl DiscoveryPatch {
    pub fn apply(&self, current: &mut Discovery) {
        if let Some(v) = self.show_me {
            current.show_me = v;
        }
        if let Some(ref range) = self.age_range {
            if let Some(min) = range.min {
                current.age_range.min = min;
            }
            if let Some(max) = range.max {
                current.age_range.max = max;
            }
        }
        if let Some(v) = self.max_distance {
            current.max_distance = v;
        }
        if let Some(v) = self.show_recently_active {
            current.show_recently_active = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockchainPatch {
    pub auto_withdraw: Option<bool>,
    pub withdraw_threshold: Option<f64>,
    pub show_transactions: Option<bool>,
}

impl BlockchainPatch {
    pub fn apply(&self, current: &mut Blockchain) {
        if let Some(v) = self.auto_withdraw {
            current.auto_withdraw = v;
        }
        if let Some(v) = self.withdraw_threshold {
            current.withdraw_threshold = v;
        }
        if let Some(v) = self.show_transactions {
            current.show_transactions = v;
        }
    }
}

/// Range validation applied after a patch, before the write.
pub fn validate_discovery(discovery: &Discovery) -> Result<(), ServiceError> {
    let AgeRange { min, max } = discovery.age_range;
    if min < 18 {
        return Err(ServiceError::validation(
            "INVALID_AGE_RANGE",
            "Age range minimum must be at least 18",
        ));
    }
    if max < min {
        return Err(ServiceError::validation(
            "INVALID_AGE_RANGE",
            "Age range maximum must not be below the minimum",
        ));
    }
    if max > 100 {
        return Err(ServiceError::validation(
            "INVALID_AGE_RANGE",
            "Age range maximum must be at most 100",
        ));
    }
    if discovery.max_distance < 1 {
        return Err(ServiceError::validation(
            "INVALID_MAX_DISTANCE",
            "Maximum distance must be at least 1 km",
        ));
    }
    Ok(())
}

pub fn validate_blockchain(blockchain: &Blockchain) -> Result<(), ServiceError> {
    if blockchain.withdraw_threshold < 0.0 {
        return Err(ServiceError::validation(
            "INVALID_WITHDRAW_THRESHOLD",
            "Withdraw threshold must not be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_registration_seed() {
        let notifications = Notifications::default();
        assert!(notifications.matches);
        assert!(notifications.sound);
        assert!(!notifications.vibration);

        let privacy = Privacy::default();
        assert!(privacy.show_online);
        assert!(!privacy.show_nft_balance);
        assert!(!privacy.incognito);

        let discovery = Discovery::default();
        assert_eq!(discovery.age_range, AgeRange { min: 18, max: 55 });
        assert_eq!(discovery.max_distance, 50);

        let blockchain = Blockchain::default();
        assert!(!blockchain.auto_withdraw);
        assert_eq!(blockchain.withdraw_threshold, 10.0);
    }

    #[test]
    fn test_partial_patch_leaves_rest_untouched() {
        let mut discovery = Discovery::default();
        let patch = DiscoveryPatch {
            age_range: Some(AgeRangePatch {
                min: None,
                max: Some(40),
            }),
            ..Default::default()
        };

        patch.apply(&mut discovery);

        assert_eq!(discovery.age_range, AgeRange { min: 18, max: 40 });
        assert_eq!(discovery.max_distance, 50);
        assert!(discovery.show_me);
    }

    #[test]
    fn test_patch_deserializes_from_sparse_json() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"notifications": {"sound": false}}"#).unwrap();

        let mut notifications = Notifications::default();
        patch.notifications.unwrap().apply(&mut notifications);

        assert!(!notifications.sound);
        assert!(notifications.matches);
    }

    #[test]
    fn test_validate_discovery_ranges() {
        let mut discovery = Discovery::default();
        assert!(validate_discovery(&discovery).is_ok());

        discovery.age_range = AgeRange { min: 17, max: 30 };
        assert!(validate_discovery(&discovery).is_err());

        discovery.age_range = AgeRange { min: 30, max: 20 };
        assert!(validate_discovery(&discovery).is_err());

        discovery.age_range = AgeRange { min: 18, max: 120 };
        assert!(validate_discovery(&discovery).is_err());

        discovery.age_range = AgeRange { min: 18, max: 55 };
        discovery.max_distance = 0;
        assert!(validate_discovery(&discovery).is_err());
    }

    #[test]
    fn test_validate_blockchain() {
        let mut blockchain = Blockchain::default();
        assert!(validate_blockchain(&blockchain).is_ok());

        blockchain.withdraw_threshold = -1.0;
        assert!(validate_blockchain(&blockchain).is_err());
    }

    #[test]
    fn test_settings_json_roundtrip_defaults() {
        // Stored JSONB defaults deserialize into the same defaults.
        let stored = r#"{
            "matches": true, "messages": true, "nft_updates": true,
            "date_reminders": true, "sound": true, "vibration": false
        }"#;
        let parsed: Notifications = serde_json::from_str(stored).unwrap();
        assert_eq!(parsed, Notifications::default());
    }
}
