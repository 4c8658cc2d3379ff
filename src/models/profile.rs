//! Dating profile model.
//!
//! `dob` is authoritative; age is derived at read time so it can never go
//! stale. `nft_stats` is a display-only counter block with no write path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Denormalized display counters shown on the profile card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NftStats {
    pub profile_views: i64,
    pub likes: i64,
    pub nft_dates: i64,
    pub success_rate: f64,
    pub rating: f64,
    pub total_earned: f64,
}

/// Whole years between `dob` and `on`, day-granular: the birthday itself
/// counts, the day before does not.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> u32 {
    on.years_since(dob).unwrap_or(0)
}

/// Profile joined with the owning user's public handle. The join carries the
/// username only - never email, password, or wallet.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub interested_in: Vec<String>,
    /// Ordered image references; order is display order.
    pub images: Vec<String>,
    pub tagline: Option<String>,
    pub about: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Vec<String>,
    pub nft_stats: Json<NftStats>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileWithOwner {
    /// Current age, recomputed from `dob` on every call.
    pub fn age(&self) -> u32 {
        age_on(self.dob, Utc::now().date_naive())
    }
}

/// Tag collections (`interests`, `interested_in`) arrive either as a JSON
/// array or as one delimiter-joined string; both normalize to a set of
/// trimmed, non-empty, deduplicated strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagSet {
    List(Vec<String>),
    Joined(String),
}

impl TagSet {
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagSet::List(items) => items,
            TagSet::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };

        let mut tags = Vec::new();
        for item in raw {
            let tag = item.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_day_granular_boundary() {
        let dob = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();

        // The 18th birthday itself
        let birthday = NaiveDate::from_ymd_opt(2018, 6, 15).unwrap();
        assert_eq!(age_on(dob, birthday), 18);

        // One day before the anniversary: still 17
        let day_before = NaiveDate::from_ymd_opt(2018, 6, 14).unwrap();
        assert_eq!(age_on(dob, day_before), 17);

        // Year subtraction alone would say 18 here; day granularity says 17
        let early_in_year = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(age_on(dob, early_in_year), 17);
    }

    #[test]
    fn test_age_future_dob_is_zero() {
        let dob = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(age_on(dob, today), 0);
    }

    #[test]
    fn test_tag_set_from_list() {
        let tags = TagSet::List(vec![
            " hiking ".to_string(),
            "music".to_string(),
            String::new(),
            "hiking".to_string(),
        ]);
        assert_eq!(tags.normalize(), vec!["hiking", "music"]);
    }

    #[test]
    fn test_tag_set_from_joined_string() {
        let tags = TagSet::Joined("Male, Female , ,Male".to_string());
        assert_eq!(tags.normalize(), vec!["Male", "Female"]);
    }

    #[test]
    fn test_tag_set_deserializes_both_shapes() {
        let from_list: TagSet = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(from_list.normalize(), vec!["a", "b"]);

        let from_string: TagSet = serde_json::from_str(r#""a,b""#).unwrap();
        assert_eq!(from_string.normalize(), vec!["a", "b"]);
    }

    #[test]
    fn test_nft_stats_defaults() {
        let stats: NftStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats, NftStats::default());
        assert_eq!(stats.profile_views, 0);
        assert_eq!(stats.success_rate, 0.0);
    }
}
