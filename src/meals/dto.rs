use std::collections::HashSet;

use base64ct::{Base64, Encoding};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::model::{Meal, MealError};

pub const SNAPSHOT_VERSION: u8 = 1;

/// On-disk form of the whole meal list.
#[derive(Debug, Serialize, Deserialize)]
pub struct MealSnapshot {
    pub version: u8,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    #[serde(default)]
    pub meals: Vec<MealRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>, // base64
    pub rating: i32,
}

impl From<&Meal> for MealRecord {
    fn from(m: &Meal) -> Self {
        Self {
            id: m.id(),
            name: m.name().to_string(),
            photo: m.photo().map(|p| Base64::encode_string(p)),
            rating: i32::from(m.rating()),
        }
    }
}

impl TryFrom<MealRecord> for Meal {
    type Error = MealError;

    fn try_from(r: MealRecord) -> Result<Self, Self::Error> {
        let photo = r
            .photo
            .map(|p| Base64::decode_vec(&p).map(Bytes::from))
            .transpose()
            .map_err(|_| MealError::PhotoEncoding)?;
        Meal::restore(r.id, r.name, photo, r.rating)
    }
}

impl MealSnapshot {
    pub fn capture(meals: &[Meal]) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: OffsetDateTime::now_utc(),
            meals: meals.iter().map(MealRecord::from).collect(),
        }
    }

    pub fn into_meals(self) -> anyhow::Result<Vec<Meal>> {
        anyhow::ensure!(
            self.version == SNAPSHOT_VERSION,
            "unsupported meal snapshot version {}",
            self.version
        );
        let mut seen = HashSet::with_capacity(self.meals.len());
        self.meals
            .into_iter()
            .map(|r| {
                let id = r.id;
                anyhow::ensure!(seen.insert(id), "duplicate meal record {id}");
                Meal::try_from(r).map_err(|e| anyhow::anyhow!("meal record {id}: {e}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_encodes_photo_as_base64() {
        let meal = Meal::new("Toast", Some(Bytes::from_static(b"hi")), 2).unwrap();
        let record = MealRecord::from(&meal);
        assert_eq!(record.photo.as_deref(), Some("aGk="));
        assert_eq!(record.rating, 2);
        assert_eq!(Meal::try_from(record).unwrap(), meal);
    }

    #[test]
    fn record_without_photo_omits_field() {
        let meal = Meal::new("Toast", None, 2).unwrap();
        let json = serde_json::to_value(MealRecord::from(&meal)).unwrap();
        assert!(json.get("photo").is_none());
        assert_eq!(json["name"], "Toast");
    }

    #[test]
    fn invalid_records_are_rejected() {
        let base = MealRecord {
            id: Uuid::new_v4(),
            name: "Toast".into(),
            photo: None,
            rating: 2,
        };
        let bad_rating = MealRecord {
            rating: -3,
            ..base.clone()
        };
        assert_eq!(
            Meal::try_from(bad_rating).unwrap_err(),
            MealError::RatingOutOfRange(-3)
        );
        let bad_photo = MealRecord {
            photo: Some("not base64!".into()),
            ..base.clone()
        };
        assert_eq!(
            Meal::try_from(bad_photo).unwrap_err(),
            MealError::PhotoEncoding
        );
        let no_name = MealRecord {
            name: String::new(),
            ..base
        };
        assert_eq!(Meal::try_from(no_name).unwrap_err(), MealError::EmptyName);
    }

    #[test]
    fn snapshot_rejects_unknown_version() {
        let mut snapshot = MealSnapshot::capture(&[]);
        snapshot.version = 9;
        let err = snapshot.into_meals().unwrap_err();
        assert!(err.to_string().contains("version 9"));
    }

    #[test]
    fn snapshot_rejects_duplicate_ids() {
        let meal = Meal::new("Toast", None, 1).unwrap();
        let copy = meal.revise("Toast Copy", None, 2).unwrap();
        let err = MealSnapshot::capture(&[meal.clone(), copy])
            .into_meals()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate meal record"));
        assert!(err.to_string().contains(&meal.id().to_string()));
    }

    #[test]
    fn snapshot_json_carries_rfc3339_timestamp() {
        let snapshot = MealSnapshot::capture(&[Meal::new("Toast", None, 1).unwrap()]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["version"], 1);
        let saved_at = json["saved_at"].as_str().expect("timestamp string");
        assert!(saved_at.contains('T'));
        assert_eq!(json["meals"].as_array().map(Vec::len), Some(1));
    }
}
