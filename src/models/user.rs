//! User models for identity and stored profile.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Identity as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Unique user ID (also used as the profile document ID)
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Extended profile stored in Firestore (`users/{uid}`).
///
/// Documents written by the original mobile app use Spanish field names.
/// Both spellings are read; the English one wins when a document has both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredUserData")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Mirror of the identity email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Body weight (kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height (cm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Download URL of the profile image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Profile document as stored, with the legacy field names kept apart.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUserData {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "nombre")]
    legacy_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    age: Option<f64>,
    #[serde(default, rename = "edad")]
    legacy_age: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default, rename = "peso")]
    legacy_weight: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default, rename = "altura")]
    legacy_height: Option<f64>,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default, rename = "objetivo")]
    legacy_goal: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
}

impl From<StoredUserData> for UserData {
    fn from(stored: StoredUserData) -> Self {
        UserData {
            display_name: stored.display_name.or(stored.legacy_name),
            email: stored.email,
            age: stored.age.or(stored.legacy_age),
            weight: stored.weight.or(stored.legacy_weight),
            height: stored.height.or(stored.legacy_height),
            goal: stored.goal.or(stored.legacy_goal),
            profile_image: stored.profile_image,
        }
    }
}

impl UserData {
    /// Document field names of the fields that are set.
    ///
    /// Used as the update mask for merge writes so that absent fields are
    /// left untouched in the stored document.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.display_name.is_some() {
            fields.push("displayName");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.age.is_some() {
            fields.push("age");
        }
        if self.weight.is_some() {
            fields.push("weight");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.goal.is_some() {
            fields.push("goal");
        }
        if self.profile_image.is_some() {
            fields.push("profileImage");
        }
        fields
    }

    /// Overlay the fields set in `patch` onto `self`.
    pub fn merge(&mut self, patch: &UserData) {
        fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        overlay(&mut self.display_name, &patch.display_name);
        overlay(&mut self.email, &patch.email);
        overlay(&mut self.age, &patch.age);
        overlay(&mut self.weight, &patch.weight);
        overlay(&mut self.height, &patch.height);
        overlay(&mut self.goal, &patch.goal);
        overlay(&mut self.profile_image, &patch.profile_image);
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_profile_fields() {
        let doc = serde_json::json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "edad": 31,
            "altura": 168,
            "peso": 61.5,
            "objetivo": "Fuerza"
        });

        let data: UserData = serde_json::from_value(doc).unwrap();

        assert_eq!(data.display_name.as_deref(), Some("Ana"));
        assert_eq!(data.age, Some(31.0));
        assert_eq!(data.height, Some(168.0));
        assert_eq!(data.weight, Some(61.5));
        assert_eq!(data.goal.as_deref(), Some("Fuerza"));
    }

    #[test]
    fn test_english_fields_win_over_legacy_ones() {
        let doc = serde_json::json!({
            "nombre": "Ana",
            "displayName": "Ana María",
            "edad": 31,
            "age": 32,
            "peso": 61.5,
            "objetivo": "Fuerza"
        });

        let data: UserData = serde_json::from_value(doc).unwrap();

        assert_eq!(data.display_name.as_deref(), Some("Ana María"));
        assert_eq!(data.age, Some(32.0));
        assert_eq!(data.weight, Some(61.5));
        assert_eq!(data.goal.as_deref(), Some("Fuerza"));
        assert!(data.height.is_none());

        let written = serde_json::to_value(&data).unwrap();
        assert!(written.get("nombre").is_none());
        assert_eq!(written["displayName"], "Ana María");
    }

    #[test]
    fn test_present_fields_matches_serialized_keys() {
        let patch = UserData {
            age: Some(30.0),
            goal: Some("Run a 10k".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();

        assert_eq!(patch.present_fields(), vec!["age", "goal"]);
        for field in patch.present_fields() {
            assert!(keys.contains(&field));
        }
    }

    #[test]
    fn test_merge_keeps_unrelated_fields() {
        let mut stored = UserData {
            display_name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            height: Some(168.0),
            profile_image: Some("https://img/ana".to_string()),
            ..Default::default()
        };

        stored.merge(&UserData {
            weight: Some(60.0),
            goal: Some("Hypertrophy".to_string()),
            ..Default::default()
        });

        assert_eq!(stored.display_name.as_deref(), Some("Ana"));
        assert_eq!(stored.height, Some(168.0));
        assert_eq!(stored.weight, Some(60.0));
        assert_eq!(stored.goal.as_deref(), Some("Hypertrophy"));
        assert_eq!(stored.profile_image.as_deref(), Some("https://img/ana"));
        assert!(UserData::default().is_empty());
    }
}
