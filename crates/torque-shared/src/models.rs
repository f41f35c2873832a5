//! The four persisted entities.
//!
//! Each block below is the single source of truth for its table: the stored
//! record, the `New*` insert record and the field table all come from it.
//! None of the entities reference each other.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_RELIABILITY, DEFAULT_ROLE};
use crate::entity;
use crate::types::EmailAddress;

// ---------------------------------------------------------------------------
// Car
// ---------------------------------------------------------------------------

entity! {
    /// A car in the catalogue.
    ///
    /// `power`, `acceleration` and `consumption` are display strings such as
    /// `"300hp"` or `"8L"`; nothing parses them as numbers.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Car in "cars" {
        generated {
            id: Uuid,
        }
        /// A car as submitted by a caller, defaults already applied.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(rename_all = "camelCase")]
        insert NewCar {
            brand: String,
            model: String,
            year: i32,
            description: String,
            image: String,
            engine: String,
            power: String,
            acceleration: String,
            consumption: String,
            drive_type: String as "driveType",
            category: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            video_url: Option<String> as "videoUrl",
            reliability: i32 = DEFAULT_RELIABILITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Blog post
// ---------------------------------------------------------------------------

entity! {
    /// A published blog post. `date` is supplied by the author as text.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BlogPost in "blog_posts" {
        generated {
            id: Uuid,
        }
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(rename_all = "camelCase")]
        insert NewBlogPost {
            title: String,
            content: String,
            author: String,
            date: String,
            image: String,
            category: String,
            excerpt: String,
        }
    }
}

// ---------------------------------------------------------------------------
// Contact message
// ---------------------------------------------------------------------------

entity! {
    /// An inbound contact form submission. Never updated once stored.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContactMessage in "contact_messages" {
        generated {
            id: Uuid,
            date: DateTime<Utc>,
        }
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(rename_all = "camelCase")]
        insert NewContactMessage {
            name: String,
            email: EmailAddress,
            message: String,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

entity! {
    /// A registered account, as the store holds it.
    ///
    /// `password` is the stored credential (a PHC hash string). This type
    /// deliberately does not implement `Serialize`; anything leaving the
    /// process goes through [`SafeUser`].
    #[derive(Clone, PartialEq, Eq)]
    pub struct User in "users" {
        generated {
            id: Uuid,
            created_at: DateTime<Utc> as "createdAt",
        }
        /// A sign-up request. `password` is still plaintext here.
        #[derive(Clone, PartialEq, Eq)]
        insert NewUser {
            email: EmailAddress,
            password: String,
            name: String,
            role: String = String::from(DEFAULT_ROLE),
        }
    }
}

impl User {
    /// The outward-facing view of this user.
    pub fn to_safe(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// A [`User`] without its credential.
///
/// This is the only user type that implements `Serialize`, so it is the only
/// one that can be handed to an API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: Uuid,
    pub email: EmailAddress,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        user.to_safe()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::error::ViolationKind;
    use crate::schema::{validate_insert, Entity, FieldKind};

    fn car_payload() -> Value {
        json!({
            "brand": "Acme",
            "model": "X1",
            "year": 2024,
            "description": "d",
            "image": "img.jpg",
            "engine": "V6",
            "power": "300hp",
            "acceleration": "5.0s",
            "consumption": "8L",
            "driveType": "AWD",
            "category": "SUV",
            "videoUrl": "https://video.example/x1",
            "reliability": 4,
        })
    }

    fn blog_post_payload() -> Value {
        json!({
            "title": "Winter tyres",
            "content": "Long text",
            "author": "Sam",
            "date": "2024-01-15",
            "image": "tyres.jpg",
            "category": "Maintenance",
            "excerpt": "Short text",
        })
    }

    fn contact_payload() -> Value {
        json!({
            "name": "Robin",
            "email": "robin@example.com",
            "message": "Is the X1 still available?",
        })
    }

    fn user_payload() -> Value {
        json!({
            "email": "a@b.com",
            "password": "secret",
            "name": "A",
            "role": "editor",
        })
    }

    fn without(payload: &Value, field: &str) -> Value {
        let mut payload = payload.clone();
        payload.as_object_mut().unwrap().remove(field);
        payload
    }

    fn required_fields<E: Entity>() -> Vec<&'static str> {
        E::insert_fields()
            .filter(|f| !f.nullable && !f.has_default)
            .map(|f| f.name)
            .collect()
    }

    fn assert_each_required_field_is_reported<E: Entity>(payload: &Value) {
        let required = required_fields::<E>();
        assert!(!required.is_empty());
        for field in required {
            let err = validate_insert::<E>(&without(payload, field))
                .err()
                .unwrap_or_else(|| panic!("{}: missing {field} should fail", E::TABLE));
            assert_eq!(err.field_names(), vec![field], "{}", E::TABLE);
            assert_eq!(err.violation_for(field), Some(&ViolationKind::Missing));
        }
    }

    #[test]
    fn test_car_round_trips_well_formed_payload() {
        let payload = car_payload();
        let car = Car::validate_insert(&payload).unwrap();
        assert_eq!(serde_json::to_value(&car).unwrap(), payload);
    }

    #[test]
    fn test_blog_post_round_trips_well_formed_payload() {
        let payload = blog_post_payload();
        let post = BlogPost::validate_insert(&payload).unwrap();
        assert_eq!(serde_json::to_value(&post).unwrap(), payload);
    }

    #[test]
    fn test_contact_message_round_trips_well_formed_payload() {
        let payload = contact_payload();
        let msg = ContactMessage::validate_insert(&payload).unwrap();
        assert_eq!(serde_json::to_value(&msg).unwrap(), payload);
    }

    #[test]
    fn test_user_keeps_well_formed_payload() {
        let user = User::validate_insert(&user_payload()).unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.password, "secret");
        assert_eq!(user.name, "A");
        assert_eq!(user.role, "editor");
    }

    #[test]
    fn test_missing_required_fields_are_named() {
        assert_each_required_field_is_reported::<Car>(&car_payload());
        assert_each_required_field_is_reported::<BlogPost>(&blog_post_payload());
        assert_each_required_field_is_reported::<ContactMessage>(&contact_payload());
        assert_each_required_field_is_reported::<User>(&user_payload());
    }

    #[test]
    fn test_car_reliability_defaults_to_three() {
        let car = Car::validate_insert(&without(&car_payload(), "reliability")).unwrap();
        assert_eq!(car.reliability, 3);
    }

    #[test]
    fn test_car_video_url_is_optional() {
        let car = Car::validate_insert(&without(&car_payload(), "videoUrl")).unwrap();
        assert_eq!(car.video_url, None);
        let json = serde_json::to_value(&car).unwrap();
        assert!(json.get("videoUrl").is_none());
    }

    #[test]
    fn test_car_year_must_be_an_integer() {
        let mut payload = car_payload();
        payload["year"] = json!("2024");
        let err = Car::validate_insert(&payload).unwrap_err();
        assert_eq!(
            err.violation_for("year"),
            Some(&ViolationKind::WrongType {
                expected: FieldKind::Integer
            })
        );
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user = User::validate_insert(&without(&user_payload(), "role")).unwrap();
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_contact_message_ignores_generated_fields() {
        let mut payload = contact_payload();
        payload["id"] = json!("caller-chosen-id");
        payload["date"] = json!("1999-12-31");
        let msg = ContactMessage::validate_insert(&payload).unwrap();
        assert_eq!(serde_json::to_value(&msg).unwrap(), contact_payload());
    }

    #[test]
    fn test_user_ignores_generated_fields() {
        let mut payload = user_payload();
        payload["id"] = json!("caller-chosen-id");
        payload["createdAt"] = json!("1999-12-31T00:00:00Z");
        let user = User::validate_insert(&payload).unwrap();
        assert_eq!(user, User::validate_insert(&user_payload()).unwrap());
    }

    #[test]
    fn test_bad_email_is_a_format_violation() {
        let mut payload = user_payload();
        payload["email"] = json!("not-an-email");
        let err = User::validate_insert(&payload).unwrap_err();
        assert!(matches!(
            err.violation_for("email"),
            Some(ViolationKind::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_generated_fields_per_entity() {
        fn generated<E: Entity>() -> Vec<&'static str> {
            E::generated_fields().map(|f| f.name).collect()
        }

        assert_eq!(generated::<Car>(), vec!["id"]);
        assert_eq!(generated::<BlogPost>(), vec!["id"]);
        assert_eq!(generated::<ContactMessage>(), vec!["id", "date"]);
        assert_eq!(generated::<User>(), vec!["id", "createdAt"]);
    }

    #[test]
    fn test_column_names_are_snake_case() {
        let car = Car::field("driveType").unwrap();
        assert_eq!(car.column, "drive_type");
        assert_eq!(Car::field("videoUrl").unwrap().column, "video_url");
        assert_eq!(User::field("createdAt").unwrap().column, "created_at");
        assert_eq!(Car::field("brand").unwrap().column, "brand");
    }

    #[test]
    fn test_field_names_match_serialized_keys() {
        let car = Car::from_insert(Car::validate_insert(&car_payload()).unwrap(), Uuid::new_v4());
        let json = serde_json::to_value(&car).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        for field in Car::FIELDS {
            assert!(keys.iter().any(|k| k == field.name), "{} not serialized", field.name);
        }

        let user = User::from_insert(
            User::validate_insert(&user_payload()).unwrap(),
            Uuid::new_v4(),
            Utc::now(),
        );
        let json = serde_json::to_value(user.to_safe()).unwrap();
        for field in User::FIELDS.iter().filter(|f| f.name != "password") {
            assert!(json.get(field.name).is_some(), "{} not serialized", field.name);
        }
    }

    #[test]
    fn test_safe_user_drops_password_only() {
        let user = User::from_insert(
            User::validate_insert(&user_payload()).unwrap(),
            Uuid::new_v4(),
            Utc::now(),
        );

        let safe = user.to_safe();
        assert_eq!(safe.id, user.id);
        assert_eq!(safe.email, user.email);
        assert_eq!(safe.name, user.name);
        assert_eq!(safe.role, user.role);
        assert_eq!(safe.created_at, user.created_at);

        let json = serde_json::to_value(&safe).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_safe_user_projection_is_idempotent() {
        let user = User::from_insert(
            User::validate_insert(&user_payload()).unwrap(),
            Uuid::new_v4(),
            Utc::now(),
        );
        assert_eq!(user.to_safe(), user.to_safe());
        assert_eq!(SafeUser::from(user.clone()), user.to_safe());
    }

    #[test]
    fn test_debug_redacts_password() {
        let new_user = User::validate_insert(&user_payload()).unwrap();
        assert!(!format!("{new_user:?}").contains("secret"));

        let user = User::from_insert(new_user, Uuid::new_v4(), Utc::now());
        assert!(!format!("{user:?}").contains("secret"));
    }
}
