//! Entity declarations and insert validation.
//!
//! Every entity is declared once with [`entity!`](crate::entity). From that
//! single declaration the macro emits the stored record, the insertable
//! record (the stored record minus generated fields), a static field table
//! and the trait impls below. Adding a field to an entity therefore changes
//! what is stored and what is accepted at the same time.
//!
//! Validation walks the insertable fields in declaration order and collects
//! every violation instead of stopping at the first one, so the caller can
//! show feedback for the whole form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{FieldViolation, ValidationError, ViolationKind};

/// Semantic type of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Email,
    Timestamp,
    Id,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Email => "email",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Id => "id",
        };
        f.write_str(name)
    }
}

/// Static description of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Logical camelCase name used in payloads.
    pub name: &'static str,
    /// Physical snake_case column name.
    pub column: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    /// A default is applied during validation when the field is absent.
    pub has_default: bool,
    /// Assigned by the store, never accepted from a caller.
    pub generated: bool,
}

/// A Rust type that can back an entity field.
pub trait FieldType: DeserializeOwned {
    const KIND: FieldKind;
    const NULLABLE: bool = false;

    /// Value used when the field is absent (or null, for nullable fields).
    /// `None` means the field is required.
    fn absent() -> Option<Self> {
        None
    }

    /// Format checks beyond the JSON type.
    fn check(&self) -> Result<(), ViolationKind> {
        Ok(())
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;
}

impl FieldType for i32 {
    const KIND: FieldKind = FieldKind::Integer;
}

impl FieldType for Uuid {
    const KIND: FieldKind = FieldKind::Id;
}

impl FieldType for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn absent() -> Option<Self> {
        Some(None)
    }

    fn check(&self) -> Result<(), ViolationKind> {
        match self {
            Some(value) => value.check(),
            None => Ok(()),
        }
    }
}

/// A stored record type.
pub trait Entity: Sized {
    type Insert: Insertable<Entity = Self>;

    /// Table the store keeps this entity in.
    const TABLE: &'static str;

    /// Every field, generated ones first, in declaration order.
    const FIELDS: &'static [FieldDef];

    /// Fields a caller may supply.
    fn insert_fields() -> impl Iterator<Item = &'static FieldDef> {
        Self::FIELDS.iter().filter(|f| !f.generated)
    }

    /// Fields the store assigns.
    fn generated_fields() -> impl Iterator<Item = &'static FieldDef> {
        Self::FIELDS.iter().filter(|f| f.generated)
    }

    /// Physical column names, in field order.
    fn columns() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.column).collect()
    }

    /// Look a field up by its logical name.
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// The caller-supplied part of an [`Entity`].
pub trait Insertable: Sized {
    type Entity: Entity;

    /// Validate an untyped payload into a normalized insert record.
    ///
    /// Unknown keys, including any generated field the caller sent, are
    /// ignored. Defaults are applied here rather than by the store.
    fn from_payload(payload: &Value) -> Result<Self, ValidationError>;
}

/// Validate `payload` against the insertable shape of `E`.
pub fn validate_insert<E: Entity>(payload: &Value) -> Result<E::Insert, ValidationError> {
    <E::Insert as Insertable>::from_payload(payload)
}

#[doc(hidden)]
pub fn payload_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload.as_object().ok_or_else(ValidationError::not_an_object)
}

/// Read one field out of a payload object.
///
/// Returns `None` and records a violation when the field is unusable. An
/// absent field falls back to `default`, then to [`FieldType::absent`]; an
/// explicit null is only accepted for nullable fields.
#[doc(hidden)]
pub fn extract_field<T: FieldType>(
    object: &Map<String, Value>,
    name: &'static str,
    default: Option<T>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let kind = match object.get(name) {
        None => match default.or_else(T::absent) {
            Some(value) => return Some(value),
            None => ViolationKind::Missing,
        },
        Some(Value::Null) => match T::absent().filter(|_| T::NULLABLE) {
            Some(value) => return Some(value),
            None => ViolationKind::Null,
        },
        Some(raw) => match T::deserialize(raw) {
            Ok(value) => match value.check() {
                Ok(()) => return Some(value),
                Err(kind) => kind,
            },
            Err(_) => ViolationKind::WrongType { expected: T::KIND },
        },
    };

    violations.push(FieldViolation::new(name, kind));
    None
}

/// Declare an entity, its insertable shape and its field table.
///
/// ```ignore
/// entity! {
///     /// A stored widget.
///     #[derive(Debug, Clone)]
///     pub struct Widget in "widgets" {
///         generated {
///             id: Uuid,
///             created_at: DateTime<Utc> as "createdAt",
///         }
///         #[derive(Debug, Clone)]
///         insert NewWidget {
///             label: String,
///             size: i32 = 1,
///         }
///     }
/// }
/// ```
///
/// `as "name"` overrides the payload name (defaults to the Rust field name,
/// which is also the column name). `= expr` sets a default applied during
/// validation.
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident in $table:literal {
            generated {
                $( $gfield:ident : $gty:ty $(as $gjson:literal)? ),* $(,)?
            }
            $(#[$imeta:meta])*
            insert $insert:ident {
                $(
                    $(#[$fmeta:meta])*
                    $field:ident : $fty:ty $(as $json:literal)? $(= $default:expr)?
                ),* $(,)?
            }
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $( pub $gfield: $gty, )*
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        $(#[$imeta])*
        pub struct $insert {
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        impl $name {
            /// Assemble a stored record from a validated insert and the
            /// values the store generated for it.
            pub fn from_insert(insert: $insert, $( $gfield: $gty ),*) -> Self {
                let $insert { $( $field ),* } = insert;
                Self {
                    $( $gfield, )*
                    $( $field, )*
                }
            }

            /// Validate an untyped payload into the insertable shape.
            pub fn validate_insert(
                payload: &::serde_json::Value,
            ) -> ::std::result::Result<$insert, $crate::error::ValidationError> {
                $crate::schema::validate_insert::<Self>(payload)
            }
        }

        impl $crate::schema::Entity for $name {
            type Insert = $insert;

            const TABLE: &'static str = $table;

            const FIELDS: &'static [$crate::schema::FieldDef] = &[
                $(
                    $crate::schema::FieldDef {
                        name: $crate::__field_name!($gfield $(, $gjson)?),
                        column: stringify!($gfield),
                        kind: <$gty as $crate::schema::FieldType>::KIND,
                        nullable: <$gty as $crate::schema::FieldType>::NULLABLE,
                        has_default: false,
                        generated: true,
                    },
                )*
                $(
                    $crate::schema::FieldDef {
                        name: $crate::__field_name!($field $(, $json)?),
                        column: stringify!($field),
                        kind: <$fty as $crate::schema::FieldType>::KIND,
                        nullable: <$fty as $crate::schema::FieldType>::NULLABLE,
                        has_default: $crate::__has_default!($($default)?),
                        generated: false,
                    },
                )*
            ];
        }

        impl $crate::schema::Insertable for $insert {
            type Entity = $name;

            fn from_payload(
                payload: &::serde_json::Value,
            ) -> ::std::result::Result<Self, $crate::error::ValidationError> {
                let object = $crate::schema::payload_object(payload)?;
                let mut violations = ::std::vec::Vec::new();

                $(
                    let $field: ::std::option::Option<$fty> = $crate::schema::extract_field(
                        object,
                        $crate::__field_name!($field $(, $json)?),
                        $crate::__default_value!($($default)?),
                        &mut violations,
                    );
                )*

                match ( $( $field, )* ) {
                    ( $( ::std::option::Option::Some($field), )* ) => {
                        ::std::result::Result::Ok(Self { $( $field ),* })
                    }
                    _ => ::std::result::Result::Err(
                        $crate::error::ValidationError::new(violations),
                    ),
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __has_default {
    () => {
        false
    };
    ($default:expr) => {
        true
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __default_value {
    () => {
        ::std::option::Option::None
    };
    ($default:expr) => {
        ::std::option::Option::Some($default)
    };
}
