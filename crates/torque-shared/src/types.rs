use serde::{Deserialize, Serialize};

use crate::error::ViolationKind;
use crate::schema::{FieldKind, FieldType};

/// An email address that passed the basic syntax check.
///
/// Only syntax is checked here. Whether the address is already taken is the
/// store's business (a `UNIQUE` column), since that can only be answered
/// atomically at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(s: &str) -> Result<Self, ViolationKind> {
        check_syntax(s).map_err(|reason| ViolationKind::InvalidFormat { reason })?;
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for EmailAddress {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FieldType for EmailAddress {
    const KIND: FieldKind = FieldKind::Email;

    fn check(&self) -> Result<(), ViolationKind> {
        check_syntax(&self.0).map_err(|reason| ViolationKind::InvalidFormat { reason })
    }
}

fn check_syntax(s: &str) -> Result<(), &'static str> {
    if s.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace");
    }
    let (local, domain) = s.split_once('@').ok_or("missing '@'")?;
    if local.is_empty() {
        return Err("missing local part before '@'");
    }
    if domain.contains('@') {
        return Err("more than one '@'");
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    if !has_dot || labels.any(str::is_empty) {
        return Err("domain must be a dotted host name");
    }
    Ok(())
}
