//! Storage for [`User`] accounts.
//!
//! Every public operation here returns [`SafeUser`]. The full record, with
//! its credential, only exists inside this module while a password is being
//! checked.

use rusqlite::{params, OptionalExtension};
use torque_shared::{NewUser, SafeUser, User};
use uuid::Uuid;

use crate::credentials;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::row::{email_at, now, timestamp_at, timestamp_to_sql, uuid_at};

const SELECT_SAFE_USER: &str = "SELECT id, email, name, role, created_at FROM users";

impl Database {
    /// Register a validated user.
    ///
    /// The password is hashed before it reaches the table. A second account
    /// with the same email fails with [`StoreError::UniquenessViolation`];
    /// the check is the table's `UNIQUE` constraint, so it holds across
    /// concurrent writers.
    pub fn create_user(&self, new_user: NewUser) -> Result<SafeUser> {
        let password = credentials::hash_password(&new_user.password)?;
        let user = User::from_insert(NewUser { password, ..new_user }, Uuid::new_v4(), now());

        self.conn()
            .execute(
                "INSERT INTO users (id, email, password, name, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.to_string(),
                    user.email.as_str(),
                    user.password,
                    user.name,
                    user.role,
                    timestamp_to_sql(&user.created_at),
                ],
            )
            .map_err(StoreError::from_write("users", "email"))?;

        tracing::debug!(id = %user.id, role = %user.role, "user created");
        Ok(SafeUser::from(user))
    }

    pub fn get_user(&self, id: Uuid) -> Result<SafeUser> {
        self.conn()
            .query_row(
                &format!("{SELECT_SAFE_USER} WHERE id = ?1"),
                params![id.to_string()],
                row_to_safe_user,
            )
            .map_err(StoreError::from_lookup)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<SafeUser>> {
        self.conn()
            .query_row(
                &format!("{SELECT_SAFE_USER} WHERE email = ?1"),
                params![email],
                row_to_safe_user,
            )
            .optional()
            .map_err(StoreError::Sqlite)
    }

    /// List all users, oldest account first.
    pub fn list_users(&self) -> Result<Vec<SafeUser>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_SAFE_USER} ORDER BY created_at ASC, email ASC"))?;

        let rows = stmt.query_map([], row_to_safe_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Check a login attempt. Returns the user when the password matches,
    /// `None` for an unknown email or a wrong password.
    pub fn verify_user_credentials(&self, email: &str, password: &str) -> Result<Option<SafeUser>> {
        let Some(user) = self.get_user_record_by_email(email)? else {
            return Ok(None);
        };

        if credentials::verify_password(password, &user.password)? {
            Ok(Some(user.to_safe()))
        } else {
            tracing::debug!(id = %user.id, "password mismatch");
            Ok(None)
        }
    }

    pub fn delete_user(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        tracing::debug!(%id, deleted = affected > 0, "user delete");
        Ok(affected > 0)
    }

    fn get_user_record_by_email(&self, email: &str) -> Result<Option<User>> {
        self.conn()
            .query_row(
                "SELECT id, email, password, name, role, created_at FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(User {
                        id: uuid_at(row, 0)?,
                        email: email_at(row, 1)?,
                        password: row.get(2)?,
                        name: row.get(3)?,
                        role: row.get(4)?,
                        created_at: timestamp_at(row, 5)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::Sqlite)
    }
}

fn row_to_safe_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<SafeUser> {
    Ok(SafeUser {
        id: uuid_at(row, 0)?,
        email: email_at(row, 1)?,
        name: row.get(2)?,
        role: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sign_up(email: &str) -> NewUser {
        User::validate_insert(&json!({
            "email": email,
            "password": "secret",
            "name": "A",
        }))
        .unwrap()
    }

    #[test]
    fn test_duplicate_email_is_a_uniqueness_violation() {
        let db = Database::open_in_memory().unwrap();

        let first = db.create_user(sign_up("a@b.com")).unwrap();
        let json = serde_json::to_value(&first).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["role"], "user");

        let err = db.create_user(sign_up("a@b.com")).unwrap_err();
        assert!(err.is_already_exists(), "got {err:?}");
        assert!(matches!(
            err,
            StoreError::UniquenessViolation {
                table: "users",
                field: "email"
            }
        ));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user(sign_up("a@b.com")).unwrap();

        let stored: String = db
            .conn()
            .query_row(
                "SELECT password FROM users WHERE id = ?1",
                params![user.id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_ne!(stored, "secret");
        assert!(stored.starts_with("$argon2"));
    }

    #[test]
    fn test_lookups_return_the_safe_projection() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_user(sign_up("a@b.com")).unwrap();

        assert_eq!(db.get_user(created.id).unwrap(), created);
        assert_eq!(db.find_user_by_email("a@b.com").unwrap(), Some(created.clone()));
        assert_eq!(db.find_user_by_email("nobody@b.com").unwrap(), None);
        assert_eq!(db.list_users().unwrap(), vec![created]);
    }

    #[test]
    fn test_verify_credentials() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_user(sign_up("a@b.com")).unwrap();

        assert_eq!(
            db.verify_user_credentials("a@b.com", "secret").unwrap(),
            Some(created)
        );
        assert_eq!(db.verify_user_credentials("a@b.com", "wrong").unwrap(), None);
        assert_eq!(db.verify_user_credentials("x@b.com", "secret").unwrap(), None);
    }

    #[test]
    fn test_delete_frees_the_email() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user(sign_up("a@b.com")).unwrap();

        assert!(db.delete_user(user.id).unwrap());
        assert!(matches!(db.get_user(user.id), Err(StoreError::NotFound)));
        assert!(db.create_user(sign_up("a@b.com")).is_ok());
    }

    #[test]
    fn test_uniqueness_holds_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");
        let a = Database::open_at(&path).unwrap();
        let b = Database::open_at(&path).unwrap();

        a.create_user(sign_up("a@b.com")).unwrap();
        let err = b.create_user(sign_up("a@b.com")).unwrap_err();
        assert!(err.is_already_exists());
    }
}
