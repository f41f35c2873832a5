//! Storage for inbound [`ContactMessage`] submissions.
//!
//! Messages are write-once: there is no update path, only create, read and
//! delete (for administrators archiving the inbox).

use rusqlite::params;
use torque_shared::{ContactMessage, NewContactMessage};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::row::{email_at, now, timestamp_at, timestamp_to_sql, uuid_at};

impl Database {
    /// Store a validated submission, stamping its id and receipt time.
    pub fn create_contact_message(&self, new_message: NewContactMessage) -> Result<ContactMessage> {
        let message = ContactMessage::from_insert(new_message, Uuid::new_v4(), now());

        self.conn().execute(
            "INSERT INTO contact_messages (id, name, email, message, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.name,
                message.email.as_str(),
                message.message,
                timestamp_to_sql(&message.date),
            ],
        )?;

        tracing::debug!(id = %message.id, "contact message received");
        Ok(message)
    }

    pub fn get_contact_message(&self, id: Uuid) -> Result<ContactMessage> {
        self.conn()
            .query_row(
                "SELECT id, name, email, message, date
                 FROM contact_messages
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_contact_message,
            )
            .map_err(StoreError::from_lookup)
    }

    /// List every message, newest first.
    pub fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, email, message, date
             FROM contact_messages
             ORDER BY date DESC",
        )?;

        let rows = stmt.query_map([], row_to_contact_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    pub fn delete_contact_message(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM contact_messages WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_contact_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: uuid_at(row, 0)?,
        name: row.get(1)?,
        email: email_at(row, 2)?,
        message: row.get(3)?,
        date: timestamp_at(row, 4)?,
    })
}
