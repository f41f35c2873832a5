//! CRUD operations for [`BlogPost`] records.

use rusqlite::params;
use torque_shared::{BlogPost, NewBlogPost};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::row::uuid_at;

impl Database {
    /// Insert a validated blog post and return it with its new id.
    pub fn create_blog_post(&self, new_post: NewBlogPost) -> Result<BlogPost> {
        let post = BlogPost::from_insert(new_post, Uuid::new_v4());

        self.conn().execute(
            "INSERT INTO blog_posts (id, title, content, author, date, image, category, excerpt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                post.id.to_string(),
                post.title,
                post.content,
                post.author,
                post.date,
                post.image,
                post.category,
                post.excerpt,
            ],
        )?;

        tracing::debug!(id = %post.id, title = %post.title, "blog post created");
        Ok(post)
    }

    pub fn get_blog_post(&self, id: Uuid) -> Result<BlogPost> {
        self.conn()
            .query_row(
                "SELECT id, title, content, author, date, image, category, excerpt
                 FROM blog_posts
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_blog_post,
            )
            .map_err(StoreError::from_lookup)
    }

    // `date` is free text, so newest-first is only as good as the authors' format
    pub fn list_blog_posts(&self) -> Result<Vec<BlogPost>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, title, content, author, date, image, category, excerpt
             FROM blog_posts
             ORDER BY date DESC, title ASC",
        )?;

        let rows = stmt.query_map([], row_to_blog_post)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// Replace every caller-supplied field of an existing post.
    pub fn replace_blog_post(&self, id: Uuid, new_post: NewBlogPost) -> Result<BlogPost> {
        let post = BlogPost::from_insert(new_post, id);

        let affected = self.conn().execute(
            "UPDATE blog_posts
             SET title = ?2, content = ?3, author = ?4, date = ?5, image = ?6,
                 category = ?7, excerpt = ?8
             WHERE id = ?1",
            params![
                post.id.to_string(),
                post.title,
                post.content,
                post.author,
                post.date,
                post.image,
                post.category,
                post.excerpt,
            ],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(post)
    }

    pub fn delete_blog_post(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM blog_posts WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

fn row_to_blog_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: uuid_at(row, 0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        date: row.get(4)?,
        image: row.get(5)?,
        category: row.get(6)?,
        excerpt: row.get(7)?,
    })
}
