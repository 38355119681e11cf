//! # Local Thread Operations
//!
//! Persists thread store operations to the `threads` table and loads the
//! table back into a thread map. Members, roles and the viewer record are
//! stored as JSON text columns.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use super::{LocalDatabase, LocalDbError, Result};
use crate::shared::operation::ThreadStoreOperation;
use crate::shared::thread::{RawThreadInfo, ThreadInfos};

/// A thread as stored in the `threads` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDbThreadInfo {
    pub id: String,
    pub thread_type: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: String,
    pub creation_time: i64,
    pub parent_thread_id: Option<String>,
    pub containing_thread_id: Option<String>,
    pub community: Option<String>,
    /// JSON array of members
    pub members: String,
    /// JSON object of roles
    pub roles: String,
    /// JSON object of the viewer's thread state
    pub current_user: String,
    pub source_message_id: Option<String>,
    pub replies_count: i64,
}

impl ClientDbThreadInfo {
    /// Row for `thread_info`, stored under `id`
    pub fn from_raw(id: &str, thread_info: &RawThreadInfo) -> Result<Self> {
        Ok(Self {
            id: id.to_string(),
            thread_type: i64::from(thread_info.thread_type),
            name: thread_info.name.clone(),
            description: thread_info.description.clone(),
            color: thread_info.color.clone(),
            creation_time: thread_info.creation_time,
            parent_thread_id: thread_info.parent_thread_id.clone(),
            containing_thread_id: thread_info.containing_thread_id.clone(),
            community: thread_info.community.clone(),
            members: serde_json::to_string(&thread_info.members)?,
            roles: serde_json::to_string(&thread_info.roles)?,
            current_user: serde_json::to_string(&thread_info.current_user)?,
            source_message_id: thread_info.source_message_id.clone(),
            replies_count: i64::from(thread_info.replies_count),
        })
    }

    /// Inverse of [`from_raw`](Self::from_raw)
    pub fn into_raw(self) -> Result<RawThreadInfo> {
        let thread_type = u8::try_from(self.thread_type).map_err(|_| LocalDbError::CorruptRow {
            id: self.id.clone(),
            message: format!("thread type out of range: {}", self.thread_type),
        })?;
        let replies_count =
            u32::try_from(self.replies_count).map_err(|_| LocalDbError::CorruptRow {
                id: self.id.clone(),
                message: format!("replies count out of range: {}", self.replies_count),
            })?;
        Ok(RawThreadInfo {
            thread_type,
            name: self.name,
            description: self.description,
            color: self.color,
            creation_time: self.creation_time,
            parent_thread_id: self.parent_thread_id,
            containing_thread_id: self.containing_thread_id,
            community: self.community,
            members: serde_json::from_str(&self.members)?,
            roles: serde_json::from_str(&self.roles)?,
            current_user: serde_json::from_str(&self.current_user)?,
            source_message_id: self.source_message_id,
            replies_count,
            id: self.id,
        })
    }

    fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            thread_type: row.try_get("type")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            color: row.try_get("color")?,
            creation_time: row.try_get("creation_time")?,
            parent_thread_id: row.try_get("parent_thread_id")?,
            containing_thread_id: row.try_get("containing_thread_id")?,
            community: row.try_get("community")?,
            members: row.try_get("members")?,
            roles: row.try_get("roles")?,
            current_user: row.try_get("current_user")?,
            source_message_id: row.try_get("source_message_id")?,
            replies_count: row.try_get("replies_count")?,
        })
    }
}

const SELECT_THREADS: &str = "SELECT id, type, name, description, color, creation_time,
        parent_thread_id, containing_thread_id, community, members, roles,
        current_user, source_message_id, replies_count
     FROM threads";

impl LocalDatabase {
    /// Apply a batch of operations atomically
    ///
    /// The batch runs in one transaction; if any statement fails nothing is
    /// written. An empty batch doesn't touch the database.
    pub async fn process_thread_store_operations(
        &self,
        operations: &[ThreadStoreOperation],
    ) -> Result<()> {
        if operations.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for operation in operations {
            match operation {
                ThreadStoreOperation::Replace { id, thread_info } => {
                    let row = ClientDbThreadInfo::from_raw(id, thread_info)?;
                    sqlx::query(
                        "INSERT OR REPLACE INTO threads (
                            id, type, name, description, color, creation_time,
                            parent_thread_id, containing_thread_id, community, members,
                            roles, current_user, source_message_id, replies_count
                        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    )
                    .bind(row.id)
                    .bind(row.thread_type)
                    .bind(row.name)
                    .bind(row.description)
                    .bind(row.color)
                    .bind(row.creation_time)
                    .bind(row.parent_thread_id)
                    .bind(row.containing_thread_id)
                    .bind(row.community)
                    .bind(row.members)
                    .bind(row.roles)
                    .bind(row.current_user)
                    .bind(row.source_message_id)
                    .bind(row.replies_count)
                    .execute(&mut *tx)
                    .await?;
                }
                ThreadStoreOperation::Remove { ids } => {
                    for id in ids {
                        sqlx::query("DELETE FROM threads WHERE id = ?")
                            .bind(id)
                            .execute(&mut *tx)
                            .await?;
                    }
                }
                ThreadStoreOperation::RemoveAll => {
                    sqlx::query("DELETE FROM threads").execute(&mut *tx).await?;
                }
            }
        }
        tx.commit().await?;

        tracing::debug!("Persisted {} thread store operations", operations.len());
        Ok(())
    }

    /// Load every cached thread
    pub async fn get_all_threads(&self) -> Result<ThreadInfos> {
        let rows = sqlx::query(SELECT_THREADS).fetch_all(&self.pool).await?;
        let mut thread_infos = ThreadInfos::new();
        for row in rows {
            let thread_info = ClientDbThreadInfo::from_row(&row)?.into_raw()?;
            thread_infos.insert(thread_info.id.clone(), Arc::new(thread_info));
        }
        Ok(thread_infos)
    }

    /// Load one cached thread
    pub async fn get_thread(&self, id: &str) -> Result<Option<RawThreadInfo>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_THREADS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(ClientDbThreadInfo::from_row(&row)?.into_raw()?)),
            None => Ok(None),
        }
    }

    /// Number of cached threads
    pub async fn thread_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM threads")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
