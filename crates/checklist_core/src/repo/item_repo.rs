//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Updates never touch `id` or `creation_date`.
//! - Listing order is `creation_date DESC`, newest insert first on ties.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::item::{Item, ItemId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    complete,
    creation_date
FROM items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for checklist item persistence.
pub trait ItemRepository {
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self) -> RepoResult<Vec<Item>>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Deletes every listed item or none of them.
    fn delete_items(&self, ids: &[ItemId]) -> RepoResult<usize>;
    fn delete_all_items(&self) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId> {
        self.conn.execute(
            "INSERT INTO items (id, name, complete, creation_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.name.as_str(),
                bool_to_int(item.complete),
                item.creation_date,
            ],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                complete = ?2
             WHERE id = ?3;",
            params![
                item.name.as_str(),
                bool_to_int(item.complete),
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL} ORDER BY creation_date DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_items(&self, ids: &[ItemId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        // The repository only holds a shared borrow of the connection.
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM items WHERE id = ?1;")?;
            for id in ids {
                if stmt.execute([id.to_string()])? == 0 {
                    return Err(RepoError::NotFound(*id));
                }
                removed += 1;
            }
        }
        tx.commit()?;

        Ok(removed)
    }

    fn delete_all_items(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM items;", [])?)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in items.id"))
    })?;

    let complete = match row.get::<_, i64>("complete")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid complete value `{other}` in items.complete"
            )));
        }
    };

    Ok(Item {
        id,
        name: row.get("name")?,
        complete,
        creation_date: row.get("creation_date")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
