use async_trait::async_trait;
use log::info;
use rusqlite::{ params, Connection };
use std::path::Path;
use std::sync::{ Arc, Mutex };

use super::{ ConversationLog, ConversationLogEntry, HistoryError };

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT,
        username TEXT,
        query TEXT,
        response TEXT,
        context TEXT
    )";

const INSERT_ENTRY: &str =
    "INSERT INTO conversations (timestamp, username, query, response, context)
     VALUES (?1, ?2, ?3, ?4, ?5)";

/// SQLite-backed conversation log. One connection guarded by a mutex;
/// inserts run on the blocking pool.
#[derive(Clone)]
pub struct SqliteConversationLog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteConversationLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened conversation log at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    pub fn count(&self) -> Result<usize, HistoryError> {
        let conn = self.conn.lock().map_err(|_| HistoryError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM conversations", [], |row|
            row.get(0)
        )?;
        Ok(count as usize)
    }

    fn insert(conn: &Mutex<Connection>, entry: &ConversationLogEntry) -> Result<(), HistoryError> {
        let conn = conn.lock().map_err(|_| HistoryError::Poisoned)?;
        conn.execute(
            INSERT_ENTRY,
            params![entry.timestamp, entry.username, entry.query, entry.response, entry.context]
        )?;
        Ok(())
    }
}

#[async_trait]
impl ConversationLog for SqliteConversationLog {
    async fn append(&self, entry: ConversationLogEntry) -> Result<(), HistoryError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || Self::insert(&conn, &entry)).await?
    }
}
