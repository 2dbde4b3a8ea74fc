use super::{BoardStore, PersistenceResult};
use crate::group::InterventionGroup;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;
use tracing::info;

pub struct SqliteBoardStore {
    connection: Mutex<Connection>,
}

impl SqliteBoardStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS board_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                saved_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS intervention_groups (
                position INTEGER PRIMARY KEY,
                group_id TEXT NOT NULL UNIQUE,
                group_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // An interrupted transaction has already rolled back.
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BoardStore for SqliteBoardStore {
    fn save_groups(&self, groups: &[InterventionGroup]) -> PersistenceResult<()> {
        super::validate_groups(groups)?;
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM board_state", [])?;
        tx.execute(
            "INSERT INTO board_state (id, saved_at) VALUES (1, ?1)",
            params![chrono::Utc::now().to_rfc3339()],
        )?;
        tx.execute("DELETE FROM intervention_groups", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO intervention_groups (position, group_id, group_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, group) in groups.iter().enumerate() {
                let json = serde_json::to_string(group)?;
                stmt.execute(params![position as i64, group.id.as_str(), json])?;
            }
        }
        tx.commit()?;
        info!(groups = groups.len(), "board saved to sqlite");
        Ok(())
    }

    fn load_groups(&self) -> PersistenceResult<Option<Vec<InterventionGroup>>> {
        let conn = self.lock();

        let saved_at: Option<String> = conn
            .query_row("SELECT saved_at FROM board_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if saved_at.is_none() {
            return Ok(None);
        }

        let mut stmt =
            conn.prepare("SELECT group_json FROM intervention_groups ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut groups = Vec::new();
        for json in rows {
            let group: InterventionGroup = serde_json::from_str(&json?)?;
            groups.push(group);
        }

        super::validate_groups(&groups)?;
        info!(groups = groups.len(), "board loaded from sqlite");
        Ok(Some(groups))
    }
}
