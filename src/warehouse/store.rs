//! SQLite-backed warehouse: owns the single connection of an ETL run.

use super::schema::WAREHOUSE_SCHEMA;
use super::statements::count_rows;
use crate::error::{EtlError, EtlResult};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// Row counts of the five warehouse tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songs: i64,
    pub artists: i64,
    pub time: i64,
    pub users: i64,
    pub songplays: i64,
}

pub struct SqliteWarehouse {
    conn: Connection,
}

impl SqliteWarehouse {
    /// Opens (or creates) the warehouse database file.
    ///
    /// With `init_schema` the five tables are created on a database that has
    /// none yet. In every case the tables found must match the declared schema.
    pub fn open<P: AsRef<Path>>(db_path: P, init_schema: bool) -> EtlResult<Self> {
        let db_path = db_path.as_ref();
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if init_schema {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        debug!("Opening warehouse database at {:?}", db_path);
        let conn = Connection::open_with_flags(db_path, flags)?;
        Self::from_connection(conn, init_schema)
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, true)
    }

    fn from_connection(conn: Connection, init_schema: bool) -> EtlResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;
        if table_count == 0 && init_schema {
            info!("Creating warehouse schema");
            WAREHOUSE_SCHEMA
                .create(&conn)
                .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;
        }
        WAREHOUSE_SCHEMA
            .validate(&conn)
            .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;

        Ok(SqliteWarehouse { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Starts the unit of work of one input file.
    pub fn begin_file(&mut self) -> EtlResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    pub fn counts(&self) -> EtlResult<TableCounts> {
        Ok(TableCounts {
            songs: count_rows(&self.conn, "songs")?,
            artists: count_rows(&self.conn, "artists")?,
            time: count_rows(&self.conn, "time")?,
            users: count_rows(&self.conn, "users")?,
            songplays: count_rows(&self.conn, "songplays")?,
        })
    }

    pub fn close(self) -> EtlResult<()> {
        self.conn.close().map_err(|(_, e)| EtlError::Storage(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_warehouse_starts_empty() {
        let warehouse = SqliteWarehouse::open_in_memory().unwrap();
        assert_eq!(warehouse.counts().unwrap(), TableCounts::default());
    }

    #[test]
    fn reopening_keeps_existing_tables() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sparkify.db");

        let warehouse = SqliteWarehouse::open(&db_path, true).unwrap();
        warehouse
            .connection()
            .execute(
                "INSERT INTO artists (artist_id, name) VALUES ('AR1', 'Casual')",
                [],
            )
            .unwrap();
        warehouse.close().unwrap();

        let warehouse = SqliteWarehouse::open(&db_path, true).unwrap();
        assert_eq!(warehouse.counts().unwrap().artists, 1);
        warehouse.close().unwrap();

        let warehouse = SqliteWarehouse::open(&db_path, false).unwrap();
        assert_eq!(warehouse.counts().unwrap().artists, 1);
    }

    #[test]
    fn missing_database_without_init_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = SqliteWarehouse::open(temp_dir.path().join("missing.db"), false);
        assert!(matches!(result, Err(EtlError::Storage(_))));
    }

    #[test]
    fn foreign_schema_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("other.db");
        let conn = Connection::open(&db_path).unwrap();
        conn.execute("CREATE TABLE songs (id INTEGER PRIMARY KEY)", [])
            .unwrap();
        drop(conn);

        match SqliteWarehouse::open(&db_path, true) {
            Err(EtlError::Schema(msg)) => assert!(msg.contains("artists does not exist")),
            other => panic!("expected a schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn dropped_file_transaction_rolls_back() {
        let mut warehouse = SqliteWarehouse::open_in_memory().unwrap();
        {
            let tx = warehouse.begin_file().unwrap();
            tx.execute(
                "INSERT INTO artists (artist_id, name) VALUES ('AR1', 'Casual')",
                [],
            )
            .unwrap();
        }
        assert_eq!(warehouse.counts().unwrap().artists, 0);

        let tx = warehouse.begin_file().unwrap();
        tx.execute(
            "INSERT INTO artists (artist_id, name) VALUES ('AR1', 'Casual')",
            [],
        )
        .unwrap();
        tx.commit().unwrap();
        assert_eq!(warehouse.counts().unwrap().artists, 1);
    }
}
