//! The catalog module owns the SQLite database that mined metadata is written into.
//!
//! The catalog holds three entity tables: performers and albums, which are unique by name, and
//! rolas (tracks), which reference one of each. Every mined file becomes one rola, written inside a
//! single transaction together with any performer or album it introduces.

use crate::error::{MinerError, Result};
use crate::metadata::CanonicalMetadata;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static CATALOG_SCHEMA: &str = include_str!("catalog.sql");

pub type PerformerId = i64;
pub type AlbumId = i64;
pub type RolaId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performer {
    pub id: PerformerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub path: PathBuf,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rola {
    pub id: RolaId,
    pub performer_id: PerformerId,
    pub album_id: AlbumId,
    pub path: PathBuf,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub track_number: u32,
    pub track_total: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub performers: i64,
    pub albums: i64,
    pub rolas: i64,
}

/// Handle to an open catalog database. The connection closes when the handle is dropped.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open the catalog at `path`, creating the file and the schema if needed.
    pub fn open(path: &Path) -> Result<Catalog> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MinerError::io(parent, e))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA busy_timeout = 15000;
            ",
        )?;
        debug!("Opened catalog database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Catalog> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Catalog> {
        conn.execute_batch(CATALOG_SCHEMA)?;
        Ok(Catalog { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error SQLite reports while doing so.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    /// Write one mined file into the catalog and return the id of its new rola.
    ///
    /// The performer and album are looked up by name and only inserted when absent. The rola itself
    /// is always inserted, so writing the same file twice produces two rolas. All of it happens in
    /// one transaction: on error nothing is committed and the error names the failing step.
    pub fn write_rola(&mut self, path: &Path, metadata: &CanonicalMetadata) -> Result<RolaId> {
        // IMMEDIATE holds the write lock from the first lookup through the rola insert.
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let performer_id = _lookup_or_insert_performer(&tx, &metadata.artist).map_err(|source| {
            MinerError::PerformerInsert {
                name: metadata.artist.clone(),
                source,
            }
        })?;

        let album_dir = path.parent().unwrap_or(path);
        let album_id = _lookup_or_insert_album(&tx, &metadata.album, album_dir, metadata.year).map_err(|source| {
            MinerError::AlbumInsert {
                name: metadata.album.clone(),
                source,
            }
        })?;

        let rola_id = _insert_rola(&tx, performer_id, album_id, path, metadata).map_err(|source| {
            MinerError::TrackInsert {
                title: metadata.title.clone(),
                source,
            }
        })?;

        tx.commit()?;
        debug!(
            "Catalogued {} as rola {} (performer {}, album {})",
            path.display(),
            rola_id,
            performer_id,
            album_id
        );
        Ok(rola_id)
    }

    pub fn performer_id(&self, name: &str) -> Result<Option<PerformerId>> {
        Ok(self
            .conn
            .query_row("SELECT id_performer FROM performers WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn album_id(&self, name: &str) -> Result<Option<AlbumId>> {
        Ok(self
            .conn
            .query_row("SELECT id_album FROM albums WHERE name = ?1", params![name], |row| row.get(0))
            .optional()?)
    }

    pub fn get_rola(&self, id: RolaId) -> Result<Option<Rola>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id_rola, id_performer, id_album, path, title, genre, year, track_number, track_total
                 FROM rolas WHERE id_rola = ?1",
                params![id],
                rola_from_row,
            )
            .optional()?)
    }

    pub fn list_rolas(&self) -> Result<Vec<Rola>> {
        let mut stmt = self.conn.prepare(
            "SELECT id_rola, id_performer, id_album, path, title, genre, year, track_number, track_total
             FROM rolas ORDER BY id_rola",
        )?;
        let rows = stmt.query_map([], rola_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn list_performers(&self) -> Result<Vec<Performer>> {
        let mut stmt = self.conn.prepare("SELECT id_performer, name FROM performers ORDER BY id_performer")?;
        let rows = stmt.query_map([], |row| {
            Ok(Performer {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn list_albums(&self) -> Result<Vec<Album>> {
        let mut stmt = self.conn.prepare("SELECT id_album, name, path, year FROM albums ORDER BY id_album")?;
        let rows = stmt.query_map([], |row| {
            Ok(Album {
                id: row.get(0)?,
                name: row.get(1)?,
                path: PathBuf::from(row.get::<_, String>(2)?),
                year: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        Ok(self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM performers)
                  , (SELECT COUNT(*) FROM albums)
                  , (SELECT COUNT(*) FROM rolas)",
            [],
            |row| {
                Ok(CatalogStats {
                    performers: row.get(0)?,
                    albums: row.get(1)?,
                    rolas: row.get(2)?,
                })
            },
        )?)
    }
}

fn rola_from_row(row: &Row) -> rusqlite::Result<Rola> {
    Ok(Rola {
        id: row.get(0)?,
        performer_id: row.get(1)?,
        album_id: row.get(2)?,
        path: PathBuf::from(row.get::<_, String>(3)?),
        title: row.get(4)?,
        genre: row.get(5)?,
        year: row.get(6)?,
        track_number: row.get(7)?,
        track_total: row.get(8)?,
    })
}

fn _lookup_or_insert_performer(tx: &Transaction, name: &str) -> rusqlite::Result<PerformerId> {
    let inserted = tx.execute(
        "INSERT INTO performers (name) VALUES (?1) ON CONFLICT (name) DO NOTHING",
        params![name],
    )?;
    if inserted > 0 {
        info!("Added performer {name} to the catalog");
    }
    tx.query_row("SELECT id_performer FROM performers WHERE name = ?1", params![name], |row| row.get(0))
}

fn _lookup_or_insert_album(tx: &Transaction, name: &str, dir: &Path, year: i32) -> rusqlite::Result<AlbumId> {
    let inserted = tx.execute(
        "INSERT INTO albums (name, path, year) VALUES (?1, ?2, ?3) ON CONFLICT (name) DO NOTHING",
        params![name, dir.to_string_lossy(), year],
    )?;
    if inserted > 0 {
        info!("Added album {name} to the catalog");
    }
    tx.query_row("SELECT id_album FROM albums WHERE name = ?1", params![name], |row| row.get(0))
}

fn _insert_rola(
    tx: &Transaction,
    performer_id: PerformerId,
    album_id: AlbumId,
    path: &Path,
    metadata: &CanonicalMetadata,
) -> rusqlite::Result<RolaId> {
    tx.execute(
        "INSERT INTO rolas (id_performer, id_album, path, title, genre, year, track_number, track_total)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            performer_id,
            album_id,
            path.to_string_lossy(),
            metadata.title,
            metadata.genre,
            metadata.year,
            metadata.track.number,
            metadata.track.total,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}
