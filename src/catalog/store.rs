//! # SQLite catalog store
//!
//! Keeps the parsed [`NeoRecord`]s in a single `neo` table of a local SQLite database,
//! keyed by packed designation.
//!
//! Loading is done in stages, each one idempotent so that a run can be repeated:
//!
//! 1. [`CatalogStore::create_schema`] – creates the `neo` table with the raw record columns;
//! 2. [`CatalogStore::insert_records`] – `INSERT OR REPLACE` inside one transaction;
//! 3. [`CatalogStore::add_derived_columns`] – adds `perihelion` / `aphelion` and fills them
//!    with `a(1 − e)` / `a(1 + e)` directly in SQL;
//! 4. [`CatalogStore::classify_all`] – adds `orbit_class` and tags every row with its
//!    [`NeoClass`].
use std::collections::BTreeMap;

use camino::Utf8Path;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::{
    catalog::NeoRecord,
    neolab_errors::NeoError,
    orbit_class::{neo_class, NeoClass},
};

const CREATE_NEO_TABLE: &str = "
CREATE TABLE IF NOT EXISTS neo (
    designation        TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    abs_mag            REAL,
    slope_g            REAL,
    epoch              REAL NOT NULL,
    mean_anomaly       REAL NOT NULL,
    periapsis_argument REAL NOT NULL,
    ascending_node     REAL NOT NULL,
    inclination        REAL NOT NULL,
    eccentricity       REAL NOT NULL,
    mean_motion        REAL NOT NULL,
    semi_major_axis    REAL NOT NULL,
    n_observations     INTEGER,
    n_oppositions      INTEGER,
    rms_residual       REAL
);";

const RECORD_COLUMNS: &str = "designation, name, abs_mag, slope_g, epoch, mean_anomaly, \
     periapsis_argument, ascending_node, inclination, eccentricity, mean_motion, \
     semi_major_axis, n_observations, n_oppositions, rms_residual";

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<NeoRecord> {
    Ok(NeoRecord {
        designation: row.get("designation")?,
        name: row.get("name")?,
        abs_mag: row.get("abs_mag")?,
        slope_g: row.get("slope_g")?,
        epoch: row.get("epoch")?,
        mean_anomaly: row.get("mean_anomaly")?,
        periapsis_argument: row.get("periapsis_argument")?,
        ascending_node: row.get("ascending_node")?,
        inclination: row.get("inclination")?,
        eccentricity: row.get("eccentricity")?,
        mean_motion: row.get("mean_motion")?,
        semi_major_axis: row.get("semi_major_axis")?,
        n_observations: row.get("n_observations")?,
        n_oppositions: row.get("n_oppositions")?,
        rms_residual: row.get("rms_residual")?,
    })
}

/// Local relational store of the NEO catalog.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Utf8Path) -> Result<Self, NeoError> {
        debug!(%path, "opening catalog database");
        Ok(CatalogStore {
            conn: Connection::open(path)?,
        })
    }

    /// Open a database previously written by the load pipeline.
    ///
    /// Unlike [`CatalogStore::open`], a missing file is an error instead of a new empty database.
    pub fn open_existing(path: &Utf8Path) -> Result<Self, NeoError> {
        if !path.is_file() {
            return Err(NeoError::CatalogNotFound(path.to_string()));
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self, NeoError> {
        Ok(CatalogStore {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn create_schema(&self) -> Result<(), NeoError> {
        self.conn.execute_batch(CREATE_NEO_TABLE)?;
        Ok(())
    }

    fn has_column(&self, name: &str) -> Result<bool, NeoError> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info('neo')")?;
        let columns = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for column in columns {
            if column? == name {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn ensure_column(&self, name: &str, sql_type: &str) -> Result<(), NeoError> {
        if !self.has_column(name)? {
            debug!(column = name, "adding column to neo table");
            self.conn
                .execute_batch(&format!("ALTER TABLE neo ADD COLUMN {name} {sql_type};"))?;
        }
        Ok(())
    }

    /// Insert or replace `records` in a single transaction.
    ///
    /// Return
    /// ------
    /// * The number of rows written.
    pub fn insert_records(&mut self, records: &[NeoRecord]) -> Result<usize, NeoError> {
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT OR REPLACE INTO neo ({RECORD_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ))?;
            for r in records {
                written += stmt.execute(params![
                    r.designation,
                    r.name,
                    r.abs_mag,
                    r.slope_g,
                    r.epoch,
                    r.mean_anomaly,
                    r.periapsis_argument,
                    r.ascending_node,
                    r.inclination,
                    r.eccentricity,
                    r.mean_motion,
                    r.semi_major_axis,
                    r.n_observations,
                    r.n_oppositions,
                    r.rms_residual,
                ])?;
            }
        }
        tx.commit()?;
        info!(n_rows = written, "catalog records stored");
        Ok(written)
    }

    /// Add and fill the `perihelion` and `aphelion` columns.
    ///
    /// Return
    /// ------
    /// * The number of rows updated.
    pub fn add_derived_columns(&self) -> Result<usize, NeoError> {
        self.ensure_column("perihelion", "REAL")?;
        self.ensure_column("aphelion", "REAL")?;
        let updated = self.conn.execute(
            "UPDATE neo SET perihelion = semi_major_axis * (1.0 - eccentricity), \
                            aphelion   = semi_major_axis * (1.0 + eccentricity)",
            [],
        )?;
        Ok(updated)
    }

    /// Add the `orbit_class` column and tag every row.
    ///
    /// Return
    /// ------
    /// * The number of rows updated.
    pub fn classify_all(&mut self) -> Result<usize, NeoError> {
        self.ensure_column("orbit_class", "TEXT")?;

        let classes: Vec<(String, NeoClass)> = {
            let mut stmt = self
                .conn
                .prepare("SELECT designation, semi_major_axis, eccentricity FROM neo")?;
            let rows = stmt.query_map([], |row| {
                let a: f64 = row.get(1)?;
                let e: f64 = row.get(2)?;
                Ok((
                    row.get::<_, String>(0)?,
                    neo_class(a, a * (1.0 - e), a * (1.0 + e)),
                ))
            })?;
            let classes = rows.collect::<Result<Vec<_>, _>>()?;
            classes
        };

        let tx = self.conn.transaction()?;
        let mut updated = 0;
        {
            let mut stmt =
                tx.prepare_cached("UPDATE neo SET orbit_class = ?1 WHERE designation = ?2")?;
            for (designation, class) in &classes {
                updated += stmt.execute(params![class.as_str(), designation])?;
            }
        }
        tx.commit()?;
        info!(n_rows = updated, "catalog rows classified");
        Ok(updated)
    }

    pub fn record_count(&self) -> Result<usize, NeoError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM neo", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of rows per orbit class; unclassified rows are not counted.
    pub fn count_by_class(&self) -> Result<BTreeMap<NeoClass, usize>, NeoError> {
        let mut stmt = self.conn.prepare(
            "SELECT orbit_class, COUNT(*) FROM neo \
             WHERE orbit_class IS NOT NULL GROUP BY orbit_class",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (class, count) = row?;
            counts.insert(class.parse::<NeoClass>()?, count as usize);
        }
        Ok(counts)
    }

    /// Look up one object by packed designation.
    pub fn get(&self, designation: &str) -> Result<Option<NeoRecord>, NeoError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM neo WHERE designation = ?1"),
                [designation],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Look up one object by packed or readable designation.
    pub fn find(&self, designation: &str) -> Result<NeoRecord, NeoError> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM neo WHERE designation = ?1 OR name = ?1 LIMIT 1"
                ),
                [designation],
                row_to_record,
            )
            .optional()?;
        record.ok_or_else(|| NeoError::ObjectNotFound(designation.to_string()))
    }

    /// Objects with an absolute magnitude below `h_limit`, brightest first.
    pub fn brighter_than(&self, h_limit: f64) -> Result<Vec<NeoRecord>, NeoError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM neo WHERE abs_mag < ?1 ORDER BY abs_mag"
        ))?;
        let records = stmt
            .query_map([h_limit], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Objects tagged with `class` by [`CatalogStore::classify_all`].
    pub fn by_class(&self, class: NeoClass) -> Result<Vec<NeoRecord>, NeoError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM neo WHERE orbit_class = ?1 ORDER BY designation"
        ))?;
        let records = stmt
            .query_map([class.as_str()], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Derived `(perihelion, aphelion)` columns of one object, if computed.
    pub fn derived_distances(&self, designation: &str) -> Result<Option<(f64, f64)>, NeoError> {
        let distances = self
            .conn
            .query_row(
                "SELECT perihelion, aphelion FROM neo WHERE designation = ?1",
                [designation],
                |row| {
                    Ok(row
                        .get::<_, Option<f64>>(0)?
                        .zip(row.get::<_, Option<f64>>(1)?))
                },
            )
            .optional()?;
        Ok(distances.flatten())
    }
}
