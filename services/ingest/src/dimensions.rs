//! In-memory dimension repository with get-or-create semantics.
//!
//! One `Dimensions` value is built per run, seeded from the store, and
//! passed to whatever needs resolution - no ambient state. A cache entry is
//! only added after the row durably exists, so the cache is never ahead of
//! the store. Caches do not survive the process; a new run preloads again.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use sqlx::PgPool;

use crate::normalize::{clean_name, lookup_key};
use crate::schema::{DATA_NAMES_TABLE, PARAMETERS_TABLE, REGIONS_TABLE};

pub struct Dimensions {
    series: HashMap<String, i32>,
    parameters: HashMap<String, i32>,
    regions: HashMap<String, i32>,
}

impl Dimensions {
    /// Seed all three caches from the store.
    pub async fn preload(pool: &PgPool) -> Result<Self> {
        Ok(Self {
            series: load_names(pool, DATA_NAMES_TABLE, "name").await?,
            parameters: load_names(pool, PARAMETERS_TABLE, "name").await?,
            regions: load_names(pool, REGIONS_TABLE, "title").await?,
        })
    }

    /// Series id for a sheet title, created on first encounter.
    pub async fn resolve_series(&mut self, pool: &PgPool, raw: &str) -> Result<i32> {
        get_or_create(&mut self.series, pool, DATA_NAMES_TABLE, raw).await
    }

    /// Parameter id for a row label, created on first encounter.
    pub async fn resolve_parameter(&mut self, pool: &PgPool, raw: &str) -> Result<i32> {
        get_or_create(&mut self.parameters, pool, PARAMETERS_TABLE, raw).await
    }

    /// Region id for a row label. Regions are pre-seeded; an unknown label
    /// means the source layout changed and needs a human.
    pub fn region_id(&self, raw: &str) -> Result<i32> {
        match self.regions.get(&lookup_key(raw)) {
            Some(&id) => Ok(id),
            None => bail!(
                "unknown region {:?}: the region dimension is fixed and never extended at runtime",
                raw.trim()
            ),
        }
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

async fn load_names(pool: &PgPool, table: &str, column: &str) -> Result<HashMap<String, i32>> {
    let rows: Vec<(i32, String)> = sqlx::query_as(&format!("SELECT id, {column} FROM {table}"))
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to preload {table}"))?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| (lookup_key(&name), id))
        .collect())
}

/// Cache hit needs no I/O. On a miss, insert and return the new id; if the
/// insert hits the name uniqueness constraint (single-writer today, so this
/// is a defensive path), re-read the id by name instead of failing. Each
/// dimension insert commits on its own.
async fn get_or_create(
    cache: &mut HashMap<String, i32>,
    pool: &PgPool,
    table: &str,
    raw: &str,
) -> Result<i32> {
    let name = clean_name(raw);
    let key = lookup_key(raw);

    if let Some(&id) = cache.get(&key) {
        return Ok(id);
    }

    let inserted: Result<(i32,), sqlx::Error> =
        sqlx::query_as(&format!("INSERT INTO {table} (name) VALUES ($1) RETURNING id"))
            .bind(&name)
            .fetch_one(pool)
            .await;

    let id = match inserted {
        Ok((id,)) => id,
        Err(err) if is_unique_violation(&err) => {
            // Lost the insert race to an equivalent row.
            let (id,): (i32,) =
                sqlx::query_as(&format!("SELECT id FROM {table} WHERE name = $1"))
                    .bind(&name)
                    .fetch_one(pool)
                    .await
                    .with_context(|| {
                        format!("{table}: insert conflicted but no row found for {name:?}")
                    })?;
            id
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to insert {name:?} into {table}"))
        }
    };

    cache.insert(key, id);
    Ok(id)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
