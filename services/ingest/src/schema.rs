//! Schema bootstrap: dimension tables, region seed, per-dataset fact tables.
//!
//! Bootstrap is existence-checked, never destructive: a fully bootstrapped
//! database makes `ensure_schema` a no-op per table, and a partially
//! bootstrapped one (some but not all dimension tables) aborts the run
//! before any data work.

use anyhow::{bail, Context, Result};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::datasets::{validate_identifier, Dataset};
use crate::regions::REGIONS;

pub const REGIONS_TABLE: &str = "mortgage_regions";
pub const PARAMETERS_TABLE: &str = "mortgage_parameters";
pub const DATA_NAMES_TABLE: &str = "mortgage_data_names";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Dimension tables were just created and the region seed loaded.
    FirstRun,
    /// All three dimension tables already existed.
    Ready,
}

pub async fn table_exists(pool: &PgPool, name: &str) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = $1
         )",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to check existence of table {name}"))?;

    Ok(exists)
}

/// Make sure every table the run needs exists. Fact tables are checked per
/// dataset on every run, so a dataset enabled after the first run still
/// gets its table.
pub async fn ensure_schema(pool: &PgPool, datasets: &[Dataset]) -> Result<SchemaState> {
    let mut present = 0;
    for table in [REGIONS_TABLE, PARAMETERS_TABLE, DATA_NAMES_TABLE] {
        if table_exists(pool, table).await? {
            present += 1;
        }
    }

    if present != 0 && present != 3 {
        bail!(
            "schema inconsistent: {present} of 3 dimension tables exist; \
             inspect and fix the database manually before re-running"
        );
    }

    let state = if present == 0 {
        create_dimension_tables(pool).await?;
        SchemaState::FirstRun
    } else {
        SchemaState::Ready
    };

    for dataset in datasets {
        ensure_fact_table(pool, dataset).await?;
    }

    Ok(state)
}

/// Create all three dimension tables and seed the regions in one
/// transaction, so a failed first run leaves no partial schema behind.
async fn create_dimension_tables(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE {REGIONS_TABLE}
        (
            id INTEGER PRIMARY KEY,
            title VARCHAR(255) NOT NULL UNIQUE,
            title_eng VARCHAR(255) NOT NULL UNIQUE
        )
        "#
    ))
    .execute(&mut *tx)
    .await
    .context("failed to create regions table")?;

    let mut seed: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("INSERT INTO {REGIONS_TABLE} (id, title, title_eng) "));
    seed.push_values(REGIONS, |mut b, region| {
        b.push_bind(region.code)
            .push_bind(region.title)
            .push_bind(region.title_eng);
    });
    seed.build()
        .execute(&mut *tx)
        .await
        .context("failed to seed regions")?;

    for table in [PARAMETERS_TABLE, DATA_NAMES_TABLE] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE {table}
            (
                id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE
            )
            "#
        ))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to create dimension table {table}"))?;
    }

    tx.commit().await.context("failed to commit dimension bootstrap")?;
    Ok(())
}

/// Create one dataset's fact table if absent: surrogate key, positive FKs
/// to the series and link dimensions, and the (series, link, date, value)
/// uniqueness constraint that makes re-ingestion detectable.
async fn ensure_fact_table(pool: &PgPool, dataset: &Dataset) -> Result<()> {
    let table = dataset.table_name();
    validate_identifier(&table).with_context(|| format!("dataset {:?}", dataset.file))?;

    if table_exists(pool, &table).await? {
        return Ok(());
    }

    let link = dataset.kind.link_column();
    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE {table}
        (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            data_name_id INTEGER NOT NULL CHECK (data_name_id > 0),
            {link} INTEGER NOT NULL CHECK ({link} > 0),
            value NUMERIC(18, 3) NOT NULL,
            date DATE NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT uc_data_date_value_{table} UNIQUE (data_name_id, {link}, date, value)
        )
        "#
    ))
    .execute(&mut *tx)
    .await
    .with_context(|| format!("failed to create fact table {table}"))?;

    sqlx::query(&format!("CREATE INDEX idx_{table}_date ON {table} (date)"))
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        "CREATE INDEX idx_{table}_data_per_date ON {table} (data_name_id, {link}, date)"
    ))
    .execute(&mut *tx)
    .await?;

    tx.commit()
        .await
        .with_context(|| format!("failed to commit fact table {table}"))?;
    Ok(())
}
