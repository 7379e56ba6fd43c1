//! Fact loading: one sheet batch per transaction.
//!
//! A batch either commits whole or rolls back whole. An integrity failure
//! (duplicate observation, malformed value, unusable date) almost always
//! means the published file changed shape, so it is fatal for the run
//! rather than retried per row.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::datasets::{Dataset, DatasetKind};
use crate::dimensions::Dimensions;
use crate::normalize::ConvertedDate;
use crate::workbook::ObservationDraft;

/// Resolve every draft's link id, then insert the whole sheet as one
/// batched statement inside one transaction. Returns the number of rows
/// inserted.
pub async fn load_sheet(
    pool: &PgPool,
    dims: &mut Dimensions,
    dataset: &Dataset,
    series_id: i32,
    drafts: &[ObservationDraft],
) -> Result<u64> {
    if drafts.is_empty() {
        return Ok(0);
    }

    let mut rows: Vec<(i32, NaiveDate, String)> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let link_id = match dataset.kind {
            DatasetKind::ParameterLinked => {
                dims.resolve_parameter(pool, &draft.link_label).await?
            }
            DatasetKind::RegionLinked => dims.region_id(&draft.link_label)?,
        };
        let date = draft_date(draft)?;
        rows.push((link_id, date, draft.value.clone()));
    }

    let table = dataset.table_name();
    let link = dataset.kind.link_column();

    // Values are bound as text and cast in the statement, so the store does
    // the numeric validation and rejects anything malformed.
    let mut insert: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "INSERT INTO {table} (data_name_id, {link}, value, date, created_at) "
    ));
    insert.push_values(&rows, |mut b, (link_id, date, value)| {
        b.push_bind(series_id)
            .push_bind(*link_id)
            .push_bind(value.as_str())
            .push_unseparated("::numeric")
            .push_bind(*date)
            .push("now()");
    });

    let mut tx = pool.begin().await.context("failed to begin fact batch")?;
    match insert.build().execute(&mut *tx).await {
        Ok(done) => {
            tx.commit().await.context("failed to commit fact batch")?;
            Ok(done.rows_affected())
        }
        Err(err) => {
            let _ = tx.rollback().await;
            if is_integrity_error(&err) {
                Err(err).with_context(|| {
                    format!(
                        "load failed for {table}: batch rejected by the store \
                         (duplicate observation or malformed value); \
                         investigate the source file before re-running"
                    )
                })
            } else {
                Err(err).with_context(|| format!("failed to insert fact batch into {table}"))
            }
        }
    }
}

/// Canonical drafts carry their date already. Unparsed labels get one
/// strict "%d.%m.%Y" attempt - some files ship pre-formatted headers - and
/// anything still unreadable fails the batch.
fn draft_date(draft: &ObservationDraft) -> Result<NaiveDate> {
    match &draft.date {
        ConvertedDate::Canonical(date) => Ok(*date),
        ConvertedDate::Unparsed(raw) => NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
            .with_context(|| {
                format!(
                    "row {}, column {}: unusable date label {raw:?}",
                    draft.row + 1,
                    draft.col + 1
                )
            }),
    }
}

/// Uniqueness violations and data exceptions (SQLSTATE classes 23 and 22)
/// are the "investigate the source" category; everything else is a plain
/// database failure.
fn is_integrity_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation()
                || db
                    .code()
                    .is_some_and(|code| code.starts_with("22") || code.starts_with("23"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(date: ConvertedDate) -> ObservationDraft {
        ObservationDraft {
            link_label: "Mortgage loans".to_string(),
            date,
            value: "1".to_string(),
            row: 2,
            col: 1,
        }
    }

    #[test]
    fn test_draft_date_canonical() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 1).unwrap();
        let d = draft(ConvertedDate::Canonical(date));
        assert_eq!(draft_date(&d).unwrap(), date);
    }

    #[test]
    fn test_draft_date_unparsed_but_canonical_format() {
        let d = draft(ConvertedDate::Unparsed("01.09.2023".to_string()));
        assert_eq!(
            draft_date(&d).unwrap(),
            NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_draft_date_unusable_label_fails_with_position() {
        let d = draft(ConvertedDate::Unparsed("August 2023".to_string()));
        let err = draft_date(&d).unwrap_err().to_string();
        assert!(err.contains("row 3"));
        assert!(err.contains("column 2"));
    }
}
