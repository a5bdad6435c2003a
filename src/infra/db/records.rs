//! Read-only resource tables queried through compiled predicates.

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder, postgres::PgRow};

use crate::application::repos::{RecordsRepo, RepoError};
use crate::domain::entities::{InstitutionRecord, MetadataRecord, ReportRecord};
use crate::domain::filter::{FilterableRecord, Predicate, RecordField};

use super::{PostgresRepositories, map_sqlx_error};

const LIKE_ESCAPE: char = '\\';

/// A domain record backed by one table.
pub trait TableRecord: FilterableRecord + Sized + Send + Sync + 'static {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Self>;

    const TABLE: &'static str;
    const COLUMNS: &'static str;
}

#[derive(Debug, FromRow)]
pub struct InstitutionRow {
    id: i64,
    symbol: String,
    top_sellers: String,
    top_buyers: String,
}

impl From<InstitutionRow> for InstitutionRecord {
    fn from(row: InstitutionRow) -> Self {
        Self {
            id: row.id,
            symbol: row.symbol,
            top_sellers: row.top_sellers,
            top_buyers: row.top_buyers,
        }
    }
}

impl TableRecord for InstitutionRecord {
    type Row = InstitutionRow;

    const TABLE: &'static str = "institutions";
    const COLUMNS: &'static str = "id, symbol, top_sellers, top_buyers";
}

#[derive(Debug, FromRow)]
pub struct ReportRow {
    id: i64,
    sub_sector: String,
    report: String,
}

impl From<ReportRow> for ReportRecord {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            sub_sector: row.sub_sector,
            report: row.report,
        }
    }
}

impl TableRecord for ReportRecord {
    type Row = ReportRow;

    const TABLE: &'static str = "reports";
    const COLUMNS: &'static str = "id, sub_sector, report";
}

#[derive(Debug, FromRow)]
pub struct MetadataRow {
    id: i64,
    sector: String,
    sub_sector: String,
}

impl From<MetadataRow> for MetadataRecord {
    fn from(row: MetadataRow) -> Self {
        Self {
            id: row.id,
            sector: row.sector,
            sub_sector: row.sub_sector,
        }
    }
}

impl TableRecord for MetadataRecord {
    type Row = MetadataRow;

    const TABLE: &'static str = "metadata";
    const COLUMNS: &'static str = "id, sector, sub_sector";
}

#[async_trait]
impl<R> RecordsRepo<R> for PostgresRepositories
where
    R: TableRecord,
{
    async fn query(&self, predicate: &Predicate<R::Field>) -> Result<Vec<R>, RepoError> {
        let mut qb = select_query::<R>(predicate);
        let rows: Vec<R::Row> = qb
            .build_query_as::<R::Row>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

fn select_query<R: TableRecord>(predicate: &Predicate<R::Field>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(R::COLUMNS);
    qb.push(" FROM ");
    qb.push(R::TABLE);
    qb.push(" WHERE ");
    push_predicate(&mut qb, predicate);
    qb.push(" ORDER BY id");
    qb
}

fn push_predicate<F: RecordField>(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate<F>) {
    match predicate {
        Predicate::All => {
            qb.push("TRUE");
        }
        Predicate::Contains { field, term } => {
            qb.push(field.column());
            qb.push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(term)));
            qb.push(" ESCAPE '\\'");
        }
        Predicate::Any(alternatives) => push_group(qb, alternatives, " OR ", "FALSE"),
        Predicate::Every(conditions) => push_group(qb, conditions, " AND ", "TRUE"),
    }
}

fn push_group<F: RecordField>(
    qb: &mut QueryBuilder<'static, Postgres>,
    operands: &[Predicate<F>],
    separator: &str,
    identity: &str,
) {
    if operands.is_empty() {
        qb.push(identity);
        return;
    }
    qb.push("(");
    for (idx, operand) in operands.iter().enumerate() {
        if idx > 0 {
            qb.push(separator);
        }
        push_predicate(qb, operand);
    }
    qb.push(")");
}

/// Escape LIKE metacharacters so `term` matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}
