//! Public JSON representations of the list resources.

use serde::Serialize;

use crate::domain::entities::{InstitutionRecord, MetadataRecord, ReportRecord};

#[derive(Debug, Serialize)]
pub struct Institution {
    pub id: i64,
    pub symbol: String,
    pub top_sellers: String,
    pub top_buyers: String,
}

impl Institution {
    pub fn from_record(record: &InstitutionRecord) -> Self {
        Self {
            id: record.id,
            symbol: record.symbol.clone(),
            top_sellers: record.top_sellers.clone(),
            top_buyers: record.top_buyers.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub id: i64,
    pub sub_sector: String,
    pub report: String,
}

impl Report {
    pub fn from_record(record: &ReportRecord) -> Self {
        Self {
            id: record.id,
            sub_sector: record.sub_sector.clone(),
            report: record.report.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub id: i64,
    pub sector: String,
    pub sub_sector: String,
}

impl Metadata {
    pub fn from_record(record: &MetadataRecord) -> Self {
        Self {
            id: record.id,
            sector: record.sector.clone(),
            sub_sector: record.sub_sector.clone(),
        }
    }
}
