//! Domain entities mirrored from persistent storage.

use super::filter::{FilterableRecord, RecordField};

/// Institutional trading activity for a listed symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionRecord {
    pub id: i64,
    pub symbol: String,
    pub top_sellers: String,
    pub top_buyers: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstitutionField {
    Symbol,
    TopSellers,
    TopBuyers,
}

impl RecordField for InstitutionField {
    fn column(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::TopSellers => "top_sellers",
            Self::TopBuyers => "top_buyers",
        }
    }
}

impl FilterableRecord for InstitutionRecord {
    type Field = InstitutionField;

    fn text(&self, field: InstitutionField) -> &str {
        match field {
            InstitutionField::Symbol => &self.symbol,
            InstitutionField::TopSellers => &self.top_sellers,
            InstitutionField::TopBuyers => &self.top_buyers,
        }
    }
}

/// Research report attached to a sub-sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub id: i64,
    pub sub_sector: String,
    pub report: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    SubSector,
}

impl RecordField for ReportField {
    fn column(self) -> &'static str {
        match self {
            Self::SubSector => "sub_sector",
        }
    }
}

impl FilterableRecord for ReportRecord {
    type Field = ReportField;

    fn text(&self, field: ReportField) -> &str {
        match field {
            ReportField::SubSector => &self.sub_sector,
        }
    }
}

/// Sector / sub-sector classification entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub id: i64,
    pub sector: String,
    pub sub_sector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Sector,
    SubSector,
}

impl RecordField for MetadataField {
    fn column(self) -> &'static str {
        match self {
            Self::Sector => "sector",
            Self::SubSector => "sub_sector",
        }
    }
}

impl FilterableRecord for MetadataRecord {
    type Field = MetadataField;

    fn text(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Sector => &self.sector,
            MetadataField::SubSector => &self.sub_sector,
        }
    }
}
