//! Query-parameter filter builders, one per resource.
//!
//! Each recognized parameter carries a comma-separated list of terms. Terms of
//! one parameter are OR'ed, distinct parameters are AND'ed, and a missing or
//! empty parameter adds no constraint.

use crate::domain::entities::{InstitutionField, MetadataField, ReportField};
use crate::domain::filter::{Predicate, RecordField};

use super::query::QueryParams;

pub const PARAM_SYMBOL: &str = "symbol";
pub const PARAM_NAME: &str = "name";
pub const PARAM_SECTOR: &str = "sector";
pub const PARAM_SUB_SECTOR: &str = "sub_sector";

/// OR over the comma-separated terms of `name`, each tested against every field.
fn param_terms<F: RecordField>(params: &QueryParams, name: &str, fields: &[F]) -> Predicate<F> {
    match params.get(name).filter(|value| !value.is_empty()) {
        Some(value) => Predicate::any_term(fields, value.split(',')),
        None => Predicate::All,
    }
}

pub fn institution_filter(params: &QueryParams) -> Predicate<InstitutionField> {
    let symbol = param_terms(params, PARAM_SYMBOL, &[InstitutionField::Symbol]);
    // an institution name may appear on either side of the trade
    let name = param_terms(
        params,
        PARAM_NAME,
        &[InstitutionField::TopSellers, InstitutionField::TopBuyers],
    );
    symbol.and(name)
}

pub fn report_filter(params: &QueryParams) -> Predicate<ReportField> {
    param_terms(params, PARAM_SUB_SECTOR, &[ReportField::SubSector])
}

pub fn metadata_filter(params: &QueryParams) -> Predicate<MetadataField> {
    let sector = param_terms(params, PARAM_SECTOR, &[MetadataField::Sector]);
    let sub_sector = param_terms(params, PARAM_SUB_SECTOR, &[MetadataField::SubSector]);
    sector.and(sub_sector)
}
