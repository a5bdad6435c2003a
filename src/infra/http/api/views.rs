//! List view descriptors served by the API.

use crate::application::filters::{institution_filter, metadata_filter, report_filter};
use crate::application::listing::ListView;
use crate::domain::entities::{InstitutionRecord, MetadataRecord, ReportRecord};

use super::models::{Institution, Metadata, Report};

pub const INSTITUTIONS: ListView<InstitutionRecord, Institution> = ListView {
    identity: "InstitutionsView",
    filter: institution_filter,
    present: Institution::from_record,
};

pub const REPORTS: ListView<ReportRecord, Report> = ListView {
    identity: "ReportsView",
    filter: report_filter,
    present: Report::from_record,
};

pub const METADATA: ListView<MetadataRecord, Metadata> = ListView {
    identity: "MetadataView",
    filter: metadata_filter,
    present: Metadata::from_record,
};
