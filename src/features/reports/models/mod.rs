mod report;

pub use report::{
    cascade_action, CascadeAction, CreateReport, Report, ReportDetail, ReportStatus, ReportTarget, ReportType,
    ReportWithContext,
};
