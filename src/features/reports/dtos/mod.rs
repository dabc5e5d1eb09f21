mod report_dto;

pub use report_dto::{
    CreateReportDto, ReportDetailDto, ReportQueryParams, ReportedCommentDto, ReportedPostDto, ReportResponseDto, ResolveReportDto,
    ResolveReportResponseDto,
};
