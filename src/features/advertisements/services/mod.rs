mod ad_metric_service;
mod advertisement_service;

pub use ad_metric_service::AdMetricService;
pub use advertisement_service::AdvertisementService;
