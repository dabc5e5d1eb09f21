mod ad_metric;
mod advertisement;

pub use ad_metric::{AdMetricType, AdStats};
pub use advertisement::{AdStatus, Advertisement, CreateAdvertisement};
