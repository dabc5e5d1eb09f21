mod ad_metric_handler;
mod advertisement_handler;

pub use ad_metric_handler::*;
pub use advertisement_handler::*;
