mod advertisement_dto;

pub use advertisement_dto::{
    AdStatsDto, AdvertisementQueryParams, AdvertisementResponseDto, CreateAdvertisementDto,
    PlacementQuery, RecordMetricDto, UpdateAdStatusDto,
};
