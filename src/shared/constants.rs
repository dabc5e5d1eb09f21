/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Number of posts on the "latest news" strip of the home page
pub const LATEST_POSTS_LIMIT: i64 = 5;

/// Number of monthly buckets on the dashboard overview chart
pub const OVERVIEW_MONTHS: u32 = 5;

/// Length of e-mailed registration codes
pub const OTP_LENGTH: usize = 6;

/// Wrong guesses a registration code survives before it is burned
pub const OTP_MAX_ATTEMPTS: i32 = 5;
