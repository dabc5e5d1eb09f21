mod month_window;

pub use month_window::{month_windows, MonthWindow};
