//! Pure formatting and calculation helpers shared by the backend and any UI.
//!
//! Everything here is synchronous and side-effect free. Only the date helpers
//! can fail, and only when handed a string that is not ISO-8601.

pub mod collections;
pub mod dates;
pub mod format;
pub mod stats;
pub mod text;
pub mod validation;

pub use collections::{fuzzy_search, group_by, sort_by};
pub use dates::{
    calculate_age, calculate_age_at, format_date, format_date_time, format_date_with,
    get_relative_time, parse_iso, relative_time_from, Age, DateParseError, IntoLocalDateTime,
    DATE_TIME_PATTERN, DEFAULT_DATE_PATTERN,
};
pub use format::{
    category_color, convert_weight, format_currency, format_file_size, format_weight,
    species_color,
};
pub use stats::{calculate_average, calculate_growth_rate, calculate_percentile};
pub use text::{
    capitalize_first, create_slug, error_message, file_extension, title_case, truncate_text,
};
pub use validation::{is_valid_email, is_valid_phone_number};
