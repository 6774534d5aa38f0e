mod datetime;
mod filesystem;
mod string;

pub use datetime::{get_local_datetime_with_format, get_utc_iso_datetime};
pub use filesystem::write_error_to_log;
pub use string::{format_number, normalize_header, normalize_key};
