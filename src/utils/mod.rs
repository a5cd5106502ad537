pub mod json_extract;
pub mod logging;
pub mod numbers;

pub use json_extract::{extract_json_object, parse_json_object, strip_code_fences};
pub use logging::truncate_text;
