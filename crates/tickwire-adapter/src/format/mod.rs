/*
[INPUT]:  Numeric values and formatting options
[OUTPUT]: Locale-grouped display strings
[POS]:    Formatting layer - number presentation
[UPDATE]: When changing locale conventions or formatting options
*/

pub mod locale;
pub mod number;

pub use locale::NumberLocale;
pub use number::{format_decimal, format_number, FormatOptions, NumberFormatter};
