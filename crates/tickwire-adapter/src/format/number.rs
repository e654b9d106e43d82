/*
[INPUT]:  f64 or Decimal values plus FormatOptions
[OUTPUT]: Locale-grouped strings, optionally with a forced fractional part
[POS]:    Formatting layer - number formatter
[UPDATE]: When changing rounding, grouping, or the forced-decimal rule
*/

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::locale::NumberLocale;

/// Options accepted by the number formatter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatOptions {
    /// Always show a fractional part (`1,234` becomes `1,234.0`)
    #[serde(default)]
    pub decimal: bool,
}

impl FormatOptions {
    pub fn with_decimal() -> Self {
        Self { decimal: true }
    }
}

/// Formats numbers with the default locale's grouping and decimal point.
///
/// Values are rounded half away from zero to the locale's maximum fraction
/// digits and trailing zeros are dropped, so `1234.5678` renders as
/// `1,234.568` and `2.50` as `2.5`.
#[derive(Debug, Clone, Default)]
pub struct NumberFormatter {
    locale: NumberLocale,
}

impl NumberFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    /// Format a floating point number.
    ///
    /// `NaN` and infinities render as locale symbols. Negative zero, and
    /// negative values that round to zero, keep their minus sign.
    pub fn format(&self, number: f64, options: &FormatOptions) -> String {
        let formatted = if number.is_nan() {
            self.locale.nan_symbol().to_string()
        } else if number.is_infinite() {
            let mut out = String::new();
            if number.is_sign_negative() {
                out.push(self.locale.minus_sign());
            }
            out.push_str(self.locale.infinity_symbol());
            out
        } else {
            match Decimal::from_f64(number) {
                Some(value) => self.format_plain(value, number.is_sign_negative()),
                // Outside Decimal's range
                None => self.format_plain_f64(number),
            }
        };
        self.apply_options(formatted, options)
    }

    /// Format an exact decimal value.
    pub fn format_decimal(&self, value: Decimal, options: &FormatOptions) -> String {
        let formatted = self.format_plain(value, value.is_sign_negative());
        self.apply_options(formatted, options)
    }

    fn apply_options(&self, mut formatted: String, options: &FormatOptions) -> String {
        let separator = self.locale.decimal_separator();
        if options.decimal && !formatted.contains(separator) {
            formatted.push(separator);
            formatted.push('0');
        }
        formatted
    }

    fn format_plain(&self, value: Decimal, negative: bool) -> String {
        let rounded = value
            .round_dp_with_strategy(
                self.locale.max_fraction_digits(),
                RoundingStrategy::MidpointAwayFromZero,
            )
            .normalize();
        let digits = rounded.abs().to_string();
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        self.assemble(negative, integer, fraction)
    }

    fn format_plain_f64(&self, number: f64) -> String {
        let negative = number.is_sign_negative();
        // Beyond Decimal's range every f64 is integral; tiny values round to zero
        if number.abs() < 1.0 {
            return self.assemble(negative, "0", "");
        }
        let digits = format!("{}", number.abs());
        let integer = digits.split_once('.').map_or(digits.as_str(), |(integer, _)| integer);
        self.assemble(negative, integer, "")
    }

    fn assemble(&self, negative: bool, integer: &str, fraction: &str) -> String {
        let grouped = self.locale.group_digits(integer);
        let mut out = String::with_capacity(grouped.len() + fraction.len() + 2);
        if negative {
            out.push(self.locale.minus_sign());
        }
        out.push_str(&grouped);
        if !fraction.is_empty() {
            out.push(self.locale.decimal_separator());
            out.push_str(fraction);
        }
        out
    }
}

/// Format `number` with the default locale.
pub fn format_number(number: f64, options: &FormatOptions) -> String {
    NumberFormatter::default().format(number, options)
}

/// Format a `Decimal` with the default locale.
pub fn format_decimal(value: Decimal, options: &FormatOptions) -> String {
    NumberFormatter::default().format_decimal(value, options)
}
