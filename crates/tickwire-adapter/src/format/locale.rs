/*
[INPUT]:  None (fixed default conventions)
[OUTPUT]: Separator and precision settings consumed by the formatter
[POS]:    Formatting layer - locale conventions
[UPDATE]: When the default numeric conventions change
*/

/// Numeric conventions of the default locale.
///
/// Only the default instance is constructible; callers cannot pick another
/// locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    group_separator: char,
    decimal_separator: char,
    grouping_size: usize,
    max_fraction_digits: u32,
    minus_sign: char,
    nan_symbol: &'static str,
    infinity_symbol: &'static str,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            group_separator: ',',
            decimal_separator: '.',
            grouping_size: 3,
            max_fraction_digits: 3,
            minus_sign: '-',
            nan_symbol: "NaN",
            infinity_symbol: "∞",
        }
    }
}

impl NumberLocale {
    pub fn group_separator(&self) -> char {
        self.group_separator
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn grouping_size(&self) -> usize {
        self.grouping_size
    }

    /// Fraction digits kept after rounding
    pub fn max_fraction_digits(&self) -> u32 {
        self.max_fraction_digits
    }

    pub fn minus_sign(&self) -> char {
        self.minus_sign
    }

    pub fn nan_symbol(&self) -> &'static str {
        self.nan_symbol
    }

    pub fn infinity_symbol(&self) -> &'static str {
        self.infinity_symbol
    }

    /// Insert the group separator into a run of ASCII integer digits.
    pub(crate) fn group_digits(&self, digits: &str) -> String {
        let size = self.grouping_size.max(1);
        let mut out = String::with_capacity(digits.len() + digits.len() / size);
        for (index, ch) in digits.chars().rev().enumerate() {
            if index > 0 && index % size == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out.chars().rev().collect()
    }
}
