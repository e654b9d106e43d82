/*
[INPUT]:  Sample numbers
[OUTPUT]: Locale-formatted strings printed to stdout
[POS]:    Examples - number formatting
[UPDATE]: When formatting API changes
*/

use rust_decimal::Decimal;
use tickwire_adapter::*;

fn main() {
    println!("=== tickwire Number Formatting Example ===\n");

    let plain = FormatOptions::default();
    let decimal = FormatOptions::with_decimal();

    for value in [0.0, 1234.0, 1234.5, -98765.4321, 1e12] {
        println!(
            "{value:>16} -> {:>18} | decimal: {}",
            format_number(value, &plain),
            format_number(value, &decimal)
        );
    }

    let price = Decimal::new(6_512_345, 2);
    println!("\nDecimal {price} -> {}", format_decimal(price, &decimal));
}
