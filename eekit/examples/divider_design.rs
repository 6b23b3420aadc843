//! Example: pick a feedback divider for a few common regulator outputs

use eekit::calculators::DividerInput;
use eekit::prelude::*;

fn main() {
    let vin = 12.0;
    let r1 = 10_000.0;

    for vout in [1.2, 1.8, 3.3, 5.0, 9.0, 12.0] {
        let calc = Calculation::Divider(DividerInput { vin, vout, r1 });
        println!("{} V from {} V:", vout, vin);
        for reading in ToolboxCore::readings(&calc) {
            println!("  {:<12} {}", reading.label, reading.value);
        }
    }
}
