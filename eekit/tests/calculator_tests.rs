//! Integration tests for the eekit calculator core

use eekit::calculators::{
    divider, AdcInput, DacInput, DividerInput, I2cBusMode, I2cPullupInput, PowerModule,
    RcInput,
};
use eekit::codes::{convert_radix, decode_smd};
use eekit::eseries::{decompose, snap_e24, E24};
use eekit::prelude::*;
use eekit::units::convert;

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * b.abs().max(1e-30)
}

#[test]
fn test_unit_round_trip_every_pair() {
    let values = [1.0, 0.047, 3.3, 12_345.678, 1e-9];
    for dimension in Dimension::ALL {
        for &(from, _) in dimension.units() {
            for &(to, _) in dimension.units() {
                for &value in &values {
                    let there = convert(value, dimension, from, to).unwrap();
                    let back = convert(there, dimension, to, from).unwrap();
                    assert!(
                        close(back, value, 1e-12),
                        "{} {} -> {} -> {} gave {}",
                        value,
                        from,
                        to,
                        from,
                        back
                    );
                }
            }
        }
    }
}

#[test]
fn test_e24_snap_is_optimal() {
    let mut target = 0.37;
    while target < 2.0e6 {
        let snapped = snap_e24(target).unwrap();
        let (mantissa, exponent) = decompose(target).unwrap();
        let scale = 10f64.powi(exponent);
        let chosen = snapped / scale;
        let candidates: Vec<f64> = E24.iter().copied().chain(std::iter::once(10.0)).collect();

        assert!(
            candidates.iter().any(|m| close(chosen, *m, 1e-9)),
            "{} snapped to off-series {}",
            target,
            snapped
        );
        let best = (chosen - mantissa).abs();
        for m in &candidates {
            assert!(
                best <= (m - mantissa).abs() + 1e-9,
                "{}: {} is closer than {}",
                target,
                m * scale,
                snapped
            );
        }
        target *= 1.137;
    }
}

#[test]
fn test_snap_rejects_non_positive() {
    assert_eq!(snap_e24(0.0), None);
    assert_eq!(snap_e24(-47.0), None);
    assert_eq!(snap_e24(f64::NAN), None);
}

#[test]
fn test_divider_output_monotonic_and_bounded() {
    let vin = 12.0;
    let r1 = 10_000.0;
    let mut previous = 0.0;
    for r2 in [1.0, 10.0, 470.0, 6_800.0, 10_000.0, 1e6, 1e9] {
        let vout = divider::output_voltage(vin, r1, r2);
        assert!(vout > 0.0 && vout < vin);
        assert!(vout > previous);
        previous = vout;
    }
}

#[test]
fn test_divider_scenario_recomputes_from_snapped_part() {
    let result = DividerInput { vin: 12.0, vout: 5.0, r1: 10_000.0 }
        .calculate()
        .unwrap();
    assert!((result.r2_ideal - 7142.857).abs() < 0.01);
    assert!(result.r2_e24 == 6800.0 || result.r2_e24 == 7500.0);
    let vout = divider::output_voltage(12.0, 10_000.0, result.r2_e24);
    assert!((result.vout_real - vout).abs() < 1e-12);
    assert!(result.error_percent > 0.0);
}

#[test]
fn test_rc_scenario() {
    let fc = RcInput {
        resistance: 1000.0,
        capacitance_nf: 100.0,
    }
    .cutoff_hz()
    .unwrap();
    assert!((fc - 1591.549).abs() < 0.01);
}

#[test]
fn test_adc_scenario() {
    let reading = AdcInput { bits: 12, vref: 3.3, vin: 1.65 }.convert().unwrap();
    assert_eq!(reading.code, 2048);
    assert!(!reading.saturated);
}

#[test]
fn test_adc_dac_within_one_lsb() {
    for bits in [1, 4, 8, 10, 12, 16, 24] {
        for vref in [1.0, 2.5, 3.3, 5.0] {
            for step in 0..=50 {
                let vin = vref * f64::from(step) / 50.0;
                let adc = AdcInput { bits, vref, vin }.convert().unwrap();
                let dac = DacInput { bits, vref, code: adc.code }.convert().unwrap();
                assert!(
                    (dac.vout - vin).abs() <= adc.metrics.lsb_v * (1.0 + 1e-9),
                    "bits={} vref={} vin={} vout={}",
                    bits,
                    vref,
                    vin,
                    dac.vout
                );
            }
        }
    }
}

#[test]
fn test_smd_decoding() {
    let d = decode_smd("103");
    assert_eq!(d.value, Some(10_000.0));
    assert!(d.resistance.contains("kΩ"));
    assert!(d.capacitance.contains("kpF"));

    let d = decode_smd("472");
    assert_eq!(d.value, Some(4_700.0));

    for bad in ["12", "abcd"] {
        let d = decode_smd(bad);
        assert_eq!(d.resistance, SENTINEL);
        assert_eq!(d.capacitance, SENTINEL);
    }
}

#[test]
fn test_radix_round_trip() {
    let samples = [0u64, 1, 7, 255, 256, 4095, 65_535, 1 << 40, u64::MAX];
    for n in samples {
        for (base, rendered) in [
            (10, n.to_string()),
            (16, format!("{:X}", n)),
            (2, format!("{:b}", n)),
        ] {
            let conversion = convert_radix(&rendered, base);
            assert_eq!(conversion.value, Some(n), "{} in base {}", rendered, base);
        }
        let via_hex = convert_radix(&n.to_string(), 10).hexadecimal;
        assert_eq!(convert_radix(&via_hex, 16).value, Some(n));
    }
}

#[test]
fn test_radix_failure_is_sentinel() {
    let c = convert_radix("12G", 16);
    assert_eq!(c.value, None);
    assert_eq!(c.decimal, SENTINEL);
    assert_eq!(c.hexadecimal, SENTINEL);
    assert_eq!(c.binary, SENTINEL);
}

#[test]
fn test_power_budget_through_core() {
    let calc = Calculation::PowerBudget {
        modules: vec![
            PowerModule::new("MCU", 3.3, 20.0, 100.0),
            PowerModule::new("Radio", 3.3, 120.0, 10.0),
            PowerModule::new("Sensor", 5.0, 5.0, 100.0),
        ],
        battery_mah: Some(1000.0),
    };
    match ToolboxCore::evaluate(&calc).unwrap() {
        CalculationOutput::PowerBudget(summary) => {
            assert!((summary.total_current_ma - 37.0).abs() < 1e-9);
            assert_eq!(summary.rails.len(), 2);
            assert!(summary.battery_life_hours.is_some());
        }
        other => panic!("unexpected output: {:?}", other),
    }
}

#[test]
fn test_i2c_range_widens_with_slower_mode() {
    let fast = I2cPullupInput {
        vdd: 3.3,
        bus_capacitance_pf: 200.0,
        mode: I2cBusMode::Fast,
    }
    .calculate()
    .unwrap();
    let standard = I2cPullupInput {
        vdd: 3.3,
        bus_capacitance_pf: 200.0,
        mode: I2cBusMode::Standard,
    }
    .calculate()
    .unwrap();
    assert_eq!(fast.rp_min, standard.rp_min);
    assert!(standard.rp_max > fast.rp_max);
}

#[test]
fn test_every_calculation_kind_parses_from_json() {
    let inputs = [
        r#"{"kind":"divider","vin":12.0,"vout":3.3,"r1":10000.0}"#,
        r#"{"kind":"led","supply_v":5.0,"forward_v":2.0,"current_ma":20.0}"#,
        r#"{"kind":"lc","inductance_uh":10.0,"capacitance_nf":100.0}"#,
        r#"{"kind":"wave","frequency":2.4,"unit":"GHz"}"#,
        r#"{"kind":"dac","bits":10,"vref":3.3,"code":512}"#,
        r#"{"kind":"adc_metrics","bits":16,"vref":2.5}"#,
        r#"{"kind":"i2c_pullup","vdd":3.3,"bus_capacitance_pf":100.0,"mode":"fast"}"#,
        r#"{"kind":"snap","target":4990.0}"#,
        r#"{"kind":"convert","value":10.0,"dimension":"Capacitance","from":"nF","to":"uF"}"#,
        r#"{"kind":"smd","code":"472"}"#,
        r#"{"kind":"radix","literal":"0xFF","base":16}"#,
    ];
    for json in inputs {
        let calc: Calculation = serde_json::from_str(json).unwrap();
        let readings = ToolboxCore::readings(&calc);
        assert!(!readings.is_empty());
        assert!(
            readings.iter().all(|r| r.value != SENTINEL),
            "{} produced {:?}",
            json,
            readings
        );
    }
}
