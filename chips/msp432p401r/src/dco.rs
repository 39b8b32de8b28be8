// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! DCO tuning.
//!
//! The DCO has six frequency ranges, each centred on a nominal frequency.
//! Within a range the output is trimmed by a signed 10-bit tuning value,
//! computed from the factory calibration of the part:
//!
//! ```text
//! N = (f_target - f_center) * (1 + K * (768 - FCAL)) / (f_target * K)
//! ```
//!
//! Inverting the same equation for the truncated `N` gives the frequency the
//! DCO actually runs at, which is what the rate table reports.

use fugit::HertzU32;
use kernel::ErrorCode;

pub const DCO_MIN: HertzU32 = HertzU32::MHz(1);
pub const DCO_MAX: HertzU32 = HertzU32::MHz(48);

const CENTER_FREQUENCIES_HZ: [u32; 6] = [
    1_500_000, 3_000_000, 6_000_000, 12_000_000, 24_000_000, 48_000_000,
];

const TUNING_MIN: i32 = -512;
const TUNING_MAX: i32 = 511;

/// DCO calibration for the internal resistor, from the device descriptors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DcoCalibration {
    pub constant_rsel04: f32,
    pub calibration_rsel04: u32,
    pub constant_rsel5: f32,
    pub calibration_rsel5: u32,
}

/// What to program into CSCTL0 for a target frequency.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DcoSettings {
    pub range_select: u32,
    pub tuning: i16,
    /// Frequency the DCO runs at with these settings
    pub frequency: HertzU32,
}

fn range_select(target_hz: u32) -> u32 {
    match target_hz {
        32_000_000.. => 5,
        16_000_000.. => 4,
        8_000_000.. => 3,
        4_000_000.. => 2,
        2_000_000.. => 1,
        _ => 0,
    }
}

/// Work out the range and tuning value for `target`.
///
/// # Errors:
///
/// - `SIZE` if `target` is outside 1MHz to 48MHz
/// - `INVAL` if the calibration puts the tuning value outside the DCOTUNE
///   field
pub fn settings_for(
    target: HertzU32,
    calibration: &DcoCalibration,
) -> Result<DcoSettings, ErrorCode> {
    if target < DCO_MIN || target > DCO_MAX {
        return Err(ErrorCode::SIZE);
    }

    let target_hz = target.to_Hz();
    let range_select = range_select(target_hz);
    let (constant, fcal) = if range_select == 5 {
        (calibration.constant_rsel5, calibration.calibration_rsel5)
    } else {
        (calibration.constant_rsel04, calibration.calibration_rsel04)
    };

    let constant = f64::from(constant);
    let center_hz = CENTER_FREQUENCIES_HZ[range_select as usize];
    let correction = 1.0 + constant * (768.0 - f64::from(fcal));

    let dividend = (f64::from(target_hz) - f64::from(center_hz)) * correction;
    let divisor = f64::from(target_hz) * constant;

    // Truncates toward zero, saturating on a degenerate calibration
    let tuning = (dividend / divisor) as i32;
    if !(TUNING_MIN..=TUNING_MAX).contains(&tuning) {
        return Err(ErrorCode::INVAL);
    }

    let actual = f64::from(center_hz) * correction / (correction - constant * f64::from(tuning));

    Ok(DcoSettings {
        range_select,
        tuning: tuning as i16,
        frequency: HertzU32::from_raw((actual + 0.5) as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALIBRATION: DcoCalibration = DcoCalibration {
        constant_rsel04: 1.0 / 1024.0,
        calibration_rsel04: 768,
        constant_rsel5: 1.0 / 1024.0,
        calibration_rsel5: 768,
    };

    fn within(actual: HertzU32, target: HertzU32, parts_per_thousand: u32) -> bool {
        let (actual, target) = (actual.to_Hz(), target.to_Hz());
        actual.abs_diff(target) <= target / 1000 * parts_per_thousand
    }

    #[test]
    fn center_frequencies_need_no_tuning() {
        for (rsel, &center) in CENTER_FREQUENCIES_HZ.iter().enumerate() {
            let settings = settings_for(HertzU32::from_raw(center), &CALIBRATION).unwrap();
            assert_eq!(settings.range_select, rsel as u32);
            assert_eq!(settings.tuning, 0);
            assert_eq!(settings.frequency.to_Hz(), center);
        }
    }

    #[test]
    fn range_boundaries() {
        assert_eq!(range_select(1_000_000), 0);
        assert_eq!(range_select(1_999_999), 0);
        assert_eq!(range_select(2_000_000), 1);
        assert_eq!(range_select(4_000_000), 2);
        assert_eq!(range_select(8_000_000), 3);
        assert_eq!(range_select(16_000_000), 4);
        assert_eq!(range_select(31_999_999), 4);
        assert_eq!(range_select(32_000_000), 5);
        assert_eq!(range_select(48_000_000), 5);
    }

    #[test]
    fn tuned_frequency_is_close_to_target() {
        for mhz in [1, 5, 10, 20, 40, 47] {
            let target = HertzU32::MHz(mhz);
            let settings = settings_for(target, &CALIBRATION).unwrap();
            assert!(
                within(settings.frequency, target, 5),
                "{}MHz tuned to {}Hz",
                mhz,
                settings.frequency.to_Hz()
            );
        }
    }

    #[test]
    fn forty_megahertz_tunes_down_from_48() {
        let settings = settings_for(HertzU32::MHz(40), &CALIBRATION).unwrap();
        assert_eq!(settings.range_select, 5);
        assert_eq!(settings.tuning, -204);
        assert!(within(settings.frequency, HertzU32::MHz(40), 1));
    }

    #[test]
    fn rejects_targets_outside_the_dco_range() {
        assert_eq!(
            settings_for(HertzU32::kHz(999), &CALIBRATION),
            Err(ErrorCode::SIZE)
        );
        assert_eq!(
            settings_for(HertzU32::MHz(49), &CALIBRATION),
            Err(ErrorCode::SIZE)
        );
    }

    #[test]
    fn rejects_tuning_beyond_the_field() {
        let steep = DcoCalibration {
            constant_rsel04: 0.0001,
            ..CALIBRATION
        };
        assert_eq!(
            settings_for(HertzU32::MHz(20), &steep),
            Err(ErrorCode::INVAL)
        );

        let blank = DcoCalibration {
            constant_rsel04: 0.0,
            ..CALIBRATION
        };
        assert_eq!(
            settings_for(HertzU32::MHz(20), &blank),
            Err(ErrorCode::INVAL)
        );
    }
}
