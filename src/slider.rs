/*
 * Unit conversion and keyboard policy for sliders.
 *
 * Trackbars only hold integers, so slider values are stored natively as
 * value * 100 unless the range is wider than 1000, in which case raw units are
 * used. The keyboard step for Left/Right arrow requests uses three fixed tiers.
 * Both thresholds are kept literally for compatibility with saved dialogs.
 */

const RAW_UNITS_ABOVE_RANGE: f32 = 1000.0;
const COARSE_STEP_ABOVE_RANGE: f32 = 100.0;
const PRECISION_FACTOR: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SliderScale {
    factor: f32,
}

impl SliderScale {
    pub(crate) fn for_range(min: f32, max: f32) -> Self {
        let factor = if (max - min) > RAW_UNITS_ABOVE_RANGE {
            1.0
        } else {
            PRECISION_FACTOR
        };
        Self { factor }
    }

    pub(crate) fn to_native(self, value: f32) -> i32 {
        (value * self.factor).round() as i32
    }

    pub(crate) fn from_native(self, position: i32) -> f32 {
        position as f32 / self.factor
    }

    pub(crate) fn uses_raw_units(self) -> bool {
        self.factor == 1.0
    }
}

/*
 * Step applied for one Left/Right keyboard request, in native units.
 * Wide raw ranges move 10 units, medium ranges a whole unit (100 native),
 * small ranges a hundredth (1 native).
 */
pub(crate) fn keyboard_step(min: f32, max: f32) -> i32 {
    let range = max - min;
    if range > RAW_UNITS_ABOVE_RANGE {
        10
    } else if range > COARSE_STEP_ABOVE_RANGE {
        100
    } else {
        1
    }
}

/// Value reported to the host: always value * 100, regardless of native units.
pub(crate) fn reported_value(value: f32) -> i32 {
    (value * PRECISION_FACTOR).round() as i32
}

/// Text shown in the optional value label next to a slider.
pub(crate) fn format_value(value: f32, min: f32, max: f32) -> String {
    if SliderScale::for_range(min, max).uses_raw_units() {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn clamp_value(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_ranges_use_hundredths() {
        let scale = SliderScale::for_range(0.0, 1.0);
        assert_eq!(scale.to_native(0.5), 50);
        assert_eq!(scale.from_native(75), 0.75);
    }

    #[test]
    fn ranges_above_one_thousand_use_raw_units() {
        let scale = SliderScale::for_range(0.0, 5000.0);
        assert!(scale.uses_raw_units());
        assert_eq!(scale.to_native(1234.0), 1234);
        assert_eq!(scale.from_native(1234), 1234.0);
    }

    #[test]
    fn exactly_one_thousand_still_scales() {
        let scale = SliderScale::for_range(0.0, 1000.0);
        assert!(!scale.uses_raw_units());
        assert_eq!(scale.to_native(1000.0), 100_000);
    }

    #[test]
    fn keyboard_step_tiers() {
        assert_eq!(keyboard_step(0.0, 2000.0), 10);
        assert_eq!(keyboard_step(0.0, 500.0), 100);
        assert_eq!(keyboard_step(0.0, 100.0), 1);
        assert_eq!(keyboard_step(-1.0, 1.0), 1);
    }

    #[test]
    fn reported_value_is_scaled_by_one_hundred() {
        assert_eq!(reported_value(0.75), 75);
        assert_eq!(reported_value(1500.0), 150_000);
    }

    #[test]
    fn value_label_precision_follows_units() {
        assert_eq!(format_value(0.5, 0.0, 1.0), "0.50");
        assert_eq!(format_value(1500.0, 0.0, 2000.0), "1500");
    }

    #[test]
    fn clamp_tolerates_inverted_ranges() {
        assert_eq!(clamp_value(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_value(-5.0, 1.0, 0.0), 0.0);
    }
}
