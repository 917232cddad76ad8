//! Rescale from stored sample values to real-world intensity

use crate::dicom::SampleArray;
use crate::types::RescaleParams;

/// Samples scanned per batch when searching for the intensity range
pub const SCAN_CHUNK: usize = 64 * 1024;

/// Calibrated intensities and their range
#[derive(Debug, Clone, PartialEq)]
pub struct Calibrated {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

/// Apply `value * slope + intercept` to every sample and find the range
#[must_use]
pub fn calibrate(samples: &SampleArray, rescale: RescaleParams) -> Calibrated {
    let values: Vec<f64> = samples.values().map(|s| rescale.apply(s)).collect();
    let (min, max) = intensity_range(&values);
    Calibrated { values, min, max }
}

/// Minimum and maximum of `values`, scanned in fixed-size batches.
///
/// An empty slice yields `(0.0, 0.0)`.
#[must_use]
pub fn intensity_range(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    values
        .chunks(SCAN_CHUNK)
        .map(|chunk| {
            chunk
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                    (min.min(v), max.max(v))
                })
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (lo, hi)| {
            (min.min(lo), max.max(hi))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_rescale_keeps_raw_values() {
        let samples = SampleArray::U16(vec![0, 7, 300, 65535]);
        let calibrated = calibrate(&samples, RescaleParams::default());
        let raw: Vec<f64> = samples.values().collect();
        assert_eq!(calibrated.values, raw);
        assert_eq!(calibrated.min, 0.0);
        assert_eq!(calibrated.max, 65535.0);
    }

    #[test]
    fn test_slope_and_intercept() {
        let samples = SampleArray::I16(vec![-1000, 0, 1000]);
        let calibrated = calibrate(&samples, RescaleParams::new(0.5, -1024.0));
        assert_relative_eq!(calibrated.values[0], -1524.0);
        assert_relative_eq!(calibrated.values[2], -524.0);
        assert_relative_eq!(calibrated.min, -1524.0);
        assert_relative_eq!(calibrated.max, -524.0);
    }

    #[test]
    fn test_negative_slope_swaps_range() {
        let samples = SampleArray::U8(vec![0, 10]);
        let calibrated = calibrate(&samples, RescaleParams::new(-1.0, 0.0));
        assert_eq!((calibrated.min, calibrated.max), (-10.0, 0.0));
    }

    #[test]
    fn test_large_array_scan() {
        let len = 4_000_000;
        let mut values: Vec<u16> = (0..len).map(|i| (i % 4096) as u16).collect();
        values[len - 1] = 60_000;
        values[len / 2] = 0;
        let calibrated = calibrate(&SampleArray::U16(values), RescaleParams::new(1.0, -10.0));
        assert_eq!(calibrated.values.len(), len);
        assert_eq!(calibrated.min, -10.0);
        assert_eq!(calibrated.max, 59_990.0);
    }

    #[test]
    fn test_constant_image() {
        let calibrated = calibrate(&SampleArray::U8(vec![50; 16]), RescaleParams::default());
        assert_eq!(calibrated.min, 50.0);
        assert_eq!(calibrated.max, 50.0);
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(intensity_range(&[]), (0.0, 0.0));
    }
}
