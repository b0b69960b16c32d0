//! Gap filling for sparse annual data

use crate::timeseries::FloatValue;

/// Fill the gaps in an annual series by linear interpolation
///
/// `known` holds `(index, value)` pairs sorted by index. Indices before the first
/// known point are interpolated from an implicit `(0, 0.0)` anchor unless index 0
/// is itself known. Indices after the last known point hold the last value.
/// With no known points the result is all zeros.
pub fn fill_linear(len: usize, known: &[(usize, FloatValue)]) -> Vec<FloatValue> {
    let mut anchors: Vec<(usize, FloatValue)> = Vec::with_capacity(known.len() + 1);
    if known.first().map_or(true, |(index, _)| *index != 0) {
        anchors.push((0, 0.0));
    }
    anchors.extend(known.iter().copied().filter(|(index, _)| *index < len));

    let mut result = vec![0.0; len];
    let mut segment = 0;
    for (i, value) in result.iter_mut().enumerate() {
        while segment + 1 < anchors.len() && anchors[segment + 1].0 <= i {
            segment += 1;
        }
        let (x0, y0) = anchors[segment];
        *value = match anchors.get(segment + 1) {
            Some(&(x1, y1)) if i > x0 => {
                y0 + (y1 - y0) * (i - x0) as FloatValue / (x1 - x0) as FloatValue
            }
            _ => y0,
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn interpolates_between_known_points() {
        let filled = fill_linear(5, &[(0, 1.0), (4, 5.0)]);
        assert_eq!(filled, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn anchors_start_at_zero_when_missing() {
        let filled = fill_linear(4, &[(2, 4.0)]);
        assert_eq!(filled, vec![0.0, 2.0, 4.0, 4.0]);
    }

    #[test]
    fn holds_last_value() {
        let filled = fill_linear(6, &[(0, 2.0), (1, 3.0)]);
        assert_eq!(filled, vec![2.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn uneven_spacing() {
        let filled = fill_linear(4, &[(0, 0.0), (3, 1.0)]);
        assert!(is_close!(filled[1], 1.0 / 3.0));
        assert!(is_close!(filled[2], 2.0 / 3.0));
    }

    #[test]
    fn no_known_points_gives_zeros() {
        assert_eq!(fill_linear(3, &[]), vec![0.0, 0.0, 0.0]);
    }
}
