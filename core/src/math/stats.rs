/// Scanning helpers shared by the beamformers.
pub struct StatsHelper;

impl StatsHelper {
    /// First index whose value strictly exceeds every earlier value and
    /// `floor`, together with that value. Later ties never replace the
    /// recorded peak; `(0, floor)` when nothing exceeds `floor`.
    pub fn first_peak<T: PartialOrd + Copy>(values: &[T], floor: T) -> (usize, T) {
        let mut peak = (0, floor);
        for (idx, &value) in values.iter().enumerate() {
            if value > peak.1 {
                peak = (idx, value);
            }
        }
        peak
    }

    /// Largest value, starting from `floor`, where later equal values win.
    pub fn last_peak<T: PartialOrd + Copy>(values: &[T], floor: T) -> T {
        values
            .iter()
            .fold(floor, |peak, &value| if value >= peak { value } else { peak })
    }

    /// Splits a row-major cell index into grid coordinates.
    #[inline]
    pub fn cell_coordinates(cell: usize, grdpts_y: usize) -> (usize, usize) {
        (cell / grdpts_y, cell % grdpts_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_peak_keeps_earliest_tie() {
        assert_eq!(StatsHelper::first_peak(&[1.0, 3.0, 3.0, 2.0], 0.0), (1, 3.0));
    }

    #[test]
    fn first_peak_defaults_to_origin() {
        assert_eq!(StatsHelper::first_peak(&[0.0f32, 0.0], 0.0), (0, 0.0));
        assert_eq!(StatsHelper::first_peak::<f64>(&[], 0.0), (0, 0.0));
    }

    #[test]
    fn last_peak_returns_maximum() {
        assert_eq!(StatsHelper::last_peak(&[2.0f32, 5.0, 5.0, 1.0], 0.0), 5.0);
    }

    #[test]
    fn cell_coordinates_are_row_major() {
        assert_eq!(StatsHelper::cell_coordinates(7, 3), (2, 1));
    }
}
