use crate::criteria::Column;
use crate::csv_reader::Dataset;
use anyhow::{anyhow, Result};

/// Linear mapping from a data interval to a pixel interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    /// Map a data value to pixels. A zero-width domain maps everything to the range midpoint.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || hi == lo {
            return vec![Tick::new(lo, 1.0)];
        }

        let step = nice_step((hi - lo) / count as f64);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last)
            .map(|i| Tick::new(i as f64 * step, step))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    fn new(value: f64, step: f64) -> Self {
        Tick { value, label: format_tick(value, step) }
    }
}

/// X axis: `[min - min/10, max + 0.5]` onto `[0, width]`
pub fn x_scale(data: &Dataset, column: Column, width: f64) -> Result<LinearScale> {
    let (min, max) = min_max(data, column)?;
    Ok(LinearScale::new((min - min / 10.0, max + 0.5), (0.0, width)))
}

/// Y axis: `[min - min/3, max + 2]` onto `[height, 0]`, inverted so values grow upward
pub fn y_scale(data: &Dataset, column: Column, height: f64) -> Result<LinearScale> {
    let (min, max) = min_max(data, column)?;
    Ok(LinearScale::new((min - min / 3.0, max + 2.0), (height, 0.0)))
}

fn min_max(data: &Dataset, column: Column) -> Result<(f64, f64)> {
    if data.is_empty() {
        return Err(anyhow!(
            "Cannot compute a scale for '{}': dataset must contain at least one record",
            column
        ));
    }

    let values = data.values(column)?;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Ok((min, max))
}

// 1, 2 or 5 times a power of ten
fn nice_step(rough: f64) -> f64 {
    let exp = rough.log10().floor();
    let frac = rough / 10f64.powf(exp);
    let nice = if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * 10f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10() - 1e-9).ceil() as usize };
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0"
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::Record;

    fn dataset(column: Column, values: &[f64]) -> Dataset {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::new(format!("S{}", i), format!("S{}", i)).with_raw(column, v.to_string()))
            .collect();
        let mut data = Dataset::new(records);
        data.coerce(column).unwrap();
        data
    }

    #[test]
    fn test_x_scale_padding() {
        let data = dataset(Column::Poverty, &[10.0, 20.0, 15.0]);
        let scale = x_scale(&data, Column::Poverty, 660.0).unwrap();
        assert_eq!(scale.domain, (10.0 - 1.0, 20.5));
        assert_eq!(scale.range, (0.0, 660.0));
    }

    #[test]
    fn test_y_scale_padding_and_inversion() {
        let data = dataset(Column::Smokes, &[9.0, 30.0]);
        let scale = y_scale(&data, Column::Smokes, 380.0).unwrap();
        assert_eq!(scale.domain, (9.0 - 3.0, 32.0));
        assert_eq!(scale.range, (380.0, 0.0));
        // Larger values sit higher on the canvas
        assert!(scale.apply(30.0) < scale.apply(9.0));
    }

    #[test]
    fn test_negative_minimum_keeps_formula() {
        let data = dataset(Column::Age, &[-10.0, 5.0]);
        let scale = x_scale(&data, Column::Age, 100.0).unwrap();
        // min - min/10 moves a negative minimum toward zero
        assert_eq!(scale.domain, (-9.0, 5.5));
    }

    #[test]
    fn test_apply_maps_domain_ends_to_range_ends() {
        let scale = LinearScale::new((9.0, 20.5), (0.0, 660.0));
        assert_eq!(scale.apply(9.0), 0.0);
        assert_eq!(scale.apply(20.5), 660.0);
        assert!((scale.apply(14.75) - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_degenerate_domain() {
        let scale = LinearScale::new((0.0, 0.0), (0.0, 660.0));
        assert_eq!(scale.apply(0.0), 330.0);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let data = Dataset::default();
        let err = x_scale(&data, Column::Poverty, 660.0).unwrap_err();
        assert!(err.to_string().contains("at least one record"));
        assert!(y_scale(&data, Column::Obesity, 380.0).is_err());
    }

    #[test]
    fn test_uncoerced_column_is_an_error() {
        let data = Dataset::new(vec![Record::new("Ohio", "OH").with_raw(Column::Age, "39")]);
        assert!(x_scale(&data, Column::Age, 660.0).is_err());
    }

    #[test]
    fn test_ticks_are_round_and_inside_domain() {
        let scale = LinearScale::new((8.1, 22.0), (0.0, 660.0));
        let ticks = scale.ticks(10);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0]);
        assert_eq!(ticks[0].label, "10");
    }

    #[test]
    fn test_ticks_fractional_step() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[1].label, "0.1");
    }

    #[test]
    fn test_ticks_inverted_range() {
        let scale = LinearScale::new((4.0, 27.0), (380.0, 0.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first().unwrap().value, 5.0);
        assert_eq!(ticks.last().unwrap().value, 25.0);
    }
}
