// Column keys and the active X/Y selection

use anyhow::{anyhow, Result};
use std::fmt;

/// Numeric columns a chart axis can be driven by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Poverty,
    Age,
    Income,
    HealthcareLow,
    Smokes,
    Obesity,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Poverty,
        Column::Age,
        Column::Income,
        Column::HealthcareLow,
        Column::Smokes,
        Column::Obesity,
    ];

    /// Header name of the column in the CSV
    pub fn key(self) -> &'static str {
        match self {
            Column::Poverty => "poverty",
            Column::Age => "age",
            Column::Income => "income",
            Column::HealthcareLow => "healthcareLow",
            Column::Smokes => "smokes",
            Column::Obesity => "obesity",
        }
    }

    /// Caption shown on the axis selector label
    pub fn caption(self) -> &'static str {
        match self {
            Column::Poverty => "In Poverty (%)",
            Column::Age => "Age (Meridian)",
            Column::Income => "Household Income (Meridian)",
            Column::HealthcareLow => "Lacks Healthcare (%)",
            Column::Smokes => "Smokes (%)",
            Column::Obesity => "Obese (%)",
        }
    }

    /// Short name used inside the tooltip
    pub fn tooltip_label(self) -> &'static str {
        match self {
            Column::Poverty => "Poverty",
            Column::Age => "Age",
            Column::Income => "Income",
            Column::HealthcareLow => "HealthCare (Low)",
            Column::Smokes => "Smokes",
            Column::Obesity => "Obesity",
        }
    }

    pub fn from_key(key: &str) -> Result<Column> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
                anyhow!("Unknown column '{}'. Available columns: {}", key, known.join(", "))
            })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The three columns offered as selector labels on this axis, in drawing order
    pub fn selector_group(self) -> [Column; 3] {
        match self {
            Axis::X => [Column::Poverty, Column::Age, Column::Income],
            Axis::Y => [Column::HealthcareLow, Column::Smokes, Column::Obesity],
        }
    }

    pub fn offers(self, column: Column) -> bool {
        self.selector_group().contains(&column)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// The pair of columns currently driving the axes.
///
/// Any column may sit on either axis. `x == y` is allowed and plots a diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    pub x: Column,
    pub y: Column,
}

impl Criteria {
    pub fn new(x: Column, y: Column) -> Self {
        Criteria { x, y }
    }

    pub fn get(&self, axis: Axis) -> Column {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Copy of this selection with one axis replaced
    pub fn with(self, axis: Axis, column: Column) -> Self {
        match axis {
            Axis::X => Criteria { x: column, ..self },
            Axis::Y => Criteria { y: column, ..self },
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::new(Column::Poverty, Column::HealthcareLow)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria() {
        let criteria = Criteria::default();
        assert_eq!(criteria.x, Column::Poverty);
        assert_eq!(criteria.y, Column::HealthcareLow);
    }

    #[test]
    fn test_from_key_round_trips_all_columns() {
        for column in Column::ALL {
            assert_eq!(Column::from_key(column.key()).unwrap(), column);
        }
    }

    #[test]
    fn test_from_key_is_case_sensitive() {
        let err = Column::from_key("HealthcareLow").unwrap_err();
        assert!(err.to_string().contains("Unknown column"));
        assert!(err.to_string().contains("healthcareLow"));
    }

    #[test]
    fn test_selector_groups_partition_columns() {
        let mut all: Vec<Column> = Axis::X.selector_group().to_vec();
        all.extend(Axis::Y.selector_group());
        all.sort();
        assert_eq!(all, Column::ALL.to_vec());
    }

    #[test]
    fn test_with_replaces_one_axis() {
        let criteria = Criteria::default().with(Axis::X, Column::Income);
        assert_eq!(criteria, Criteria::new(Column::Income, Column::HealthcareLow));

        let criteria = criteria.with(Axis::Y, Column::Smokes);
        assert_eq!(criteria, Criteria::new(Column::Income, Column::Smokes));
    }

    #[test]
    fn test_labels_match_visual_contract() {
        assert_eq!(Column::HealthcareLow.tooltip_label(), "HealthCare (Low)");
        assert_eq!(Column::Income.caption(), "Household Income (Meridian)");
        assert_eq!(Column::Obesity.caption(), "Obese (%)");
    }
}
