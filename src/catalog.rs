//! Registries of planning dimensions: periods, products and facilities.
//!
//! Pure data. The only behaviour beyond membership is period ordering:
//! flow-balance equations chain each period to its predecessor *by position
//! in the supplied list*, so periods need not be contiguous integers.

use serde::Serialize;

/// A planning period label. The ordered sequence in the [`Catalog`] defines
/// the horizon; the first element has no predecessor.
pub type Period = i64;

/// Workforce skill classes carried by the workforce variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillClass {
    Skilled,
    Unskilled,
}

impl SkillClass {
    pub const ALL: [SkillClass; 2] = [SkillClass::Skilled, SkillClass::Unskilled];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillClass::Skilled => "skilled",
            SkillClass::Unskilled => "unskilled",
        }
    }
}

/// Registries of facilities, products and ordered periods for one scenario.
///
/// Callers are responsible for uniqueness of the supplied identifiers and for
/// passing periods in ascending planning order; each `add_*` call replaces
/// the corresponding registry wholesale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    facilities: Vec<String>,
    products: Vec<String>,
    periods: Vec<Period>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_facilities(&mut self, facilities: Vec<String>) {
        self.facilities = facilities;
    }

    pub fn add_products(&mut self, products: Vec<String>) {
        self.products = products;
    }

    /// Replace the period registry. The list order is the planning order.
    pub fn add_periods(&mut self, periods: Vec<Period>) {
        self.periods = periods;
    }

    pub fn facilities(&self) -> &[String] {
        &self.facilities
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// First period of the horizon, if any. It has no predecessor, so its
    /// balance equations use initial inventory instead of chained stock.
    pub fn first_period(&self) -> Option<Period> {
        self.periods.first().copied()
    }

    /// Predecessor of `period` in planning order, or `None` at the horizon
    /// start (and for unknown periods).
    pub fn previous_period(&self, period: Period) -> Option<Period> {
        let pos = self.periods.iter().position(|&t| t == period)?;
        pos.checked_sub(1).map(|prev| self.periods[prev])
    }

    /// Whether inter-facility transport is part of the variable space.
    pub fn is_multi_facility(&self) -> bool {
        self.facilities.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_calls_replace_registries() {
        let mut catalog = Catalog::new();
        catalog.add_products(vec!["ProductA".into()]);
        catalog.add_products(vec!["ProductB".into(), "ProductC".into()]);
        assert_eq!(catalog.products(), ["ProductB", "ProductC"]);
    }

    #[test]
    fn period_chaining_is_positional() {
        let mut catalog = Catalog::new();
        catalog.add_periods(vec![0, 2, 5]);

        assert_eq!(catalog.first_period(), Some(0));
        assert_eq!(catalog.previous_period(0), None);
        assert_eq!(catalog.previous_period(2), Some(0));
        assert_eq!(catalog.previous_period(5), Some(2));
        assert_eq!(catalog.previous_period(7), None);
    }

    #[test]
    fn single_facility_has_no_transport() {
        let mut catalog = Catalog::new();
        catalog.add_facilities(vec!["Factory1".into()]);
        assert!(!catalog.is_multi_facility());
        catalog.add_facilities(vec!["Factory1".into(), "Factory2".into()]);
        assert!(catalog.is_multi_facility());
    }
}
