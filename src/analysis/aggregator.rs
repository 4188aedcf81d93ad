//! Record aggregation.
//!
//! This module provides utilities for grouping climate records by country,
//! year and event type, and for extracting paired indicator series.

use crate::models::ClimateRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Damage totals for a group of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageTotals {
    pub total: f64,
    pub count: usize,
}

impl DamageTotals {
    /// Mean damage per incident.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// All damage values present in the records.
pub fn damage_values(records: &[ClimateRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.damage_cost).collect()
}

/// Group damages by country. Rows without a country or damage are skipped.
pub fn damages_by_country(records: &[ClimateRecord]) -> BTreeMap<String, DamageTotals> {
    let mut grouped: BTreeMap<String, DamageTotals> = BTreeMap::new();

    for record in records {
        if let (Some(country), Some(damage)) = (&record.country, record.damage_cost) {
            let entry = grouped.entry(country.clone()).or_default();
            entry.total += damage;
            entry.count += 1;
        }
    }

    grouped
}

/// Sum damages per year, in year order.
pub fn damages_by_year(records: &[ClimateRecord]) -> BTreeMap<i32, f64> {
    let mut grouped: BTreeMap<i32, f64> = BTreeMap::new();

    for record in records {
        if let (Some(year), Some(damage)) = (record.year, record.damage_cost) {
            *grouped.entry(year).or_default() += damage;
        }
    }

    grouped
}

/// Sum damages per event type.
pub fn damages_by_event_type(records: &[ClimateRecord]) -> BTreeMap<String, f64> {
    let mut grouped: BTreeMap<String, f64> = BTreeMap::new();

    for record in records {
        if let (Some(event), Some(damage)) = (&record.event_type, record.damage_cost) {
            *grouped.entry(event.clone()).or_default() += damage;
        }
    }

    grouped
}

/// Mean of an indicator per year, in year order.
pub fn mean_by_year<F>(records: &[ClimateRecord], field: F) -> BTreeMap<i32, f64>
where
    F: Fn(&ClimateRecord) -> Option<f64>,
{
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for record in records {
        if let (Some(year), Some(value)) = (record.year, field(record)) {
            let entry = sums.entry(year).or_default();
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(year, (total, count))| (year, total / count as f64))
        .collect()
}

/// Extract two indicators from the rows that carry both.
pub fn paired_values<X, Y>(records: &[ClimateRecord], x: X, y: Y) -> (Vec<f64>, Vec<f64>)
where
    X: Fn(&ClimateRecord) -> Option<f64>,
    Y: Fn(&ClimateRecord) -> Option<f64>,
{
    records
        .iter()
        .filter_map(|r| Some((x(r)?, y(r)?)))
        .unzip()
}

/// Number of distinct countries in the records.
pub fn unique_countries(records: &[ClimateRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.country.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: i32, event: &str, damage: Option<f64>) -> ClimateRecord {
        ClimateRecord {
            country: Some(country.to_string()),
            year: Some(year),
            event_type: Some(event.to_string()),
            damage_cost: damage,
            ..Default::default()
        }
    }

    fn sample() -> Vec<ClimateRecord> {
        vec![
            record("Peru", 2020, "Flood", Some(100.0)),
            record("Peru", 2021, "Drought", Some(300.0)),
            record("Chad", 2020, "Drought", Some(50.0)),
            record("Chad", 2021, "Flood", None),
        ]
    }

    #[test]
    fn test_damages_by_country() {
        let grouped = damages_by_country(&sample());

        let peru = grouped.get("Peru").unwrap();
        assert_eq!(peru.total, 400.0);
        assert_eq!(peru.count, 2);
        assert_eq!(peru.average(), 200.0);

        let chad = grouped.get("Chad").unwrap();
        assert_eq!(chad.count, 1);
    }

    #[test]
    fn test_damages_by_year_and_event() {
        let records = sample();

        let by_year = damages_by_year(&records);
        assert_eq!(by_year.get(&2020), Some(&150.0));
        assert_eq!(by_year.get(&2021), Some(&300.0));

        let by_event = damages_by_event_type(&records);
        assert_eq!(by_event.get("Drought"), Some(&350.0));
        assert_eq!(by_event.get("Flood"), Some(&100.0));
    }

    #[test]
    fn test_mean_by_year() {
        let means = mean_by_year(&sample(), |r| r.damage_cost);
        assert_eq!(means.get(&2020), Some(&75.0));
        assert_eq!(means.get(&2021), Some(&300.0));
    }

    #[test]
    fn test_paired_values_skip_incomplete_rows() {
        let (x, y) = paired_values(&sample(), |r| r.year.map(f64::from), |r| r.damage_cost);
        assert_eq!(x.len(), 3);
        assert_eq!(y, vec![100.0, 300.0, 50.0]);
    }

    #[test]
    fn test_unique_countries() {
        assert_eq!(unique_countries(&sample()), 2);
        assert_eq!(unique_countries(&[]), 0);
    }
}
