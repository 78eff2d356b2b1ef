use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{Record, YearCount};

pub const YEAR_FIELD: &str = "original_publication_year";

/// Integral float inside the i64 range. `i64::MAX as f64` rounds up to 2^63,
/// so the upper bound is exclusive.
fn float_year(n: f64) -> Option<i64> {
    if !n.is_finite() || n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}

/// Publication year of a record, if present and integral.
pub fn publication_year(record: &Record) -> Option<i64> {
    match record.get(YEAR_FIELD)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_year))
        }
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_year)),
        _ => None,
    }
}

/// Count records per publication year, ascending by year.
pub fn aggregate_years(records: &[Record]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for year in records.iter().filter_map(publication_year) {
        *counts.entry(year).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn groups_and_sorts() {
        let records = vec![
            rec(json!({"original_publication_year": "2001"})),
            rec(json!({"original_publication_year": "1999"})),
            rec(json!({"original_publication_year": "2001"})),
            rec(json!({"original_publication_year": 1999})),
            rec(json!({"original_publication_year": " 1850 "})),
        ];
        assert_eq!(
            aggregate_years(&records),
            vec![
                YearCount { year: 1850, count: 1 },
                YearCount { year: 1999, count: 2 },
                YearCount { year: 2001, count: 2 },
            ]
        );
    }

    #[test]
    fn drops_missing_empty_and_invalid() {
        let records = vec![
            rec(json!({})),
            rec(json!({"original_publication_year": ""})),
            rec(json!({"original_publication_year": "   "})),
            rec(json!({"original_publication_year": null})),
            rec(json!({"original_publication_year": "unknown"})),
            rec(json!({"original_publication_year": "1999.5"})),
            rec(json!({"original_publication_year": "inf"})),
            rec(json!({"original_publication_year": "NaN"})),
            rec(json!({"original_publication_year": ["2000"]})),
            rec(json!({"original_publication_year": "-500"})),
        ];
        assert_eq!(
            aggregate_years(&records),
            vec![YearCount { year: -500, count: 1 }]
        );
    }

    #[test]
    fn counts_sum_to_valid_records() {
        let records: Vec<Record> = (0..50)
            .map(|i| {
                if i % 7 == 0 {
                    rec(json!({"original_publication_year": ""}))
                } else {
                    rec(json!({"original_publication_year": format!("{}", 1900 + i % 5)}))
                }
            })
            .collect();
        let out = aggregate_years(&records);
        let valid = records.iter().filter_map(publication_year).count() as u64;
        assert_eq!(out.iter().map(|y| y.count).sum::<u64>(), valid);
        assert!(out.windows(2).all(|w| w[0].year < w[1].year));
        assert_eq!(aggregate_years(&records), out);
    }

    #[test]
    fn out_of_range_years_are_dropped() {
        let year = |v: Value| publication_year(&rec(json!({"original_publication_year": v})));
        assert_eq!(year(json!("9223372036854775807")), Some(i64::MAX));
        assert_eq!(year(json!("9223372036854775808")), None);
        assert_eq!(year(json!("9.3e18")), None);
        assert_eq!(year(json!(9223372036854775808u64)), None);
        assert_eq!(year(json!(1.0e19)), None);
        assert_eq!(year(json!("-9223372036854775808")), Some(i64::MIN));
        assert_eq!(year(json!("1e3")), Some(1000));
        assert_eq!(year(json!(1987.0)), Some(1987));
    }

    #[test]
    fn empty() {
        assert!(aggregate_years(&[]).is_empty());
    }
}
