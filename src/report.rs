//! Terminal output formatting for the CLI subcommands.
//!
//! Kept separate from the loaders so output changes stay localized.

use crate::domain::BondSeries;

/// Numbered catalog listing, in source order.
pub fn format_catalog(bonds: &[String]) -> String {
    let mut out = format!("Found {} bond(s):\n", bonds.len());
    for (idx, bond) in bonds.iter().enumerate() {
        out.push_str(&format!("{:>3}) {bond}\n", idx + 1));
    }
    out
}

/// Series summary plus all samples, one row per line.
pub fn format_series(bond: &str, series: &BondSeries) -> String {
    let mut out = match (series.dates.first(), series.dates.last()) {
        (Some(first), Some(last)) => {
            format!("{bond}: {} sample(s), {first} to {last}\n", series.len())
        }
        _ => format!("{bond}: no data rows\n"),
    };

    for (date, value) in series.dates.iter().zip(&series.values) {
        out.push_str(&format!("{date}  {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_listing_is_numbered_in_source_order() {
        let bonds = vec!["EDO1034".to_string(), "COI0928".to_string()];
        let out = format_catalog(&bonds);
        assert!(out.starts_with("Found 2 bond(s):"));
        assert!(out.contains("  1) EDO1034"));
        assert!(out.contains("  2) COI0928"));
    }

    #[test]
    fn empty_series_prints_a_summary_only() {
        let out = format_series("EDO1034", &BondSeries::default());
        assert_eq!(out, "EDO1034: no data rows\n");
    }

    #[test]
    fn series_rows_follow_the_summary() {
        let series = BondSeries {
            dates: vec!["2024-01-02".to_string(), "2024-01-03".to_string()],
            values: vec![6.1, 6.2],
        };
        let out = format_series("EDO1034", &series);
        assert!(out.starts_with("EDO1034: 2 sample(s), 2024-01-02 to 2024-01-03\n"));
        assert!(out.contains("2024-01-02  6.1\n"));
        assert!(out.contains("2024-01-03  6.2\n"));
    }
}
