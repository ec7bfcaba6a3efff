use polars::prelude::*;

use crate::columns::{labels_of, ReportColumn};
use crate::error::Result;
use crate::profiles::UnitSystem;

/// Marker the ingestion side reads as an absent value.
pub const NULL_MARKER: &str = "NULL";
/// Export placeholder for "no value", written out as zero.
pub const DASH_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellRule {
    Plain,
    CommaBearing,
    Wear,
}

/// Serializes a transformed table into the destination's text conventions:
/// `-` becomes `0`, empty cells become `NULL`, comma-bearing numbers lose
/// their separators (`0.00` collapses to `0`) and wear readings of `100.00`
/// collapse to `100`. Every output column is text.
pub fn finalize(df: &DataFrame, units: UnitSystem) -> Result<DataFrame> {
    let comma_bearing = labels_of(&ReportColumn::COMMA_BEARING, units);
    let wear = labels_of(&ReportColumn::WEAR, units);

    rewrite_cells(df, |name, value| {
        let rule = if comma_bearing.iter().any(|label| *label == name) {
            CellRule::CommaBearing
        } else if wear.iter().any(|label| *label == name) {
            CellRule::Wear
        } else {
            CellRule::Plain
        };
        sanitize_cell(value, rule)
    })
}

/// Replaces every empty cell with [`NULL_MARKER`], leaving other cells as is.
pub fn fill_absent(df: &DataFrame) -> Result<DataFrame> {
    rewrite_cells(df, |_, value| {
        value.unwrap_or(NULL_MARKER).to_string()
    })
}

fn rewrite_cells<F>(df: &DataFrame, mut rewrite: F) -> Result<DataFrame>
where
    F: FnMut(&str, Option<&str>) -> String,
{
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().clone();
        let text = column.cast(&DataType::String)?;
        let values: Vec<String> = text
            .str()?
            .into_iter()
            .map(|value| rewrite(name.as_str(), value))
            .collect();
        columns.push(Series::new(name, values).into());
    }
    Ok(DataFrame::new(columns)?)
}

fn sanitize_cell(value: Option<&str>, rule: CellRule) -> String {
    let Some(value) = value else {
        return NULL_MARKER.to_string();
    };
    if value == DASH_PLACEHOLDER {
        return "0".to_string();
    }

    match rule {
        CellRule::Plain => value.to_string(),
        CellRule::CommaBearing => {
            let stripped: String = value.chars().filter(|c| *c != ',').collect();
            if stripped == "0.00" {
                "0".to_string()
            } else {
                stripped
            }
        }
        CellRule::Wear => {
            if value == "100.00" {
                "100".to_string()
            } else {
                value.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;

    #[test]
    fn cell_rules() {
        assert_eq!(sanitize_cell(None, CellRule::Plain), "NULL");
        assert_eq!(sanitize_cell(Some("-"), CellRule::Wear), "0");
        assert_eq!(sanitize_cell(Some("-"), CellRule::CommaBearing), "0");
        assert_eq!(sanitize_cell(Some("1,234,567.25"), CellRule::CommaBearing), "1234567.25");
        assert_eq!(sanitize_cell(Some("0.00"), CellRule::CommaBearing), "0");
        assert_eq!(sanitize_cell(Some("100.00"), CellRule::Wear), "100");
        assert_eq!(sanitize_cell(Some("100.00"), CellRule::Plain), "100.00");
        assert_eq!(sanitize_cell(Some("1,5"), CellRule::Plain), "1,5");
        assert_eq!(sanitize_cell(Some("--"), CellRule::Plain), "--");
    }

    #[test]
    fn finalize_leaves_no_nulls() -> PolarsResult<()> {
        let units = UnitSystem::Metric;
        let df = df!(
            "Id" => [None::<&str>, None],
            ReportColumn::Brush.label(units) => [Some("100.00"), Some("-")],
            ReportColumn::WorkEfficiency.label(units) => [Some("2,500.10"), None],
        )?;

        let out = finalize(&df, units).expect("finalize");
        for column in out.get_columns() {
            assert_eq!(column.null_count(), 0);
            assert_eq!(column.dtype(), &DataType::String);
        }
        let efficiency: Vec<_> = out
            .column("Work efficiency (㎡/h)")?
            .str()?
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(efficiency, vec!["2500.10", "NULL"]);
        let brush: Vec<_> = out.column("Brush (%)")?.str()?.into_iter().flatten().collect();
        assert_eq!(brush, vec!["100", "0"]);
        Ok(())
    }
}
