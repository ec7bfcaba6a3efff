#![allow(dead_code)]

use std::collections::HashMap;

use polars::prelude::*;
use taskreport_core::columns::{dropped_columns, ReportColumn};
use taskreport_core::UnitSystem;

pub const CUTOFF: &str = "2024-05-01 08:00:00";
pub const ADJUSTED: &str = "2024-05-02 09:15:00";

/// Builds a task-report export the way the robot portal writes it: the
/// canonical columns interleaved with export-only ones.
pub struct ExportBuilder {
    units: UnitSystem,
    headers: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl ExportBuilder {
    pub fn new(units: UnitSystem) -> Self {
        let dropped = dropped_columns(units);
        let mut headers: Vec<String> = ReportColumn::CANONICAL
            .iter()
            .filter(|column| column.is_sourced())
            .map(|column| column.label(units).to_string())
            .collect();
        // scatter the export-only columns through the header
        for (offset, name) in dropped.iter().enumerate() {
            let position = (offset * 5 + 3).min(headers.len());
            headers.insert(position, name.to_string());
        }
        Self {
            units,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn without_column(mut self, label: &str) -> Self {
        self.headers.retain(|header| header != label);
        self
    }

    pub fn row(self, serial: &str, received: &str) -> Self {
        self.row_with(serial, received, &[])
    }

    pub fn row_with(
        mut self,
        serial: &str,
        received: &str,
        overrides: &[(ReportColumn, &str)],
    ) -> Self {
        let units = self.units;
        let mut row: HashMap<String, String> = HashMap::new();
        for column in ReportColumn::CANONICAL {
            let value = match column {
                ReportColumn::Id => continue,
                ReportColumn::RobotName => format!("Scrubber {serial}"),
                ReportColumn::SerialNumber => serial.to_string(),
                ReportColumn::MapName => "Level 1".into(),
                ReportColumn::CleaningPlan => "Lobby".into(),
                ReportColumn::User => "ops".into(),
                ReportColumn::TaskStartTime => "2024-05-01 06:00:00".into(),
                ReportColumn::EndTime => "2024-05-01 07:00:00".into(),
                ReportColumn::TaskCompletion => "100".into(),
                ReportColumn::ActualCleaningArea => "1,250.50".into(),
                ReportColumn::TotalTimeHours => "1.00".into(),
                ReportColumn::WaterUsage => "10".into(),
                ReportColumn::Brush => "100.00".into(),
                ReportColumn::Filter => "85.00".into(),
                ReportColumn::Squeegee => "-".into(),
                ReportColumn::PlannedCrystallizationArea => "12.5".into(),
                ReportColumn::ActualCrystallizationArea => "11.0".into(),
                ReportColumn::CleaningPlanArea => "0.00".into(),
                ReportColumn::StartBatteryLevel => "95".into(),
                ReportColumn::EndBatteryLevel => "60".into(),
                ReportColumn::ReceiveTaskReportTime => received.to_string(),
                ReportColumn::TaskType => "Scheduled".into(),
                ReportColumn::DownloadLink => String::new(),
                ReportColumn::WorkEfficiency => "1,000".into(),
            };
            row.insert(column.label(units).to_string(), value);
        }
        for (column, value) in overrides {
            row.insert(column.label(units).to_string(), value.to_string());
        }
        for name in dropped_columns(units) {
            row.insert(name.to_string(), "x".into());
        }
        self.rows.push(row);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(|header| row.get(header).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn to_csv(&self) -> Vec<u8> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).expect("write header");
        for row in self.cells() {
            writer.write_record(&row).expect("write row");
        }
        writer.into_inner().expect("flush csv")
    }

    /// Like [`ExportBuilder::to_csv`], but data row `short_row` stops one cell
    /// early, as spreadsheet tools do when the trailing cell is empty.
    pub fn to_csv_with_short_row(&self, short_row: usize) -> Vec<u8> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(&self.headers).expect("write header");
        for (idx, mut row) in self.cells().into_iter().enumerate() {
            if idx == short_row {
                row.pop();
            }
            writer.write_record(&row).expect("write row");
        }
        writer.into_inner().expect("flush csv")
    }

    /// Workbook with the portal's title banner above the header row.
    pub fn to_xlsx(&self) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet
                .write_string(0, 0, "Cleaning task report")
                .expect("banner");
            for (col, header) in self.headers.iter().enumerate() {
                sheet.write_string(1, col as u16, header.as_str()).expect("header");
            }
            for (row_idx, row) in self.cells().iter().enumerate() {
                for (col, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    sheet
                        .write_string(row_idx as u32 + 2, col as u16, value.as_str())
                        .expect("cell");
                }
            }
        }
        workbook.save_to_buffer().expect("save workbook")
    }
}

pub fn text(df: &DataFrame, label: &str) -> Vec<String> {
    df.column(label)
        .unwrap_or_else(|err| panic!("missing column {label}: {err}"))
        .str()
        .expect("text column")
        .into_iter()
        .map(|value| value.expect("no nulls in output").to_string())
        .collect()
}

pub fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}
