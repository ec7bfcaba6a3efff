use chrono::NaiveDateTime;

/// A single source cell after decoding: `None` is an empty cell.
pub type CellText = Option<String>;

/// File families recognised by their suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub const DELIMITED_SUFFIXES: &'static [&'static str] = &["csv"];
    pub const SPREADSHEET_SUFFIXES: &'static [&'static str] = &["xlsx", "xlsm", "xls"];

    /// Classifies a declared file name by its extension, ignoring case.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, suffix) = file_name.rsplit_once('.')?;
        let suffix = suffix.trim().to_ascii_lowercase();
        if Self::DELIMITED_SUFFIXES.contains(&suffix.as_str()) {
            Some(SourceFormat::Delimited)
        } else if Self::SPREADSHEET_SUFFIXES.contains(&suffix.as_str()) {
            Some(SourceFormat::Spreadsheet)
        } else {
            None
        }
    }
}

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Renders a float the way the ingestion side expects to read it back:
/// integral values keep a single decimal (`12.0`), everything else uses the
/// shortest representation that round-trips.
pub fn render_float(value: f64) -> String {
    // collapse -0.0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
