use crate::profiles::UnitSystem;

/// Columns of the canonical output, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportColumn {
    Id,
    RobotName,
    SerialNumber,
    MapName,
    CleaningPlan,
    User,
    TaskStartTime,
    EndTime,
    TaskCompletion,
    ActualCleaningArea,
    TotalTimeHours,
    WaterUsage,
    Brush,
    Filter,
    Squeegee,
    PlannedCrystallizationArea,
    ActualCrystallizationArea,
    CleaningPlanArea,
    StartBatteryLevel,
    EndBatteryLevel,
    ReceiveTaskReportTime,
    TaskType,
    DownloadLink,
    WorkEfficiency,
}

impl ReportColumn {
    pub const CANONICAL: [ReportColumn; 24] = [
        ReportColumn::Id,
        ReportColumn::RobotName,
        ReportColumn::SerialNumber,
        ReportColumn::MapName,
        ReportColumn::CleaningPlan,
        ReportColumn::User,
        ReportColumn::TaskStartTime,
        ReportColumn::EndTime,
        ReportColumn::TaskCompletion,
        ReportColumn::ActualCleaningArea,
        ReportColumn::TotalTimeHours,
        ReportColumn::WaterUsage,
        ReportColumn::Brush,
        ReportColumn::Filter,
        ReportColumn::Squeegee,
        ReportColumn::PlannedCrystallizationArea,
        ReportColumn::ActualCrystallizationArea,
        ReportColumn::CleaningPlanArea,
        ReportColumn::StartBatteryLevel,
        ReportColumn::EndBatteryLevel,
        ReportColumn::ReceiveTaskReportTime,
        ReportColumn::TaskType,
        ReportColumn::DownloadLink,
        ReportColumn::WorkEfficiency,
    ];

    /// Numeric columns that the export formats with thousands separators.
    pub const COMMA_BEARING: [ReportColumn; 3] = [
        ReportColumn::WorkEfficiency,
        ReportColumn::ActualCleaningArea,
        ReportColumn::CleaningPlanArea,
    ];

    pub const WEAR: [ReportColumn; 3] = [
        ReportColumn::Brush,
        ReportColumn::Filter,
        ReportColumn::Squeegee,
    ];

    /// Overwritten with the adjusted timestamp on every row.
    pub const CRYSTALLIZATION: [ReportColumn; 2] = [
        ReportColumn::PlannedCrystallizationArea,
        ReportColumn::ActualCrystallizationArea,
    ];

    pub fn label(self, units: UnitSystem) -> &'static str {
        use ReportColumn::*;
        use UnitSystem::{Imperial, Metric};

        match (self, units) {
            (Id, _) => "Id",
            (RobotName, _) => "Robot name",
            (SerialNumber, _) => "S/N",
            (MapName, _) => "Map name",
            (CleaningPlan, _) => "Cleaning plan",
            (User, _) => "User",
            (TaskStartTime, _) => "Task start time",
            (EndTime, _) => "End time",
            (TaskCompletion, _) => "Task completion (%)",
            (ActualCleaningArea, Metric) => "Actual cleaning area(㎡)",
            (ActualCleaningArea, Imperial) => "Actual cleaning area(ft²)",
            (TotalTimeHours, _) => "Total time (h)",
            (WaterUsage, Metric) => "Water usage (L)",
            (WaterUsage, Imperial) => "Water usage (gal)",
            (Brush, _) => "Brush (%)",
            (Filter, _) => "Filter (%)",
            (Squeegee, _) => "Squeegee(%)",
            (PlannedCrystallizationArea, Metric) => "Planned crystallization area (㎡)",
            (PlannedCrystallizationArea, Imperial) => "Planned crystallization area (ft²)",
            (ActualCrystallizationArea, Metric) => "Actual crystallization area (㎡)",
            (ActualCrystallizationArea, Imperial) => "Actual crystallization area (ft²)",
            (CleaningPlanArea, Metric) => "Cleaning plan area (㎡)",
            (CleaningPlanArea, Imperial) => "Cleaning plan area (ft²)",
            (StartBatteryLevel, _) => "Start battery level (%)",
            (EndBatteryLevel, _) => "End battery level (%)",
            (ReceiveTaskReportTime, _) => "Receive task report time",
            (TaskType, _) => "Task type",
            (DownloadLink, _) => "Download link",
            (WorkEfficiency, Metric) => "Work efficiency (㎡/h)",
            (WorkEfficiency, Imperial) => "Work efficiency (ft²/h)",
        }
    }

    /// True for columns that must be present in the uploaded export.
    pub fn is_sourced(self) -> bool {
        self != ReportColumn::Id
    }
}

/// Export columns that carry no meaning for the destination table.
pub fn dropped_columns(units: UnitSystem) -> [&'static str; 6] {
    let uncleaned = match units {
        UnitSystem::Metric => "Uncleaned area (㎡)",
        UnitSystem::Imperial => "Uncleaned area (ft²)",
    };
    [
        "Total time",
        "Task status",
        "Plan running time (s)",
        uncleaned,
        "Task start mode",
        "Remarks",
    ]
}

pub fn canonical_labels(units: UnitSystem) -> Vec<&'static str> {
    ReportColumn::CANONICAL
        .iter()
        .map(|column| column.label(units))
        .collect()
}

pub fn labels_of(columns: &[ReportColumn], units: UnitSystem) -> Vec<&'static str> {
    columns.iter().map(|column| column.label(units)).collect()
}
