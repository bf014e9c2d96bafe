use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dataset as loaded from disk or the network, keyed by `YYYY-MM-DD`.
pub type CalendarData = BTreeMap<String, DayRecord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    /// Any label the pipeline emits beyond the three known tiers.
    Other(String),
}

impl ImpactLevel {
    pub fn label(&self) -> &str {
        match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
            ImpactLevel::Other(label) => label,
        }
    }
}

impl From<String> for ImpactLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Low" => ImpactLevel::Low,
            "Medium" => ImpactLevel::Medium,
            "High" => ImpactLevel::High,
            _ => ImpactLevel::Other(value),
        }
    }
}

impl From<ImpactLevel> for String {
    fn from(level: ImpactLevel) -> Self {
        match level {
            ImpactLevel::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub subject: String,
    pub event_type: String,
    #[serde(deserialize_with = "attendee_count")]
    pub estimated_attendees: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<ImpactLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    pub demand_score: f64,
    pub impact_level: ImpactLevel,
    /// `None` when the month has no trend data. The pipeline writes `0` for
    /// such months, so a zero is read as absent.
    #[serde(default, deserialize_with = "trend_score")]
    pub monthly_trend_score: Option<f64>,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(default)]
    pub holiday_name: Option<String>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// Counts come out of a dataframe and may be written as `8000.0`.
fn attendee_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i64)
}

fn trend_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|score| *score != 0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemandClass {
    HighDemand,
    MediumDemand,
    LowDemand,
}

impl DemandClass {
    pub fn css_class(self) -> &'static str {
        match self {
            DemandClass::HighDemand => "high-demand",
            DemandClass::MediumDemand => "medium-demand",
            DemandClass::LowDemand => "low-demand",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayCellResponse {
    pub day: u32,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<DemandClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MonthGridResponse {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub days: Vec<DayCellResponse>,
}
