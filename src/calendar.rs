use crate::models::{
    CalendarData, DayCellResponse, DayRecord, DemandClass, EventRecord, ImpactLevel,
    MonthGridResponse,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// Weekday header, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Records grouped by year, then month (1-12). Only buckets with data exist.
#[derive(Debug, Default)]
pub struct CalendarIndex<'a> {
    years: BTreeMap<i32, BTreeMap<u32, Vec<&'a DayRecord>>>,
}

impl<'a> CalendarIndex<'a> {
    pub fn build(data: &'a CalendarData) -> Self {
        let mut index = CalendarIndex::default();
        for (key, record) in data {
            let Some(date) = parse_date_key(key) else {
                warn!("skipping calendar record with malformed date key {key:?}");
                continue;
            };
            index
                .years
                .entry(date.year())
                .or_default()
                .entry(date.month())
                .or_default()
                .push(record);
        }
        index
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn month(&self, year: i32, month: u32) -> &[&'a DayRecord] {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// Blank cells before day 1: the weekday index of the 1st, 0 = Sunday.
pub fn leading_blanks(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.weekday().num_days_from_sunday())
}

/// High and Medium get their own tier; every other label falls to low.
pub fn classify(level: &ImpactLevel) -> DemandClass {
    match level {
        ImpactLevel::High => DemandClass::HighDemand,
        ImpactLevel::Medium => DemandClass::MediumDemand,
        _ => DemandClass::LowDemand,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub heading: String,
    pub lines: Vec<String>,
    pub events: Vec<String>,
}

impl TooltipContent {
    pub fn from_record(record: &DayRecord) -> Self {
        let mut lines = vec![
            format!("需要スコア: {:.2}", record.demand_score),
            format!("影響度レベル: {}", record.impact_level),
        ];

        if let Some(trend) = record.monthly_trend_score {
            lines.push(format!("月間トレンドスコア: {trend:.2}"));
        }

        if record.is_holiday {
            lines.push(format!(
                "祝日: {}",
                record.holiday_name.as_deref().unwrap_or_default()
            ));
        }

        Self {
            heading: format!("日付: {}", record.date),
            lines,
            events: record.events.iter().map(event_line).collect(),
        }
    }

    pub fn text(&self) -> String {
        let mut out = self.heading.clone();
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        if !self.events.is_empty() {
            out.push_str("\nイベント:");
            for event in &self.events {
                out.push_str("\n- ");
                out.push_str(event);
            }
        }
        out
    }
}

fn event_line(event: &EventRecord) -> String {
    let mut line = format!(
        "{} ({}) - {}人",
        event.subject, event.event_type, event.estimated_attendees
    );
    if let Some(location) = &event.location {
        line.push_str(" @ ");
        line.push_str(location);
    }
    line
}

pub fn month_grid(data: &CalendarData, year: i32, month: u32) -> Option<MonthGridResponse> {
    let days_in_month = days_in_month(year, month)?;
    let leading_blanks = leading_blanks(year, month)?;

    let days = (1..=days_in_month)
        .map(|day| {
            let date = date_key(year, month, day);
            let record = data.get(&date);
            DayCellResponse {
                day,
                class: record.map(|record| classify(&record.impact_level)),
                demand_score: record.map(|record| record.demand_score),
                date,
            }
        })
        .collect();

    Some(MonthGridResponse {
        year,
        month,
        leading_blanks,
        days_in_month,
        days,
    })
}
