use crate::errors::LoadError;
use crate::models::{CalendarData, DayRecord};
use serde_json::{Map, Value};
use std::{env, fmt, path::PathBuf};
use tokio::fs;
use tracing::{info, warn};

pub const DEFAULT_DATA_PATH: &str = "data/processed/calendar_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// `CALENDAR_DATA_URL` wins over `CALENDAR_DATA_PATH`; otherwise the bundled path.
pub fn resolve_data_source() -> DataSource {
    if let Ok(url) = env::var("CALENDAR_DATA_URL") {
        if !url.trim().is_empty() {
            return DataSource::Url(url);
        }
    }

    if let Ok(path) = env::var("CALENDAR_DATA_PATH") {
        return DataSource::File(PathBuf::from(path));
    }

    DataSource::File(PathBuf::from(DEFAULT_DATA_PATH))
}

pub async fn load_data(source: &DataSource) -> Result<CalendarData, LoadError> {
    let name = source.to_string();
    let bytes = match source {
        DataSource::File(path) => fs::read(path)
            .await
            .map_err(|err| LoadError::fetch(&name, err))?,
        DataSource::Url(url) => fetch_url(url)
            .await
            .map_err(|err| LoadError::fetch(&name, err))?,
    };

    let data = parse_calendar(&name, &bytes)?;
    info!("loaded {} calendar days from {name}", data.len());
    Ok(data)
}

async fn fetch_url(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Decodes the date-keyed object. A record that does not match the day shape
/// is dropped with a warning instead of failing the whole dataset.
pub fn parse_calendar(source_name: &str, bytes: &[u8]) -> Result<CalendarData, LoadError> {
    let raw: Map<String, Value> =
        serde_json::from_slice(bytes).map_err(|err| LoadError::parse(source_name, err))?;

    let mut data = CalendarData::new();
    for (key, value) in raw {
        match serde_json::from_value::<DayRecord>(value) {
            Ok(record) => {
                data.insert(key, record);
            }
            Err(err) => warn!("skipping calendar record {key}: {err}"),
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DAY: &str = r#"{
        "2025-01-01": {
            "date": "2025-01-01",
            "demand_score": 42.5,
            "impact_level": "High",
            "monthly_trend_score": 3.2,
            "is_holiday": true,
            "holiday_name": "元日",
            "events": []
        }
    }"#;

    #[test]
    fn parses_date_keyed_object() {
        let data = parse_calendar("inline", DAY.as_bytes()).unwrap();
        let record = data.get("2025-01-01").expect("missing day");
        assert_eq!(record.holiday_name.as_deref(), Some("元日"));
        assert_eq!(record.monthly_trend_score, Some(3.2));
    }

    #[test]
    fn non_object_body_is_parse_error() {
        let err = parse_calendar("inline", b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));

        let err = parse_calendar("inline", b"<html>").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn malformed_record_is_skipped() {
        let body = r#"{
            "2025-01-02": { "date": "2025-01-02", "demand_score": "lots" },
            "2025-01-03": { "date": "2025-01-03", "demand_score": 1.0, "impact_level": "Low" }
        }"#;
        let data = parse_calendar("inline", body.as_bytes()).unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.contains_key("2025-01-03"));
    }

    #[test]
    fn float_attendee_counts_are_accepted() {
        let body = r#"{
            "2025-08-02": {
                "date": "2025-08-02",
                "demand_score": 100.0,
                "impact_level": "High",
                "events": [
                    { "subject": "KIRI", "event_type": "イベント", "estimated_attendees": 8000.0, "location": "釧路市" }
                ]
            }
        }"#;
        let data = parse_calendar("inline", body.as_bytes()).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["2025-08-02"].events[0].estimated_attendees, 8000);
    }

    #[tokio::test]
    async fn error_status_is_fetch_error() {
        use axum::{http::StatusCode, routing::get, Router};

        let app = Router::new().route(
            "/calendar_data.json",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let source = DataSource::Url(format!("http://{addr}/calendar_data.json"));
        let err = load_data(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }), "unexpected {err:?}");
    }

    #[tokio::test]
    async fn missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("absent.json"));
        let err = load_data(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DAY.as_bytes()).unwrap();
        let source = DataSource::File(file.path().to_path_buf());
        let data = load_data(&source).await.unwrap();
        assert_eq!(data.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_url_is_fetch_error() {
        let source = DataSource::Url("http://127.0.0.1:1/calendar_data.json".to_string());
        let err = load_data(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }
}
