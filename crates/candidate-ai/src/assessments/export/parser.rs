use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One flat row of the answers export. Payload columns are all optional;
/// the mapping layer decides which one is active.
#[derive(Debug, Deserialize)]
pub(crate) struct ExportRow {
    pub(crate) attempt_id: String,
    pub(crate) assessment_id: String,
    pub(crate) candidate: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) completed_at: Option<String>,
    pub(crate) question_sequence: u32,
    pub(crate) question_type: String,
    pub(crate) question_text: String,
    #[serde(default)]
    pub(crate) required: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) competency_area: Option<String>,
    #[serde(default)]
    pub(crate) points_possible: Option<u32>,
    #[serde(default)]
    pub(crate) points_awarded: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) expected_answer: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) option_text: Option<String>,
    #[serde(default)]
    pub(crate) option_position: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) text_response: Option<String>,
    #[serde(default)]
    pub(crate) likert_rating: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) video_key: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<ExportRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Completion timestamps arrive as RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a
/// bare date depending on which export produced the file.
pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_datetime(value)
}
