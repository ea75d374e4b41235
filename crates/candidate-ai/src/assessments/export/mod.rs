//! Importer for the platform's flat CSV answers export, producing the same
//! `AttemptSnapshot` the repository adapter returns.

mod mapping;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::assessments::scoring::{AttemptId, AttemptSnapshot};

#[derive(Debug)]
pub enum AnswerExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Invalid { row: usize, reason: String },
}

impl std::fmt::Display for AnswerExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerExportError::Io(err) => write!(f, "failed to read answers export: {}", err),
            AnswerExportError::Csv(err) => write!(f, "invalid answers CSV data: {}", err),
            AnswerExportError::Invalid { row, reason } => {
                write!(f, "invalid answers export row {}: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for AnswerExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnswerExportError::Io(err) => Some(err),
            AnswerExportError::Csv(err) => Some(err),
            AnswerExportError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for AnswerExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AnswerExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct AnswerExportImporter;

impl AnswerExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<AttemptSnapshot, AnswerExportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<AttemptSnapshot, AnswerExportError> {
        let rows = parser::parse_rows(reader)?;

        let Some(first) = rows.first() else {
            return Err(AnswerExportError::Invalid {
                row: 0,
                reason: "export contains no answer rows".to_string(),
            });
        };

        let attempt_id = AttemptId(first.attempt_id.clone());
        let assessment_id = first.assessment_id.clone();
        let candidate = first.candidate.clone();
        let mut completed_at = None;
        let mut answers = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            // Data rows are 1-based; the header is row 0.
            let row_number = index + 1;

            if row.attempt_id != attempt_id.0 {
                return Err(AnswerExportError::Invalid {
                    row: row_number,
                    reason: format!(
                        "attempt_id '{}' conflicts with '{}'",
                        row.attempt_id, attempt_id.0
                    ),
                });
            }

            if completed_at.is_none() {
                completed_at = row.completed_at.as_deref().and_then(parser::parse_datetime);
            }

            let answer = mapping::recorded_answer_for_row(row).map_err(|reason| {
                AnswerExportError::Invalid {
                    row: row_number,
                    reason,
                }
            })?;
            answers.push(answer);
        }

        Ok(AttemptSnapshot {
            attempt_id,
            assessment_id,
            candidate,
            completed_at,
            answers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessments::scoring::{AnswerValue, QuestionKind};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    const HEADER: &str = "attempt_id,assessment_id,candidate,completed_at,question_sequence,question_type,question_text,required,competency_area,points_possible,points_awarded,expected_answer,option_text,option_position,text_response,likert_rating,video_key";

    fn export(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn parse_datetime_supports_rfc3339_space_separated_and_date_strings() {
        let rfc = parser::parse_datetime_for_tests("2025-03-04T10:00:00Z").expect("parse rfc");
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap());

        let spaced = parser::parse_datetime_for_tests("2025-03-04 10:30:00").expect("parse spaced");
        assert_eq!(spaced, Utc.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap());

        let date = parser::parse_datetime_for_tests("2025-03-04").expect("parse date");
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());

        assert!(parser::parse_datetime_for_tests("  ").is_none());
        assert!(parser::parse_datetime_for_tests("not-a-date").is_none());
    }

    #[test]
    fn imports_a_mixed_attempt() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,2025-03-04T10:00:00Z,1,likert,I own my mistakes,true,,0,0,,,,,4,",
            "att-7,asmt-2,cand-9,2025-03-04T10:00:00Z,21,scenario,Conflict of interest,true,,0,0,,Disclose it,1,,,",
            "att-7,asmt-2,cand-9,2025-03-04T10:00:00Z,30,mcq,Pick the best reply,true,communication,10,8,Option A,Option A,1,,,",
            "att-7,asmt-2,cand-9,2025-03-04T10:00:00Z,31,essay,Describe a hard call,false,communication,10,6,,,,I once had to...,,",
        ]);

        let snapshot = AnswerExportImporter::from_reader(Cursor::new(csv)).expect("imports");

        assert_eq!(snapshot.attempt_id.0, "att-7");
        assert_eq!(snapshot.assessment_id, "asmt-2");
        assert_eq!(snapshot.candidate, "cand-9");
        assert_eq!(
            snapshot.completed_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap())
        );
        assert_eq!(snapshot.answers.len(), 4);

        assert_eq!(snapshot.answers[0].question_kind, QuestionKind::Likert);
        assert_eq!(snapshot.answers[0].value, AnswerValue::Rating { value: 4 });
        assert_eq!(
            snapshot.answers[1].question_kind,
            QuestionKind::ScenarioChoice
        );
        assert_eq!(
            snapshot.answers[1].value,
            AnswerValue::Selection {
                option_text: "Disclose it".to_string(),
                position: 1,
            }
        );
        assert_eq!(
            snapshot.answers[2].competency_area.as_deref(),
            Some("communication")
        );
        assert_eq!(snapshot.answers[3].points_awarded, 6);
    }

    #[test]
    fn empty_payload_columns_import_as_skipped() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,,5,likert,I follow through,true,,0,0,,,,,,",
        ]);

        let snapshot = AnswerExportImporter::from_reader(Cursor::new(csv)).expect("imports");
        assert_eq!(snapshot.answers[0].value, AnswerValue::Skipped);
        assert!(snapshot.completed_at.is_none());
    }

    #[test]
    fn rejects_ratings_outside_the_scale() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,,5,likert,I follow through,true,,0,0,,,,,9,",
        ]);

        match AnswerExportImporter::from_reader(Cursor::new(csv)) {
            Err(AnswerExportError::Invalid { row, reason }) => {
                assert_eq!(row, 1);
                assert!(reason.contains("likert_rating"));
            }
            other => panic!("expected invalid row error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_option_positions() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,,21,scenario,Conflict of interest,true,,0,0,,Disclose it,0,,,",
        ]);

        assert!(matches!(
            AnswerExportImporter::from_reader(Cursor::new(csv)),
            Err(AnswerExportError::Invalid { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_rows_from_mixed_attempts() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,,1,likert,I own my mistakes,true,,0,0,,,,,4,",
            "att-8,asmt-2,cand-9,,2,likert,I keep commitments,true,,0,0,,,,,4,",
        ]);

        match AnswerExportImporter::from_reader(Cursor::new(csv)) {
            Err(AnswerExportError::Invalid { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("att-8"));
            }
            other => panic!("expected invalid row error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_question_types() {
        let csv = export(&[
            "att-7,asmt-2,cand-9,,1,ranking,Order these,true,,0,0,,,,,,",
        ]);

        assert!(matches!(
            AnswerExportImporter::from_reader(Cursor::new(csv)),
            Err(AnswerExportError::Invalid { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_empty_exports() {
        let csv = format!("{HEADER}\n");
        assert!(matches!(
            AnswerExportImporter::from_reader(Cursor::new(csv)),
            Err(AnswerExportError::Invalid { row: 0, .. })
        ));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = AnswerExportImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            AnswerExportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn mapping_recognizes_type_label_synonyms() {
        assert_eq!(
            mapping::question_kind_for_label("Multiple_Choice"),
            Some(QuestionKind::MultipleChoice)
        );
        assert_eq!(
            mapping::question_kind_for_label("essay"),
            Some(QuestionKind::Text)
        );
        assert_eq!(
            mapping::question_kind_for_label("likert_scale"),
            Some(QuestionKind::Likert)
        );
        assert_eq!(
            mapping::question_kind_for_label("scenario"),
            Some(QuestionKind::ScenarioChoice)
        );
        assert_eq!(mapping::question_kind_for_label("ranking"), None);
    }
}
