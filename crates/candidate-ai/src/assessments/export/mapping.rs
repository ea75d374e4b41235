use crate::assessments::scoring::{AnswerValue, QuestionKind, RecordedAnswer};

use super::parser::ExportRow;

/// Normalize the export's type labels onto `QuestionKind`. Exports from
/// different platform versions disagree on the exact spelling.
pub(crate) fn question_kind_for_label(label: &str) -> Option<QuestionKind> {
    match label.trim().to_ascii_lowercase().as_str() {
        "multiple_choice" | "mcq" | "choice" => Some(QuestionKind::MultipleChoice),
        "text" | "essay" | "free_text" => Some(QuestionKind::Text),
        "likert" | "likert_scale" => Some(QuestionKind::Likert),
        "video" => Some(QuestionKind::Video),
        "scenario" | "scenario_choice" => Some(QuestionKind::ScenarioChoice),
        _ => None,
    }
}

/// Pick the single active payload for a row and validate it. Selection wins
/// over the other columns when an option position is present, matching how
/// the platform writes rows.
pub(crate) fn answer_value_for_row(row: &ExportRow) -> Result<AnswerValue, String> {
    if let Some(position) = row.option_position {
        if position == 0 {
            return Err("option_position must be 1-based".to_string());
        }
        return Ok(AnswerValue::Selection {
            option_text: row.option_text.clone().unwrap_or_default(),
            position,
        });
    }

    if let Some(rating) = row.likert_rating {
        if !(1..=5).contains(&rating) {
            return Err(format!("likert_rating {rating} outside 1-5"));
        }
        return Ok(AnswerValue::Rating { value: rating });
    }

    if let Some(text) = &row.text_response {
        return Ok(AnswerValue::FreeText { text: text.clone() });
    }

    if let Some(storage_key) = &row.video_key {
        return Ok(AnswerValue::Video {
            storage_key: storage_key.clone(),
        });
    }

    Ok(AnswerValue::Skipped)
}

pub(crate) fn recorded_answer_for_row(row: &ExportRow) -> Result<RecordedAnswer, String> {
    let question_kind = question_kind_for_label(&row.question_type)
        .ok_or_else(|| format!("unknown question_type '{}'", row.question_type))?;
    let value = answer_value_for_row(row)?;

    Ok(RecordedAnswer {
        question_sequence: row.question_sequence,
        question_kind,
        question_text: row.question_text.clone(),
        required: row.required.unwrap_or(false),
        competency_area: row.competency_area.clone(),
        points_possible: row.points_possible.unwrap_or(0),
        points_awarded: row.points_awarded.unwrap_or(0),
        expected_answer: row.expected_answer.clone(),
        value,
    })
}
