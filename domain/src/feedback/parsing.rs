//! Feedback parsing for generation-backend output.
//!
//! These functions turn free-form model text into the structured feedback
//! contract. They are pure domain logic: no I/O, no session management,
//! just JSON extraction with clamping and deterministic fallbacks. All
//! "the model might say anything" handling lives behind this seam.
//!
//! # Functions
//!
//! | Function | Use Case | Fallback |
//! |----------|----------|----------|
//! | [`extract_json_object`] | Pull a JSON object out of surrounding prose | `None` |
//! | [`parse_interview_feedback`] | Interview feedback | [`InterviewFeedback::default_for`] |
//! | [`parse_discussion_feedback`] | Discussion feedback | [`DiscussionFeedback::default_for`] |

use crate::feedback::entities::{DiscussionFeedback, InterviewFeedback, ParticipationStats};
use crate::session::entities::InterviewKind;
use serde_json::Value;

/// Slice out the outermost JSON object from a response.
///
/// Models frequently wrap JSON in prose or markdown fences; taking the
/// first `{` through the last `}` strips both.
pub fn extract_json_object(response: &str) -> Option<&str> {
    if let Some(start) = response.find('{')
        && let Some(end) = response[start..].rfind('}')
    {
        return Some(&response[start..start + end + 1]);
    }
    None
}

/// Parse interview feedback from model output.
///
/// Never fails: scores are clamped to `[0, 100]`, missing fields are
/// filled from the deterministic defaults, and completely unparseable
/// output yields the default structure for the interview flavor. When
/// the model answered in prose instead of JSON, the prose is kept as
/// `detailed_feedback` so the evaluation text is not thrown away.
pub fn parse_interview_feedback(response: &str, kind: InterviewKind) -> InterviewFeedback {
    let defaults = InterviewFeedback::default_for(kind);

    let Some(parsed) = extract_json_object(response)
        .and_then(|json| serde_json::from_str::<Value>(json).ok())
        .filter(|value| value.is_object())
    else {
        let prose = response.trim();
        let mut feedback = defaults;
        if !prose.is_empty() {
            feedback.detailed_feedback = prose.to_string();
        }
        return feedback;
    };

    let technical_score = match kind {
        InterviewKind::Technical => {
            Some(score_field(&parsed, "technical_score").unwrap_or(65))
        }
        _ => score_field(&parsed, "technical_score"),
    };

    InterviewFeedback {
        overall_score: score_field(&parsed, "overall_score").unwrap_or(defaults.overall_score),
        technical_score,
        communication_score: score_field(&parsed, "communication_score")
            .unwrap_or(defaults.communication_score),
        confidence_score: score_field(&parsed, "confidence_score")
            .unwrap_or(defaults.confidence_score),
        strengths: string_list_field(&parsed, "strengths").unwrap_or(defaults.strengths),
        improvement_areas: string_list_field(&parsed, "improvement_areas")
            .unwrap_or(defaults.improvement_areas),
        detailed_feedback: string_field(&parsed, "detailed_feedback")
            .unwrap_or(defaults.detailed_feedback),
        recommendations: string_list_field(&parsed, "recommendations")
            .unwrap_or(defaults.recommendations),
    }
}

/// Parse group-discussion feedback from model output.
///
/// Same contract as [`parse_interview_feedback`]: always returns a
/// well-formed structure. Defaults are derived from the participation
/// stats, so even the fallback reflects how much the human spoke.
pub fn parse_discussion_feedback(
    response: &str,
    stats: &ParticipationStats,
) -> DiscussionFeedback {
    let defaults = DiscussionFeedback::default_for(stats);

    let Some(parsed) = extract_json_object(response)
        .and_then(|json| serde_json::from_str::<Value>(json).ok())
        .filter(|value| value.is_object())
    else {
        return defaults;
    };

    DiscussionFeedback {
        participation_score: score_field(&parsed, "participation_score")
            .unwrap_or(defaults.participation_score),
        initiative_score: score_field(&parsed, "initiative_score")
            .unwrap_or(defaults.initiative_score),
        clarity_score: score_field(&parsed, "clarity_score").unwrap_or(defaults.clarity_score),
        collaboration_score: score_field(&parsed, "collaboration_score")
            .unwrap_or(defaults.collaboration_score),
        topic_understanding: score_field(&parsed, "topic_understanding")
            .unwrap_or(defaults.topic_understanding),
        strengths: string_list_field(&parsed, "strengths").unwrap_or(defaults.strengths),
        improvement_suggestions: string_list_field(&parsed, "improvement_suggestions")
            .unwrap_or(defaults.improvement_suggestions),
        key_contributions: string_list_field(&parsed, "key_contributions")
            .unwrap_or(defaults.key_contributions),
        overall_feedback: string_field(&parsed, "overall_feedback")
            .unwrap_or(defaults.overall_feedback),
    }
}

/// Read a score field, tolerating floats and numeric strings.
/// Out-of-range values are clamped to `[0, 100]`.
fn score_field(value: &Value, field: &str) -> Option<u8> {
    let raw = value.get(field)?;
    let number = if let Some(n) = raw.as_f64() {
        n
    } else {
        raw.as_str()?.trim().parse::<f64>().ok()?
    };
    Some(number.round().clamp(0.0, 100.0) as u8)
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    let text = value.get(field)?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Read a list of strings, tolerating a bare string for a one-item list
fn string_list_field(value: &Value, field: &str) -> Option<Vec<String>> {
    match value.get(field)? {
        Value::Array(items) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.to_string())
                .collect();
            (!strings.is_empty()).then_some(strings)
        }
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.trim().to_string()]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== extract_json_object Tests ====================

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_from_markdown_fence() {
        let response = "Here is my evaluation:\n```json\n{\"overall_score\": 80}\n```\nDone.";
        assert_eq!(extract_json_object(response), Some("{\"overall_score\": 80}"));
    }

    #[test]
    fn test_extract_none_without_braces() {
        assert_eq!(extract_json_object("not json"), None);
        assert_eq!(extract_json_object(""), None);
    }

    // ==================== parse_interview_feedback Tests ====================

    #[test]
    fn test_parse_full_interview_feedback() {
        let response = r#"{
            "overall_score": 82,
            "technical_score": 78,
            "communication_score": 88,
            "confidence_score": 80,
            "strengths": ["Clear explanations", "Good depth"],
            "improvement_areas": ["More examples"],
            "detailed_feedback": "Strong showing overall.",
            "recommendations": ["Keep practicing"]
        }"#;
        let feedback = parse_interview_feedback(response, InterviewKind::Technical);
        assert_eq!(feedback.overall_score, 82);
        assert_eq!(feedback.technical_score, Some(78));
        assert_eq!(feedback.strengths, vec!["Clear explanations", "Good depth"]);
        assert_eq!(feedback.detailed_feedback, "Strong showing overall.");
    }

    #[test]
    fn test_not_json_yields_defaults_in_range() {
        let feedback = parse_interview_feedback("not json", InterviewKind::Hr);
        assert!(feedback.scores_in_range());
        assert_eq!(feedback.overall_score, 70);
        assert_eq!(feedback.technical_score, None);
        // The prose, such as it is, is kept as the detail text
        assert_eq!(feedback.detailed_feedback, "not json");
    }

    #[test]
    fn test_empty_response_keeps_default_detail() {
        let feedback = parse_interview_feedback("", InterviewKind::General);
        assert!(!feedback.detailed_feedback.is_empty());
        assert_eq!(feedback.overall_score, 70);
    }

    #[test]
    fn test_scores_clamped_to_range() {
        let response = r#"{"overall_score": 150, "communication_score": -20, "confidence_score": 99.6}"#;
        let feedback = parse_interview_feedback(response, InterviewKind::General);
        assert_eq!(feedback.overall_score, 100);
        assert_eq!(feedback.communication_score, 0);
        assert_eq!(feedback.confidence_score, 100);
        assert!(feedback.scores_in_range());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let response = r#"{"overall_score": "85", "strengths": "Concise answers"}"#;
        let feedback = parse_interview_feedback(response, InterviewKind::General);
        assert_eq!(feedback.overall_score, 85);
        assert_eq!(feedback.strengths, vec!["Concise answers"]);
    }

    #[test]
    fn test_technical_session_fills_missing_technical_score() {
        let response = r#"{"overall_score": 75}"#;
        let feedback = parse_interview_feedback(response, InterviewKind::Technical);
        assert_eq!(feedback.technical_score, Some(65));

        let hr = parse_interview_feedback(response, InterviewKind::Hr);
        assert_eq!(hr.technical_score, None);
    }

    // ==================== parse_discussion_feedback Tests ====================

    fn stats() -> ParticipationStats {
        ParticipationStats {
            human_messages: 6,
            total_messages: 18,
        }
    }

    #[test]
    fn test_parse_full_discussion_feedback() {
        let response = r#"{
            "participation_score": 72,
            "initiative_score": 64,
            "clarity_score": 81,
            "collaboration_score": 77,
            "topic_understanding": 85,
            "strengths": ["Built on others' ideas"],
            "improvement_suggestions": ["Speak up earlier"],
            "key_contributions": ["Framed the tradeoffs"],
            "overall_feedback": "Solid collaborative presence."
        }"#;
        let feedback = parse_discussion_feedback(response, &stats());
        assert_eq!(feedback.participation_score, 72);
        assert_eq!(feedback.topic_understanding, 85);
        assert_eq!(feedback.overall_feedback, "Solid collaborative presence.");
    }

    #[test]
    fn test_discussion_not_json_yields_participation_defaults() {
        // 6 of 18 messages: 33.3% participation, base = 50
        let feedback = parse_discussion_feedback("not json", &stats());
        assert_eq!(feedback.participation_score, 50);
        assert_eq!(feedback.initiative_score, 45);
        assert_eq!(feedback.clarity_score, 55);
        assert!(feedback.scores_in_range());
        assert!(feedback.overall_feedback.contains("6 contributions"));
    }

    #[test]
    fn test_partial_discussion_json_fills_gaps() {
        let response = r#"{"participation_score": 90}"#;
        let feedback = parse_discussion_feedback(response, &stats());
        assert_eq!(feedback.participation_score, 90);
        assert_eq!(feedback.collaboration_score, 50);
        assert!(!feedback.strengths.is_empty());
    }
}
