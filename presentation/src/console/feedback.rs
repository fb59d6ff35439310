//! Console formatter for feedback reports

use colored::{ColoredString, Colorize};
use greenroom_domain::{DiscussionFeedback, InterviewFeedback};

/// Formats end-of-session feedback for console display
pub struct FeedbackFormatter;

impl FeedbackFormatter {
    /// Format an interview feedback report
    pub fn format_interview(feedback: &InterviewFeedback) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Interview Feedback"));
        output.push('\n');

        output.push_str(&Self::score_line("Overall", feedback.overall_score));
        if let Some(technical) = feedback.technical_score {
            output.push_str(&Self::score_line("Technical", technical));
        }
        output.push_str(&Self::score_line(
            "Communication",
            feedback.communication_score,
        ));
        output.push_str(&Self::score_line("Confidence", feedback.confidence_score));

        output.push_str(&Self::bullet_section(
            "Strengths",
            &feedback.strengths,
            |title| title.green().bold(),
        ));
        output.push_str(&Self::bullet_section(
            "Areas to Improve",
            &feedback.improvement_areas,
            |title| title.yellow().bold(),
        ));
        output.push_str(&Self::bullet_section(
            "Recommendations",
            &feedback.recommendations,
            |title| title.cyan().bold(),
        ));

        if !feedback.detailed_feedback.is_empty() {
            output.push_str(&format!("\n{}\n", "Detailed Feedback:".cyan().bold()));
            output.push_str(&Self::indent(&feedback.detailed_feedback, "  "));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a discussion feedback report
    pub fn format_discussion(feedback: &DiscussionFeedback) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Discussion Feedback"));
        output.push('\n');

        output.push_str(&Self::score_line("Participation", feedback.participation_score));
        output.push_str(&Self::score_line("Initiative", feedback.initiative_score));
        output.push_str(&Self::score_line("Clarity", feedback.clarity_score));
        output.push_str(&Self::score_line("Collaboration", feedback.collaboration_score));
        output.push_str(&Self::score_line(
            "Topic Understanding",
            feedback.topic_understanding,
        ));

        output.push_str(&Self::bullet_section(
            "Strengths",
            &feedback.strengths,
            |title| title.green().bold(),
        ));
        output.push_str(&Self::bullet_section(
            "Key Contributions",
            &feedback.key_contributions,
            |title| title.cyan().bold(),
        ));
        output.push_str(&Self::bullet_section(
            "Suggestions",
            &feedback.improvement_suggestions,
            |title| title.yellow().bold(),
        ));

        if !feedback.overall_feedback.is_empty() {
            output.push_str(&format!("\n{}\n", "Overall:".cyan().bold()));
            output.push_str(&Self::indent(&feedback.overall_feedback, "  "));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format interview feedback as JSON
    pub fn format_interview_json(feedback: &InterviewFeedback) -> String {
        serde_json::to_string_pretty(feedback).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format discussion feedback as JSON
    pub fn format_discussion_json(feedback: &DiscussionFeedback) -> String {
        serde_json::to_string_pretty(feedback).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn score_line(label: &str, score: u8) -> String {
        let padded = format!("{:<20}", format!("{}:", label));
        format!("{} {}\n", padded.cyan().bold(), Self::score_bar(score))
    }

    // Ten-cell bar plus the number, colored by band
    fn score_bar(score: u8) -> String {
        let filled = usize::from(score.min(100)) / 10;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled));
        let colored_bar = if score >= 80 {
            bar.green()
        } else if score >= 60 {
            bar.yellow()
        } else {
            bar.red()
        };
        format!("{} {:>3}/100", colored_bar, score)
    }

    fn bullet_section(
        title: &str,
        items: &[String],
        style: fn(&str) -> ColoredString,
    ) -> String {
        if items.is_empty() {
            return String::new();
        }
        let mut output = format!("\n{}\n", style(&format!("{}:", title)));
        for item in items {
            output.push_str(&format!("  * {}\n", item));
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_domain::{InterviewKind, ParticipationStats};

    // ==================== Interview Formatting Tests ====================

    #[test]
    fn test_interview_report_includes_every_score() {
        let feedback = InterviewFeedback::default_for(InterviewKind::Technical);
        let report = FeedbackFormatter::format_interview(&feedback);

        assert!(report.contains("Interview Feedback"));
        assert!(report.contains("Overall"));
        assert!(report.contains("Technical"));
        assert!(report.contains("Communication"));
        assert!(report.contains("Confidence"));
        assert!(report.contains("70/100"));
    }

    #[test]
    fn test_interview_report_skips_absent_technical_score() {
        let feedback = InterviewFeedback::default_for(InterviewKind::Hr);
        let report = FeedbackFormatter::format_interview(&feedback);

        assert!(!report.contains("Technical:"));
    }

    #[test]
    fn test_interview_report_lists_strengths_and_recommendations() {
        let feedback = InterviewFeedback {
            strengths: vec!["Clear structure".to_string()],
            recommendations: vec!["Practice system design".to_string()],
            ..Default::default()
        };
        let report = FeedbackFormatter::format_interview(&feedback);

        assert!(report.contains("* Clear structure"));
        assert!(report.contains("* Practice system design"));
    }

    #[test]
    fn test_interview_json_round_trips() {
        let feedback = InterviewFeedback::default();
        let json = FeedbackFormatter::format_interview_json(&feedback);
        let parsed: InterviewFeedback = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, feedback);
    }

    // ==================== Discussion Formatting Tests ====================

    #[test]
    fn test_discussion_report_includes_every_score() {
        let stats = ParticipationStats {
            human_messages: 4,
            total_messages: 20,
        };
        let feedback = DiscussionFeedback::default_for(&stats);
        let report = FeedbackFormatter::format_discussion(&feedback);

        assert!(report.contains("Discussion Feedback"));
        assert!(report.contains("Participation"));
        assert!(report.contains("Initiative"));
        assert!(report.contains("Clarity"));
        assert!(report.contains("Collaboration"));
        assert!(report.contains("Topic Understanding"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let feedback = DiscussionFeedback {
            strengths: vec![],
            key_contributions: vec![],
            ..DiscussionFeedback::default_for(&ParticipationStats {
                human_messages: 1,
                total_messages: 5,
            })
        };
        let report = FeedbackFormatter::format_discussion(&feedback);

        assert!(!report.contains("Strengths:"));
        assert!(!report.contains("Key Contributions:"));
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_indent_prefixes_every_line() {
        let indented = FeedbackFormatter::indent("first\nsecond", "  ");
        assert_eq!(indented, "  first\n  second");
    }

    #[test]
    fn test_score_bar_scales_with_score() {
        assert!(FeedbackFormatter::score_bar(100).contains("##########"));
        assert!(FeedbackFormatter::score_bar(0).contains("----------"));
        assert!(FeedbackFormatter::score_bar(55).contains("#####-----"));
    }
}
