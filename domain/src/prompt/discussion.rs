//! Prompt templates for group discussion sessions

use crate::discussion::participant::{Participant, Personality};
use crate::feedback::entities::ParticipationStats;
use crate::session::entities::Speaker;
use crate::session::transcript::Transcript;

/// Templates for the moderator, the synthetic participants, and feedback
pub struct DiscussionPromptTemplate;

impl DiscussionPromptTemplate {
    /// Fixed moderator opening referencing the topic and the seats
    pub fn moderator_opening(topic: &str, participants: &[Participant]) -> String {
        let names: Vec<&str> = participants
            .iter()
            .filter(|p| !p.is_human)
            .map(|p| p.display_name.as_str())
            .collect();
        format!(
            r#"Welcome everyone to today's group discussion on: "{}"

We have {} and yourself participating today. This is an opportunity to share your perspectives, listen to different viewpoints, and engage in meaningful dialogue.

Feel free to jump in at any time with your thoughts. Let's begin with opening thoughts on this topic. Who would like to start?"#,
            topic,
            names.join(", "),
        )
    }

    /// System prompt for one synthetic participant's contribution
    pub fn participant_system(personality: Personality, topic: &str) -> String {
        format!(
            r#"{}

You are participating in a group discussion about: "{}"

Guidelines:
- Keep responses concise (2-3 sentences maximum)
- Build on previous points when relevant
- Stay true to your personality
- Be respectful but authentic to your character
- Don't repeat what others have already said well"#,
            personality.profile().instruction,
            topic,
        )
    }

    /// User prompt for one synthetic participant's contribution
    pub fn contribution_prompt(participant: &Participant, recent_lines: &str) -> String {
        let personality = participant
            .personality
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or("neutral");
        format!(
            r#"Recent discussion:
{}

Respond as {} with your {} personality. Add value to the discussion."#,
            recent_lines, participant.display_name, personality,
        )
    }

    /// System prompt for the feedback call
    pub fn feedback_system() -> &'static str {
        "You are an expert evaluator for group discussions. Analyze the participant's performance across multiple dimensions and provide constructive feedback."
    }

    /// User prompt for the feedback call: participation stats, the
    /// human's contributions, the tail of the discussion, and the exact
    /// JSON shape expected back
    pub fn feedback_prompt(
        topic: &str,
        stats: &ParticipationStats,
        transcript: &Transcript,
        participants: &[Participant],
    ) -> String {
        let user_text = transcript
            .messages()
            .iter()
            .filter(|m| m.speaker.is_human())
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let context_tail = format_transcript_lines(transcript, participants, 10);

        format!(
            r#"Group Discussion Analysis:

Topic: {}
Total Messages: {}
User Messages: {}
Participation Rate: {:.1}%

User's Contributions:
{}

Full Discussion Context:
{}

Evaluate the user's performance and provide scores (0-100) for:
1. Participation Score - How actively they engaged
2. Initiative Score - How often they initiated new points
3. Clarity Score - How clear and well-structured their points were
4. Collaboration Score - How well they built on others' ideas
5. Topic Understanding - How well they understood and addressed the topic

Also provide:
- 2-3 key strengths
- 2-3 improvement suggestions
- 2-3 key contributions they made
- Overall feedback paragraph

Format as JSON:
{{
    "participation_score": <score>,
    "initiative_score": <score>,
    "clarity_score": <score>,
    "collaboration_score": <score>,
    "topic_understanding": <score>,
    "strengths": ["strength1", "strength2"],
    "improvement_suggestions": ["suggestion1", "suggestion2"],
    "key_contributions": ["contribution1", "contribution2"],
    "overall_feedback": "detailed feedback paragraph"
}}"#,
            topic,
            stats.total_messages,
            stats.human_messages,
            stats.participation_percent(),
            user_text,
            context_tail,
        )
    }
}

/// Render the last `n` messages as "Name: text" lines, resolving speaker
/// ids to display names through the seated participant list
pub fn format_transcript_lines(
    transcript: &Transcript,
    participants: &[Participant],
    n: usize,
) -> String {
    transcript
        .tail(n)
        .iter()
        .map(|message| {
            let name = display_name_for(&message.speaker, participants);
            format!("{}: {}", name, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_name_for<'a>(speaker: &Speaker, participants: &'a [Participant]) -> &'a str {
    match speaker {
        Speaker::Moderator => "Moderator",
        Speaker::Interviewer => "Interviewer",
        Speaker::Human => participants
            .iter()
            .find(|p| p.is_human)
            .map(|p| p.display_name.as_str())
            .unwrap_or("You"),
        Speaker::Agent(id) => participants
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.display_name.as_str())
            .unwrap_or("Participant"),
    }
}
