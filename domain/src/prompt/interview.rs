//! Prompt templates for one-on-one interview sessions

use crate::session::entities::{InterviewKind, Speaker};
use crate::session::profile::SessionProfile;
use crate::session::transcript::Transcript;

/// Templates for every interviewer-side generation call
pub struct InterviewPromptTemplate;

impl InterviewPromptTemplate {
    /// Interviewer system instruction, keyed by interview flavor
    pub fn system_instruction(kind: InterviewKind) -> &'static str {
        match kind {
            InterviewKind::Technical => {
                r#"You are a senior technical interviewer at a top tech company. Your tone is professional, direct, and conversational.
- Ask only one, single-part question at a time.
- Keep your questions concise and to the point.
- Do NOT explain the reasoning or what you are assessing.
- Wait for the user to respond before asking the next question.
- Adapt your follow-up questions based on their answers."#
            }
            InterviewKind::Hr => {
                r#"You are a friendly but professional HR manager. Your goal is to understand the candidate's personality and experience.
- Ask common behavioral questions.
- Keep your questions open-ended and conversational.
- Ask only one question at a time.
- Do NOT use corporate jargon or explain the purpose of your questions."#
            }
            InterviewKind::Salary => {
                r#"You are a hiring manager discussing compensation. Your tone is professional and collaborative.
- Ask direct but polite questions about salary expectations and other compensation.
- Respond to the candidate's points, but keep your own questions and statements concise.
- Ask only one question at a time."#
            }
            InterviewKind::General => {
                r#"You are a professional interviewer. Ask a single, relevant question based on the interview type and context. Be engaging and professional. Do not explain your questions."#
            }
        }
    }

    /// Static greeting, keyed by interview flavor.
    ///
    /// Doubles as the fallback when greeting generation fails: opening a
    /// session must never depend on the backend being up.
    pub fn static_greeting(kind: InterviewKind, profile: &SessionProfile) -> String {
        match kind {
            InterviewKind::Technical => format!(
                "Hello! Welcome to your technical interview for {} at {}. I'm here to assess \
                 your technical skills and problem-solving abilities. Are you ready to begin?",
                profile.role_or_default(),
                profile.company_or_default(),
            ),
            InterviewKind::Hr => format!(
                "Hello! Welcome to your HR interview for {} at {}. I'm here to learn more \
                 about you, your career goals, and how you might fit with our team culture. \
                 Shall we get started?",
                profile.role_or_default(),
                profile.company_or_default(),
            ),
            InterviewKind::Salary => format!(
                "Hello! I'm here to discuss compensation and benefits for {}. This is an \
                 important conversation, so please feel free to share your thoughts openly. \
                 Ready to discuss?",
                profile.role_or_default(),
            ),
            InterviewKind::General => {
                "Hello! I'm excited to conduct this interview with you today. Let's begin!"
                    .to_string()
            }
        }
    }

    /// User prompt asking the backend to produce a personalized greeting
    pub fn greeting_prompt(
        kind: InterviewKind,
        profile: &SessionProfile,
        resume_context: &str,
        company_context: &str,
    ) -> String {
        let mut prompt = format!(
            r#"Greet the candidate to open a {} interview for {} at {}.
Welcome them warmly in two or three sentences, mention the role, and finish by asking whether they are ready to begin. Do not ask an interview question yet."#,
            kind.as_str(),
            profile.role_or_default(),
            profile.company_or_default(),
        );
        push_context_sections(&mut prompt, resume_context, company_context);
        prompt
    }

    /// Fixed first question once the candidate confirms they are ready
    pub fn ready_check_question() -> &'static str {
        "Great! To start, can you please tell me a little bit about yourself and your background?"
    }

    /// Fixed closing line, keyed by interview flavor
    pub fn closing(kind: InterviewKind) -> &'static str {
        match kind {
            InterviewKind::Technical => {
                "Thank you for the technical discussion! We'll now move to the feedback phase."
            }
            InterviewKind::Hr => {
                "Thank you for sharing your experiences! This concludes our HR interview session."
            }
            InterviewKind::Salary => {
                "Thank you for the open discussion. Our salary negotiation session is now complete."
            }
            InterviewKind::General => {
                "Thank you for the interview! I'll now prepare your feedback."
            }
        }
    }

    /// Generic acknowledgment substituted when question generation fails
    pub fn acknowledgment() -> &'static str {
        "Thank you for your response. Let me think of the next question..."
    }

    /// System prompt for the next-question call: flavor instruction plus
    /// interview metadata and whatever retrieved context is available
    pub fn question_system(
        kind: InterviewKind,
        profile: &SessionProfile,
        resume_context: &str,
        company_context: &str,
    ) -> String {
        let mut prompt = format!(
            "{}\n\nInterview Type: {}\nCandidate Experience: {} level",
            Self::system_instruction(kind),
            kind.as_str(),
            profile.experience_or_default(),
        );
        if let Some(role) = &profile.job_role {
            prompt.push_str(&format!("\nJob Role: {role}"));
        }
        if let Some(company) = &profile.company_name {
            prompt.push_str(&format!("\nCompany: {company}"));
        }
        if let Some(difficulty) = &profile.difficulty {
            prompt.push_str(&format!("\nQuestion Difficulty: {difficulty}"));
        }
        if !profile.topics.is_empty() {
            prompt.push_str(&format!("\nFocus Topics: {}", profile.topics.join(", ")));
        }
        push_context_sections(&mut prompt, resume_context, company_context);
        prompt
    }

    /// System prompt for the feedback call
    pub fn feedback_system(kind: InterviewKind) -> String {
        format!(
            r#"You are an expert interview evaluator. Analyze the following {} interview and provide detailed, constructive feedback. Focus on:

1. Technical competency (for technical interviews)
2. Communication skills
3. Problem-solving approach
4. Confidence and presentation
5. Areas for improvement

Provide scores (0-100) and specific recommendations."#,
            kind.as_str()
        )
    }

    /// User prompt for the feedback call: context, the full transcript
    /// (greeting included), and the exact JSON shape expected back
    pub fn feedback_prompt(
        kind: InterviewKind,
        profile: &SessionProfile,
        transcript: &Transcript,
    ) -> String {
        format!(
            r#"Interview Context:
- Type: {}
- Role: {}
- Experience Level: {}

Transcript:
{}

Please provide feedback in the following JSON format:
{{
    "overall_score": <0-100>,
    "technical_score": <0-100>,
    "communication_score": <0-100>,
    "confidence_score": <0-100>,
    "strengths": ["strength1", "strength2"],
    "improvement_areas": ["area1", "area2"],
    "detailed_feedback": "comprehensive feedback text",
    "recommendations": ["recommendation1", "recommendation2"]
}}"#,
            kind.as_str(),
            profile.role_or_default(),
            profile.experience_or_default(),
            format_interview_transcript(transcript),
        )
    }
}

/// Render the transcript as "Interviewer: ..." / "Candidate: ..." lines
fn format_interview_transcript(transcript: &Transcript) -> String {
    transcript
        .messages()
        .iter()
        .map(|message| {
            let who = match message.speaker {
                Speaker::Human => "Candidate",
                _ => "Interviewer",
            };
            format!("{}: {}", who, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_context_sections(prompt: &mut String, resume_context: &str, company_context: &str) {
    if !resume_context.is_empty() {
        prompt.push_str(&format!("\n\nResume Context:\n{resume_context}"));
    }
    if !company_context.is_empty() {
        prompt.push_str(&format!("\n\nCompany Context:\n{company_context}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::{MessageKind, Speaker};

    fn profile() -> SessionProfile {
        SessionProfile::new()
            .with_company("Acme")
            .with_role("Backend Engineer")
    }

    #[test]
    fn test_greetings_interpolate_profile() {
        let greeting = InterviewPromptTemplate::static_greeting(InterviewKind::Technical, &profile());
        assert!(greeting.contains("Backend Engineer"));
        assert!(greeting.contains("Acme"));

        let bare = InterviewPromptTemplate::static_greeting(
            InterviewKind::Technical,
            &SessionProfile::default(),
        );
        assert!(bare.contains("the position"));
        assert!(bare.contains("the company"));
    }

    #[test]
    fn test_each_flavor_has_distinct_closing() {
        let closings: Vec<&str> = [
            InterviewKind::Technical,
            InterviewKind::Hr,
            InterviewKind::Salary,
            InterviewKind::General,
        ]
        .iter()
        .map(|kind| InterviewPromptTemplate::closing(*kind))
        .collect();
        let mut unique = closings.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), closings.len());
    }

    #[test]
    fn test_question_system_includes_context_sections() {
        let prompt = InterviewPromptTemplate::question_system(
            InterviewKind::Technical,
            &profile(),
            "Worked on a payments platform for three years.",
            "Acme builds logistics software.",
        );
        assert!(prompt.contains("Resume Context:"));
        assert!(prompt.contains("payments platform"));
        assert!(prompt.contains("Company Context:"));
        assert!(prompt.contains("Job Role: Backend Engineer"));
    }

    #[test]
    fn test_question_system_omits_empty_sections() {
        let prompt = InterviewPromptTemplate::question_system(
            InterviewKind::Hr,
            &SessionProfile::default(),
            "",
            "",
        );
        assert!(!prompt.contains("Resume Context:"));
        assert!(!prompt.contains("Company Context:"));
    }

    #[test]
    fn test_feedback_prompt_labels_speakers() {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Interviewer, MessageKind::Greeting, "Welcome!");
        transcript.push(Speaker::Human, MessageKind::Response, "Glad to be here.");

        let prompt =
            InterviewPromptTemplate::feedback_prompt(InterviewKind::Hr, &profile(), &transcript);
        assert!(prompt.contains("Interviewer: Welcome!"));
        assert!(prompt.contains("Candidate: Glad to be here."));
        assert!(prompt.contains("\"overall_score\": <0-100>"));
    }
}
