//! Console renderer for session events
//!
//! Subscribes to the application layer's event sinks and turns events
//! into styled terminal lines. Two switches change the rendering:
//! `quiet` drops decorative lines (thinking indicators, advisories)
//! while keeping actual messages, and `json` replaces all styling with
//! one serialized event per line for scripting.

use crate::console::feedback::FeedbackFormatter;
use colored::Colorize;
use greenroom_application::{
    DiscussionEvent, DiscussionEventSink, InterviewEvent, InterviewEventSink,
};
use greenroom_domain::Speaker;
use serde::Serialize;

/// Renders session events to stdout
pub struct ConsoleEventSink {
    quiet: bool,
    json: bool,
}

impl ConsoleEventSink {
    pub fn new() -> Self {
        Self {
            quiet: false,
            json: false,
        }
    }

    /// Drop decorative lines, keep messages and feedback
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Emit one serialized event per line instead of styled text
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn print(&self, rendered: Option<String>) {
        if let Some(text) = rendered {
            println!("{}", text);
        }
    }

    fn json_line<E: Serialize>(event: &E) -> String {
        serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_interview(&self, event: &InterviewEvent) -> Option<String> {
        match event {
            InterviewEvent::SessionStarted { text, .. } => {
                Some(format!("{} {}", "Interviewer:".cyan().bold(), text))
            }
            InterviewEvent::NewMessage { text, .. } => {
                Some(format!("\n{} {}", "Interviewer:".cyan().bold(), text))
            }
            InterviewEvent::SessionEnded { feedback, .. } => {
                Some(format!("\n{}", FeedbackFormatter::format_interview(feedback)))
            }
        }
    }

    fn render_discussion(&self, event: &DiscussionEvent) -> Option<String> {
        match event {
            DiscussionEvent::SessionStarted {
                topic,
                participants,
                ..
            } => {
                let mut output = String::new();
                output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), topic));
                output.push_str(&format!("{}\n", "Around the table:".cyan().bold()));
                for participant in participants {
                    let style = match &participant.personality {
                        Some(personality) => personality.as_str(),
                        None => "you",
                    };
                    output.push_str(&format!("  * {} ({})\n", participant.display_name, style));
                }
                Some(output)
            }
            DiscussionEvent::NewMessage {
                speaker,
                speaker_name,
                text,
                ..
            } => {
                let label = match speaker {
                    Speaker::Moderator => format!("{}:", speaker_name).yellow().bold(),
                    Speaker::Human => format!("{}:", speaker_name).green().bold(),
                    _ => format!("{}:", speaker_name).cyan().bold(),
                };
                Some(format!("\n{} {}", label, text))
            }
            DiscussionEvent::SpeakerChange { speaker_name, .. } => (!self.quiet)
                .then(|| format!("{}", format!("({} is thinking...)", speaker_name).dimmed())),
            DiscussionEvent::InterruptionWindowOpened { .. } => None,
            DiscussionEvent::TurnWindowOpened { .. } => None,
            DiscussionEvent::WindingDown { .. } => (!self.quiet).then(|| {
                format!(
                    "{}",
                    "(the discussion sounds ready to wrap up; /end for feedback)".dimmed()
                )
            }),
            DiscussionEvent::SessionEnded { feedback, .. } => Some(format!(
                "\n{}",
                FeedbackFormatter::format_discussion(feedback)
            )),
        }
    }
}

impl Default for ConsoleEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewEventSink for ConsoleEventSink {
    fn emit(&self, event: InterviewEvent) {
        if self.json {
            println!("{}", Self::json_line(&event));
        } else {
            self.print(self.render_interview(&event));
        }
    }
}

impl DiscussionEventSink for ConsoleEventSink {
    fn emit(&self, event: DiscussionEvent) {
        if self.json {
            println!("{}", Self::json_line(&event));
        } else {
            self.print(self.render_discussion(&event));
        }
    }
}
