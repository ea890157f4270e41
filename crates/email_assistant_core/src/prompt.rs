//! crates/email_assistant_core/src/prompt.rs
//!
//! Builds the prompt sent to the completion provider from the user's key points.

use crate::domain::{EmailRequest, EmailType, ToneLabel};

/// Opening line and type-specific guidance for one kind of email.
struct PromptTemplate {
    opening: &'static str,
    guidance: &'static str,
}

const CLOSING_REQUIREMENTS: &str = "Requirements:
- Use a clear, professional structure with an appropriate greeting and closing
- Incorporate every key point naturally into the message
- Maintain the specified tone throughout
- Keep the email concise but comprehensive
- Provide only the email content (subject line and body) without placeholders like [Your Name] or extra commentary";

fn template_for(email_type: EmailType) -> PromptTemplate {
    match email_type {
        EmailType::ThankYou => PromptTemplate {
            opening: "Write a heartfelt thank you email with the following specifics:",
            guidance: "Please write a warm and appreciative email that expresses genuine gratitude. Include specific details about what you're thanking them for and how it impacted you or your work.",
        },
        EmailType::NewArticle => PromptTemplate {
            opening: "Write an engaging email announcing a new article or news with these details:",
            guidance: "Please write an informative and engaging email that introduces the new content. Include a compelling subject matter, key highlights, and encourage the reader to engage with the content.",
        },
        EmailType::ReportSharing => PromptTemplate {
            opening: "Write a professional email for sharing a report with these key elements:",
            guidance: "Please write a clear and organized email that introduces the report, highlights key findings or important sections, and provides context for why this report is valuable to the recipient.",
        },
        EmailType::MeetingFollowup => PromptTemplate {
            opening: "Write a comprehensive meeting follow-up email covering:",
            guidance: "Please write a structured follow-up email that summarizes key decisions, action items, next steps, and deadlines. Make it clear and actionable for all participants.",
        },
        EmailType::ProjectUpdate => PromptTemplate {
            opening: "Write a detailed project update email including:",
            guidance: "Please write an informative project update that covers current progress, achievements, challenges, next milestones, and any support needed. Keep stakeholders well-informed.",
        },
        EmailType::Custom => PromptTemplate {
            opening: "Write a professional email with the following key points:",
            guidance: "Please write a complete, well-structured email incorporating these points.",
        },
    }
}

/// Builds the prompt for one email.
///
/// An empty `key_points` slice is accepted and simply produces no bullet lines;
/// rejecting empty input is the caller's job. The context block is only added
/// when `context` contains something other than whitespace.
pub fn build_prompt(
    key_points: &[String],
    tone: &ToneLabel,
    context: Option<&str>,
    email_type: EmailType,
) -> String {
    let template = template_for(email_type);

    let mut prompt = String::from(template.opening);
    for point in key_points {
        prompt.push_str("\n- ");
        prompt.push_str(point);
    }

    prompt.push_str("\n\nTone: ");
    prompt.push_str(tone.as_str());

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str("\nAdditional Context: ");
        prompt.push_str(context);
    }

    prompt.push_str("\n\n");
    prompt.push_str(template.guidance);
    prompt.push_str("\n\n");
    prompt.push_str(CLOSING_REQUIREMENTS);

    prompt
}

/// Convenience wrapper over [`build_prompt`] for a whole request.
pub fn build_prompt_for(request: &EmailRequest) -> String {
    build_prompt(
        &request.key_points,
        &request.tone,
        request.context.as_deref(),
        request.email_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_key_point_appears_verbatim() {
        let key_points = points(&["Confirm meeting Friday 2pm", "Bring Q3 report", "ÜberCase Détails"]);
        for email_type in EmailType::ALL {
            let prompt = build_prompt(&key_points, &ToneLabel::Friendly, None, email_type);
            for point in &key_points {
                assert!(prompt.contains(point.as_str()), "{email_type}: missing {point}");
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_prompts() {
        let key_points = points(&["Share the roadmap", "Ask for feedback"]);
        let first = build_prompt(&key_points, &ToneLabel::Casual, Some("Team sync"), EmailType::ProjectUpdate);
        let second = build_prompt(&key_points, &ToneLabel::Casual, Some("Team sync"), EmailType::ProjectUpdate);
        assert_eq!(first, second);
    }

    #[test]
    fn meeting_followup_uses_its_own_phrasing() {
        let key_points = points(&["Confirm meeting Friday 2pm", "Bring Q3 report"]);
        let prompt = build_prompt(&key_points, &ToneLabel::Formal, None, EmailType::MeetingFollowup);

        assert!(prompt.contains("Confirm meeting Friday 2pm"));
        assert!(prompt.contains("Bring Q3 report"));
        assert!(prompt.contains("formal"));
        assert!(prompt.contains("summarizes key decisions, action items"));
        assert!(prompt.starts_with("Write a comprehensive meeting follow-up email covering:"));
    }

    #[test]
    fn points_are_rendered_as_dash_bullets() {
        let prompt = build_prompt(&points(&["one", "two"]), &ToneLabel::Professional, None, EmailType::Custom);
        assert!(prompt.contains("\n- one\n- two\n"));
    }

    #[test]
    fn context_block_only_when_present() {
        let key_points = points(&["Say hello"]);

        let without = build_prompt(&key_points, &ToneLabel::Professional, None, EmailType::Custom);
        assert!(!without.contains("Additional Context"));

        let blank = build_prompt(&key_points, &ToneLabel::Professional, Some("   "), EmailType::Custom);
        assert!(!blank.contains("Additional Context"));

        let with = build_prompt(&key_points, &ToneLabel::Professional, Some("Reply to Anna"), EmailType::Custom);
        assert!(with.contains("Additional Context: Reply to Anna"));
    }

    #[test]
    fn empty_key_points_still_produce_a_prompt() {
        let prompt = build_prompt(&[], &ToneLabel::Urgent, None, EmailType::ThankYou);
        assert!(prompt.starts_with("Write a heartfelt thank you email"));
        assert!(prompt.contains("specifics:\n\nTone: urgent"));
        assert!(prompt.ends_with(CLOSING_REQUIREMENTS));
    }

    #[test]
    fn unknown_type_key_falls_back_to_custom() {
        let key_points = points(&["Point"]);
        let fallback = build_prompt(&key_points, &ToneLabel::Professional, None, EmailType::from_key("newsletter"));
        let custom = build_prompt(&key_points, &ToneLabel::Professional, None, EmailType::Custom);
        assert_eq!(fallback, custom);
    }

    #[test]
    fn other_tone_is_kept_verbatim() {
        let tone: ToneLabel = "Apologetic".parse().unwrap();
        let prompt = build_prompt(&points(&["Late delivery"]), &tone, None, EmailType::Custom);
        assert!(prompt.contains("Tone: Apologetic"));
    }

    #[test]
    fn request_wrapper_matches_direct_call() {
        let request = EmailRequest {
            key_points: points(&["Monthly sales report attached"]),
            tone: ToneLabel::Professional,
            context: Some("End of quarter".to_string()),
            email_type: EmailType::ReportSharing,
        };
        assert_eq!(
            build_prompt_for(&request),
            build_prompt(&request.key_points, &request.tone, Some("End of quarter"), EmailType::ReportSharing)
        );
    }
}
