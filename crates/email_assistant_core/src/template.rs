//! crates/email_assistant_core/src/template.rs
//!
//! Visual templates for outgoing mail and the plain text to HTML conversion
//! used to fill them.

use regex::Regex;
use std::sync::LazyLock;

/// Styling variants available when sending an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailTemplate {
    #[default]
    Default,
    Formal,
    Newsletter,
    Meeting,
    ThankYou,
}

/// Both bodies of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub plain_text: String,
    pub html: String,
}

const PLAIN_LAYOUT: &str = "{header}\n\n{content}\n\n{footer}";

const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
  .email-container { max-width: 600px; margin: 0 auto; padding: 20px; }
  .email-header { margin-bottom: 20px; }
  .email-content { background: #fff; padding: 20px; border-radius: 5px; }
  .email-footer { margin-top: 20px; font-size: 12px; color: #666; }
</style>
</head>
<body>
  <div class="email-container">
    <div class="email-header">{header}</div>
    <div class="email-content">{content}</div>
    <div class="email-footer">{footer}</div>
  </div>
</body>
</html>"#;

const FORMAL_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  body { font-family: 'Times New Roman', serif; line-height: 1.8; color: #1a1a1a; }
  .email-container { max-width: 600px; margin: 0 auto; padding: 30px; }
  .email-header { border-bottom: 2px solid #1a1a1a; padding-bottom: 20px; margin-bottom: 30px; }
  .email-content { text-align: justify; }
  .signature { margin-top: 40px; }
</style>
</head>
<body>
  <div class="email-container">
    <div class="email-header">{header}</div>
    <div class="email-content">{content}</div>
    <div class="signature">{footer}</div>
  </div>
</body>
</html>"#;

const NEWSLETTER_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  body { font-family: 'Segoe UI', sans-serif; line-height: 1.6; color: #333; }
  .container { max-width: 600px; margin: 0 auto; padding: 20px; }
  .header { background: #2196F3; color: white; padding: 30px; text-align: center; border-radius: 5px 5px 0 0; }
  .content { background: #fff; padding: 30px; border: 1px solid #e0e0e0; }
  .footer { text-align: center; padding: 20px; font-size: 12px; color: #666; }
</style>
</head>
<body>
  <div class="container">
    <div class="header">{header}</div>
    <div class="content">{content}</div>
    <div class="footer">{footer}</div>
  </div>
</body>
</html>"#;

const MEETING_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  body { font-family: 'Calibri', sans-serif; line-height: 1.5; color: #2c3e50; }
  .container { max-width: 600px; margin: 0 auto; padding: 20px; }
  .calendar-box { background: #ecf0f1; padding: 20px; border-left: 4px solid #3498db; margin: 20px 0; }
  .details { background: #fff; padding: 20px; border: 1px solid #bdc3c7; margin-top: 20px; }
</style>
</head>
<body>
  <div class="container">
    {header}
    <div class="calendar-box">{content}</div>
    <div class="details">{footer}</div>
  </div>
</body>
</html>"#;

const THANK_YOU_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
  body { font-family: 'Georgia', serif; line-height: 1.8; color: #2c3e50; }
  .container { max-width: 600px; margin: 0 auto; padding: 30px; }
  .message { text-align: center; padding: 40px 20px; }
  .signature { margin-top: 40px; font-style: italic; }
  h2 { color: #e74c3c; }
</style>
</head>
<body>
  <div class="container">
    <div class="message">
      {header}
      <div class="content">{content}</div>
      <div class="signature">{footer}</div>
    </div>
  </div>
</body>
</html>"#;

impl EmailTemplate {
    pub const ALL: [EmailTemplate; 5] = [
        EmailTemplate::Default,
        EmailTemplate::Formal,
        EmailTemplate::Newsletter,
        EmailTemplate::Meeting,
        EmailTemplate::ThankYou,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailTemplate::Default => "default",
            EmailTemplate::Formal => "formal",
            EmailTemplate::Newsletter => "newsletter",
            EmailTemplate::Meeting => "meeting",
            EmailTemplate::ThankYou => "thank_you",
        }
    }

    /// Looks a template up by name, falling back to `Default`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    pub fn description(&self) -> &'static str {
        match self {
            EmailTemplate::Default => "Clean and simple design suitable for most emails",
            EmailTemplate::Formal => "Traditional business format with serif fonts",
            EmailTemplate::Newsletter => "Modern design with a colored header banner",
            EmailTemplate::Meeting => "Highlights meeting details in a calendar-style box",
            EmailTemplate::ThankYou => "Elegant design for expressing gratitude and appreciation",
        }
    }

    fn html_layout(&self) -> &'static str {
        match self {
            EmailTemplate::Default => DEFAULT_HTML,
            EmailTemplate::Formal => FORMAL_HTML,
            EmailTemplate::Newsletter => NEWSLETTER_HTML,
            EmailTemplate::Meeting => MEETING_HTML,
            EmailTemplate::ThankYou => THANK_YOU_HTML,
        }
    }
}

/// Substitutes `{header}`, `{content}` and `{footer}` in a single pass, so
/// placeholder-looking text inside the values is left alone.
fn fill(layout: &str, header: &str, content: &str, footer: &str) -> String {
    let mut out = String::with_capacity(layout.len() + header.len() + content.len() + footer.len());
    let mut rest = layout;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, len) = if tail.starts_with("{header}") {
            (header, "{header}".len())
        } else if tail.starts_with("{content}") {
            (content, "{content}".len())
        } else if tail.starts_with("{footer}") {
            (footer, "{footer}".len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

/// Renders both bodies from one header, content and footer. Values go into the
/// HTML layout as-is, so they must already be escaped markup.
pub fn render(template: EmailTemplate, header: &str, content: &str, footer: &str) -> RenderedEmail {
    render_parts(template, (header, content, footer), (header, content, footer))
}

fn render_parts(
    template: EmailTemplate,
    plain: (&str, &str, &str),
    html: (&str, &str, &str),
) -> RenderedEmail {
    RenderedEmail {
        plain_text: fill(PLAIN_LAYOUT, plain.0, plain.1, plain.2),
        html: fill(template.html_layout(), html.0, html.1, html.2),
    }
}

/// Renders a message the way the composer sends it: subject as header and a
/// "Sent by" footer, with the body converted to HTML for the rich part.
pub fn render_message(template: EmailTemplate, subject: &str, body: &str, sender: &str) -> RenderedEmail {
    let plain_header = format!("Subject: {}", subject);
    let plain_footer = format!("Sent by {}", sender);
    let html_header = format!("<h2>{}</h2>", escape_html(subject));
    let html_content = text_to_html(body);
    let html_footer = format!("<em>Sent by {}</em>", escape_html(sender));

    render_parts(
        template,
        (&plain_header, body, &plain_footer),
        (&html_header, &html_content, &html_footer),
    )
}

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<]+").expect("url pattern is valid"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Converts plain text to simple HTML: blank lines separate paragraphs, single
/// newlines become `<br>` and bare URLs become links.
pub fn text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|paragraph| {
            let escaped = escape_html(paragraph.trim_matches('\n'));
            let linked = URL.replace_all(&escaped, r#"<a href="$0">$0</a>"#);
            format!("<p>{}</p>", linked.replace('\n', "<br>"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_falls_back_to_default() {
        assert_eq!(EmailTemplate::from_name("holiday"), EmailTemplate::Default);
        assert_eq!(EmailTemplate::from_name("Thank_You"), EmailTemplate::ThankYou);
        assert_eq!(EmailTemplate::from_name(" meeting "), EmailTemplate::Meeting);
    }

    #[test]
    fn plain_text_layout_is_shared() {
        for template in EmailTemplate::ALL {
            let rendered = render(template, "<b>H</b>", "C", "F");
            assert_eq!(rendered.plain_text, "<b>H</b>\n\nC\n\nF");
            assert!(rendered.html.contains("<b>H</b>"));
            assert!(!rendered.html.contains("{header}"));
            assert!(!rendered.html.contains("{content}"));
            assert!(!rendered.html.contains("{footer}"));
        }
    }

    #[test]
    fn placeholders_inside_values_are_not_expanded() {
        let rendered = render(EmailTemplate::Default, "{footer}", "{content}", "end");
        assert_eq!(rendered.plain_text, "{footer}\n\n{content}\n\nend");
    }

    #[test]
    fn css_braces_survive_rendering() {
        let rendered = render(EmailTemplate::Formal, "", "", "");
        assert!(rendered.html.contains("body { font-family: 'Times New Roman', serif;"));
    }

    #[test]
    fn html_conversion_builds_paragraphs_and_links() {
        let html = text_to_html("Hi Bob,\nsee https://example.com/a?b=1&c=2\n\nThanks");
        assert_eq!(
            html,
            "<p>Hi Bob,<br>see <a href=\"https://example.com/a?b=1&amp;c=2\">https://example.com/a?b=1&amp;c=2</a></p><p>Thanks</p>"
        );
    }

    #[test]
    fn html_conversion_escapes_markup() {
        assert_eq!(text_to_html("<script>x</script>"), "<p>&lt;script&gt;x&lt;/script&gt;</p>");
    }

    #[test]
    fn message_uses_subject_and_sender() {
        let rendered = render_message(EmailTemplate::Meeting, "Q3 review", "See you Friday.", "me@example.com");
        assert_eq!(
            rendered.plain_text,
            "Subject: Q3 review\n\nSee you Friday.\n\nSent by me@example.com"
        );
        assert!(rendered.html.contains("<h2>Q3 review</h2>"));
        assert!(rendered.html.contains("<p>See you Friday.</p>"));
        assert!(rendered.html.contains("<em>Sent by me@example.com</em>"));
    }
}
