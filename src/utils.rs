//! Formatting and Input Helpers
//!
//! Pure functions shared across pages: slugs, display formatting,
//! validation and markdown stripping, plus a timer-backed debounce.

use std::cell::RefCell;
use std::rc::Rc;

/// Delay before redirecting away from a page that needs auth, in milliseconds.
pub const REDIRECT_DELAY_MS: u32 = 2000;

/// URL-safe identifier derived from an event name.
///
/// Lowercases, drops punctuation, joins words with single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for ch in text.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if ch.is_whitespace() || ch == '-' {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        }
        // every other character (punctuation) is dropped
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Format a server timestamp for display, e.g. "January 5, 2026".
///
/// Accepts RFC 3339 or a bare `YYYY-MM-DD`; anything else is shown verbatim.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%B %-d, %Y").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%B %-d, %Y").to_string();
    }
    raw.to_string()
}

/// Capitalize an event mode ("online" -> "Online").
pub fn format_event_mode(mode: &str) -> String {
    let mut chars = mode.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Pluralized participant count label.
pub fn format_participants(count: u32) -> String {
    if count == 1 {
        "1 participant".to_string()
    } else {
        format!("{} participants", count)
    }
}

/// Eligibility label for an event: a class range, open-to-all, or the
/// catch-all when the server sent neither.
pub fn format_eligibility(eligibility: Option<&[u32]>, open_to_all: bool) -> String {
    if open_to_all {
        return "Open to All".to_string();
    }
    match eligibility {
        Some([min, max]) => format!("{}th - {}th", min, max),
        _ => "All Classes".to_string(),
    }
}

/// Loose email shape check: something, an @, something, a dot, something.
pub fn validate_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Phone check: at least ten digits, optional leading +, separators allowed.
pub fn validate_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = rest.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = rest
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || "-()".contains(c));
    allowed && digits >= 10
}

/// Strip common markdown syntax from a chat answer so it reads as plain text.
///
/// Fenced code blocks are removed entirely; inline code, emphasis, links,
/// images, headings, blockquotes and list markers keep their text content.
pub fn strip_markdown(md: &str) -> String {
    let mut out = String::with_capacity(md.len());
    let mut in_fence = false;
    for line in md.replace("\r\n", "\n").lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        out.push_str(&strip_inline_markdown(line));
        out.push('\n');
    }

    // Collapse runs of blank lines left behind by removed blocks
    let mut collapsed = String::with_capacity(out.len());
    let mut blank_run = 0;
    for line in out.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        collapsed.push_str(line);
        collapsed.push('\n');
    }
    collapsed.trim().to_string()
}

fn strip_inline_markdown(line: &str) -> String {
    let mut s = line.to_string();

    // Leading block syntax: headings, blockquotes, list markers
    let indent_len = s.len() - s.trim_start().len();
    let (indent, rest) = s.split_at(indent_len);
    let rest = rest.trim_start_matches('#').trim_start_matches(' ');
    let rest = rest.strip_prefix("> ").unwrap_or(rest);
    let rest = strip_list_marker(rest);
    s = format!("{}{}", indent, rest);

    // Images and links: keep the bracketed text
    s = strip_link_syntax(&s, true);
    s = strip_link_syntax(&s, false);

    // Emphasis and inline code markers
    for marker in ["**", "__", "*", "_", "`"] {
        s = s.replace(marker, "");
    }
    s
}

fn strip_list_marker(s: &str) -> &str {
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = s.strip_prefix(bullet) {
            return rest;
        }
    }
    // Numbered lists: "12. item"
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(". ") {
            return rest;
        }
    }
    s
}

/// Rewrite `[text](url)` (or `![alt](url)` when `image`) into `text`.
fn strip_link_syntax(s: &str, image: bool) -> String {
    let open = if image { "![" } else { "[" };
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(open) {
        if !image && rest[..start].ends_with('!') {
            // belongs to an image, handled in the image pass
            out.push_str(&rest[..start + 1]);
            rest = &rest[start + 1..];
            continue;
        }
        let after = &rest[start + open.len()..];
        if let Some(close) = after.find(']') {
            if after[close + 1..].starts_with('(') {
                if let Some(paren_end) = after[close + 1..].find(')') {
                    out.push_str(&rest[..start]);
                    out.push_str(&after[..close]);
                    rest = &after[close + 1 + paren_end + 1..];
                    continue;
                }
            }
        }
        out.push_str(&rest[..start + open.len()]);
        rest = &rest[start + open.len()..];
    }
    out.push_str(rest);
    out
}

/// Trailing-edge debounce: returns a handler that waits `wait_ms` of
/// inactivity before invoking `func` with the latest value.
pub fn debounce<T: 'static>(wait_ms: u32, func: impl Fn(T) + 'static) -> impl Fn(T) {
    let func = Rc::new(func);
    let pending: Rc<RefCell<Option<gloo_timers::callback::Timeout>>> =
        Rc::new(RefCell::new(None));
    move |value: T| {
        let func = func.clone();
        let timeout = gloo_timers::callback::Timeout::new(wait_ms, move || {
            func(value);
        });
        // Dropping the previous timeout cancels it
        *pending.borrow_mut() = Some(timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation_and_hyphenates() {
        assert_eq!(slugify("Build: Robots!"), "build-robots");
        assert_eq!(slugify("  Competitive   Programming  "), "competitive-programming");
        assert_eq!(slugify("DomainSquare+"), "domainsquare");
        assert_eq!(slugify("CubXL 2025"), "cubxl-2025");
    }

    #[test]
    fn eligibility_labels() {
        assert_eq!(format_eligibility(Some(&[6, 12]), false), "6th - 12th");
        assert_eq!(format_eligibility(Some(&[6, 12]), true), "Open to All");
        assert_eq!(format_eligibility(None, true), "Open to All");
        assert_eq!(format_eligibility(None, false), "All Classes");
        assert_eq!(format_eligibility(Some(&[9]), false), "All Classes");
    }

    #[test]
    fn event_mode_capitalized() {
        assert_eq!(format_event_mode("online"), "Online");
        assert_eq!(format_event_mode("HYBRID"), "Hybrid");
        assert_eq!(format_event_mode(""), "");
    }

    #[test]
    fn participants_pluralized() {
        assert_eq!(format_participants(1), "1 participant");
        assert_eq!(format_participants(4), "4 participants");
    }

    #[test]
    fn date_formats_and_falls_back() {
        assert_eq!(format_date("2025-11-08T10:30:00Z"), "November 8, 2025");
        assert_eq!(format_date("2025-01-05"), "January 5, 2025");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("student@school.edu"));
        assert!(!validate_email("student@school"));
        assert!(!validate_email("not an email"));
        assert!(!validate_email("a@b@c.com"));
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("+91 98765 43210"));
        assert!(validate_phone("(555) 123-4567 890"));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("call me maybe"));
    }

    #[test]
    fn markdown_stripped_to_plain_text() {
        assert_eq!(strip_markdown("**Registration** is _open_"), "Registration is open");
        assert_eq!(strip_markdown("See [the schedule](https://x.y/s)"), "See the schedule");
        assert_eq!(strip_markdown("![logo](/img.png) Welcome"), "logo Welcome");
        assert_eq!(strip_markdown("## Rules\n- be kind\n1. sign up"), "Rules\nbe kind\nsign up");
        assert_eq!(strip_markdown("before\n```\ncode here\n```\nafter"), "before\nafter");
        assert_eq!(strip_markdown("use `slug` here"), "use slug here");
    }
}
