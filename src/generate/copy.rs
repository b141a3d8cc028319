//! Title and description copy.

use serde::{Deserialize, Serialize};

pub const COPY_SYSTEM_PROMPT: &str = "You are a brand copywriter. Generate concise, professional marketing copy.\nFor titles: 3-6 words, punchy, memorable.\nFor descriptions: 1-2 sentences, compelling, under 100 characters.\nWhen asked for both, reply with exactly two lines: first line \"Title: <title>\", second line \"Description: <description>\".";

pub const DEFAULT_CONTEXT: &str = "hero visual for a tech or product brand";

pub const FALLBACK_TITLE: &str = "Your Brand Story";
pub const FALLBACK_DESCRIPTION: &str = "Discover how we help businesses grow with innovative solutions.";

/// Max tokens requested for copy.
pub const COPY_MAX_TOKENS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyKind {
    Title,
    Description,
    #[default]
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedCopy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// User prompt for `kind`; blank context falls back to a generic brand context.
pub fn copy_prompt(kind: CopyKind, context: &str) -> String {
    let context = match context.trim() {
        "" => DEFAULT_CONTEXT,
        c => c,
    };
    match kind {
        CopyKind::Both => format!("Based on this context, generate a title and description:\n\n{}", context),
        CopyKind::Title => format!("Generate a short title (3-6 words) for:\n\n{}", context),
        CopyKind::Description => format!("Generate a short description (1-2 sentences) for:\n\n{}", context),
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| line[label.len()..].trim())
}

/// Split a model reply into title and description.
///
/// For [`CopyKind::Both`], `Title:` / `Description:` labels are honoured;
/// unlabeled replies use the first line as title and the rest as description.
pub fn parse_copy(content: &str, kind: CopyKind) -> GeneratedCopy {
    let content = content.trim();
    match kind {
        CopyKind::Title => GeneratedCopy {
            title: Some(content.to_string()),
            description: None,
        },
        CopyKind::Description => GeneratedCopy {
            title: None,
            description: Some(content.to_string()),
        },
        CopyKind::Both => {
            let lines: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            let mut title = String::new();
            let mut description = String::new();
            for line in &lines {
                if let Some(rest) = strip_label(line, "title:") {
                    title = rest.to_string();
                } else if let Some(rest) = strip_label(line, "description:") {
                    description = rest.to_string();
                } else if title.is_empty() {
                    title = line.to_string();
                } else if description.is_empty() {
                    description = line.to_string();
                }
            }
            if description.is_empty() && lines.len() >= 2 {
                title = lines[0].to_string();
                description = lines[1..].join(" ");
            }
            GeneratedCopy {
                title: Some(title).filter(|t| !t.is_empty()),
                description: Some(description).filter(|d| !d.is_empty()),
            }
        }
    }
}

/// Built-in copy used when no provider answers.
pub fn fallback_copy(kind: CopyKind) -> GeneratedCopy {
    GeneratedCopy {
        title: matches!(kind, CopyKind::Title | CopyKind::Both).then(|| FALLBACK_TITLE.to_string()),
        description: matches!(kind, CopyKind::Description | CopyKind::Both)
            .then(|| FALLBACK_DESCRIPTION.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_labeled() {
        let copy = parse_copy("Title: Ship Faster\nDescription: Automate the boring parts.", CopyKind::Both);
        assert_eq!(copy.title.as_deref(), Some("Ship Faster"));
        assert_eq!(copy.description.as_deref(), Some("Automate the boring parts."));
    }

    #[test]
    fn test_parse_unlabeled() {
        let copy = parse_copy("Ship Faster\nAutomate the boring parts.", CopyKind::Both);
        assert_eq!(copy.title.as_deref(), Some("Ship Faster"));
        assert_eq!(copy.description.as_deref(), Some("Automate the boring parts."));
    }

    #[test]
    fn test_parse_single_kind() {
        let copy = parse_copy("  Only a title  ", CopyKind::Title);
        assert_eq!(copy.title.as_deref(), Some("Only a title"));
        assert!(copy.description.is_none());
    }

    #[test]
    fn test_fallback_copy() {
        assert_eq!(fallback_copy(CopyKind::Title).description, None);
        let both = fallback_copy(CopyKind::Both);
        assert_eq!(both.title.as_deref(), Some(FALLBACK_TITLE));
        assert_eq!(both.description.as_deref(), Some(FALLBACK_DESCRIPTION));
    }

    #[test]
    fn test_blank_context_uses_default() {
        assert!(copy_prompt(CopyKind::Title, "  ").ends_with(DEFAULT_CONTEXT));
    }
}
