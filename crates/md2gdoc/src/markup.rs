use std::fmt;
use std::str::FromStr;

use crate::operation::StyleSpec;

pub const CHECKBOX_GLYPH: char = '\u{2610}';
pub const BULLET_GLYPH: char = '\u{2022}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn font_size(self) -> u32 {
        match self {
            HeadingLevel::One => 18,
            HeadingLevel::Two => 16,
            HeadingLevel::Three => 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Heading(HeadingLevel),
    Checkbox,
    Bullet,
    PlainText,
    Blank,
}

impl MarkupKind {
    /// Style applied over the inserted text, if any. Only headings are styled.
    pub fn style(self) -> Option<StyleSpec> {
        match self {
            MarkupKind::Heading(level) => Some(StyleSpec {
                bold: true,
                font_size: Some(level.font_size()),
            }),
            _ => None,
        }
    }
}

/// How the remainder of a task-list line is sliced off its `- [ ]` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckboxSlicing {
    /// Match `- [ ]` and drop six characters, so the character right after the
    /// marker is always discarded whatever it is.
    #[default]
    Preserve,
    /// Match `- [ ] ` and drop exactly that. `- [ ]x` is then a bullet.
    Exact,
}

impl CheckboxSlicing {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckboxSlicing::Preserve => "preserve",
            CheckboxSlicing::Exact => "exact",
        }
    }
}

impl fmt::Display for CheckboxSlicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckboxSlicing {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "preserve" => Ok(CheckboxSlicing::Preserve),
            "exact" => Ok(CheckboxSlicing::Exact),
            _ => Err(()),
        }
    }
}

/// A line after classification, carrying the text that will be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: MarkupKind,
    pub display: String,
}

impl Classified {
    fn new(kind: MarkupKind, display: impl Into<String>) -> Self {
        Self {
            kind,
            display: display.into(),
        }
    }

    fn blank() -> Self {
        Self::new(MarkupKind::Blank, String::new())
    }

    pub fn is_blank(&self) -> bool {
        self.kind == MarkupKind::Blank
    }
}

type Rule = fn(&str, CheckboxSlicing) -> Option<Classified>;

// Most specific first: `### ` before `## ` before `# `, checkbox before bullet.
const RULES: &[Rule] = &[heading_three, heading_two, heading_one, checkbox, bullet];

/// Classifies a single line. Prefix checks run on the untrimmed line; only the
/// plain-text fallback trims.
pub fn classify_line(line: &str, slicing: CheckboxSlicing) -> Classified {
    RULES
        .iter()
        .find_map(|rule| rule(line, slicing))
        .unwrap_or_else(|| plain_or_blank(line))
}

fn heading(line: &str, marker: &str, level: HeadingLevel) -> Option<Classified> {
    line.strip_prefix(marker)
        .map(|rest| Classified::new(MarkupKind::Heading(level), rest))
}

fn heading_three(line: &str, _: CheckboxSlicing) -> Option<Classified> {
    heading(line, "### ", HeadingLevel::Three)
}

fn heading_two(line: &str, _: CheckboxSlicing) -> Option<Classified> {
    heading(line, "## ", HeadingLevel::Two)
}

fn heading_one(line: &str, _: CheckboxSlicing) -> Option<Classified> {
    heading(line, "# ", HeadingLevel::One)
}

fn checkbox(line: &str, slicing: CheckboxSlicing) -> Option<Classified> {
    let rest = match slicing {
        CheckboxSlicing::Preserve => {
            let mut chars = line.strip_prefix("- [ ]")?.chars();
            chars.next();
            chars.as_str()
        }
        CheckboxSlicing::Exact => line.strip_prefix("- [ ] ")?,
    };

    Some(Classified::new(
        MarkupKind::Checkbox,
        format!("{CHECKBOX_GLYPH} {rest}"),
    ))
}

fn bullet(line: &str, _: CheckboxSlicing) -> Option<Classified> {
    let rest = line.strip_prefix("- ")?;
    Some(Classified::new(
        MarkupKind::Bullet,
        format!("{BULLET_GLYPH} {rest}"),
    ))
}

fn plain_or_blank(line: &str) -> Classified {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Classified::blank()
    } else {
        Classified::new(MarkupKind::PlainText, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> MarkupKind {
        classify_line(line, CheckboxSlicing::Preserve).kind
    }

    #[test]
    fn distinguishes_heading_levels() {
        assert_eq!(kind("# One"), MarkupKind::Heading(HeadingLevel::One));
        assert_eq!(kind("## Two"), MarkupKind::Heading(HeadingLevel::Two));
        assert_eq!(kind("### Three"), MarkupKind::Heading(HeadingLevel::Three));
        assert_eq!(kind("#### Four"), MarkupKind::PlainText);
        assert_eq!(kind("#NoSpace"), MarkupKind::PlainText);
    }

    #[test]
    fn heading_text_is_not_trimmed() {
        let parsed = classify_line("##  Spaced ", CheckboxSlicing::Preserve);
        assert_eq!(parsed.display, " Spaced ");
    }

    #[test]
    fn checkbox_wins_over_bullet() {
        let parsed = classify_line("- [ ] ship it", CheckboxSlicing::Preserve);
        assert_eq!(parsed.kind, MarkupKind::Checkbox);
        assert_eq!(parsed.display, "\u{2610} ship it");
    }

    #[test]
    fn preserve_drops_character_after_marker() {
        let parsed = classify_line("- [ ]xship", CheckboxSlicing::Preserve);
        assert_eq!(parsed.kind, MarkupKind::Checkbox);
        assert_eq!(parsed.display, "\u{2610} ship");

        let bare = classify_line("- [ ]", CheckboxSlicing::Preserve);
        assert_eq!(bare.display, "\u{2610} ");
    }

    #[test]
    fn preserve_drops_a_whole_multibyte_character() {
        let parsed = classify_line("- [ ]\u{00e9}t\u{00e9}", CheckboxSlicing::Preserve);
        assert_eq!(parsed.display, "\u{2610} t\u{00e9}");
    }

    #[test]
    fn exact_requires_the_separating_space() {
        let parsed = classify_line("- [ ]xship", CheckboxSlicing::Exact);
        assert_eq!(parsed.kind, MarkupKind::Bullet);
        assert_eq!(parsed.display, "\u{2022} [ ]xship");

        let spaced = classify_line("- [ ] ship", CheckboxSlicing::Exact);
        assert_eq!(spaced.display, "\u{2610} ship");
    }

    #[test]
    fn indented_and_star_bullets_fall_through_to_plain_text() {
        let nested = classify_line("  - nested", CheckboxSlicing::Preserve);
        assert_eq!(nested.kind, MarkupKind::PlainText);
        assert_eq!(nested.display, "- nested");

        let star = classify_line("* Completed Features", CheckboxSlicing::Preserve);
        assert_eq!(star.kind, MarkupKind::PlainText);
        assert_eq!(star.display, "* Completed Features");
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(classify_line("   \t", CheckboxSlicing::Preserve).is_blank());
        assert!(classify_line("", CheckboxSlicing::Exact).is_blank());
    }

    #[test]
    fn only_headings_carry_style() {
        let style = MarkupKind::Heading(HeadingLevel::Two).style().unwrap();
        assert!(style.bold);
        assert_eq!(style.font_size, Some(16));
        assert!(MarkupKind::Bullet.style().is_none());
        assert!(MarkupKind::PlainText.style().is_none());
    }
}
