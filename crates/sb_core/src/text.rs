//! Rich text with legacy section-sign formatting codes.
//!
//! The machine-readable form is a plain string where `§` followed by a code
//! character switches color (`0-9`, `a-f`), toggles a decoration
//! (`k`, `l`, `m`, `n`, `o`) or resets all formatting (`r`).

use bitflags::bitflags;

/// Prefix character of every formatting code.
pub const FORMAT_CHAR: char = '§';

/// The sixteen named text colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl TextColor {
    pub fn all() -> &'static [TextColor] {
        &[
            Self::Black,
            Self::DarkBlue,
            Self::DarkGreen,
            Self::DarkAqua,
            Self::DarkRed,
            Self::DarkPurple,
            Self::Gold,
            Self::Gray,
            Self::DarkGray,
            Self::Blue,
            Self::Green,
            Self::Aqua,
            Self::Red,
            Self::LightPurple,
            Self::Yellow,
            Self::White,
        ]
    }

    /// Formatting code character for this color.
    pub fn code(&self) -> char {
        let index = Self::all().iter().position(|c| c == self).unwrap_or(15);
        char::from_digit(index as u32, 16).unwrap_or('f')
    }

    pub fn from_code(code: char) -> Option<TextColor> {
        let index = code.to_ascii_lowercase().to_digit(16)?;
        Self::all().get(index as usize).copied()
    }

    /// The code sequence (`§` + code) selecting this color.
    pub fn prefix(&self) -> String {
        format!("{}{}", FORMAT_CHAR, self.code())
    }
}

bitflags! {
    /// Text decorations that can be switched on by a formatting code.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Decorations: u8 {
        const OBFUSCATED = 0b0000_0001;
        const BOLD = 0b0000_0010;
        const STRIKETHROUGH = 0b0000_0100;
        const UNDERLINED = 0b0000_1000;
        const ITALIC = 0b0001_0000;
    }
}

impl Decorations {
    fn from_code(code: char) -> Option<Decorations> {
        match code.to_ascii_lowercase() {
            'k' => Some(Self::OBFUSCATED),
            'l' => Some(Self::BOLD),
            'm' => Some(Self::STRIKETHROUGH),
            'n' => Some(Self::UNDERLINED),
            'o' => Some(Self::ITALIC),
            _ => None,
        }
    }

    fn codes(&self) -> String {
        [
            (Self::OBFUSCATED, 'k'),
            (Self::BOLD, 'l'),
            (Self::STRIKETHROUGH, 'm'),
            (Self::UNDERLINED, 'n'),
            (Self::ITALIC, 'o'),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, code)| format!("{}{}", FORMAT_CHAR, code))
        .collect()
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextSpan {
    pub text: String,
    pub color: Option<TextColor>,
    pub decorations: Decorations,
    /// Explicitly disables the italics a display surface would otherwise apply.
    pub no_italic: bool,
}

/// Styled text made of consecutive spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichText {
    pub spans: Vec<TextSpan>,
}

impl RichText {
    /// Single unstyled span.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            spans: vec![TextSpan {
                text: text.into(),
                ..Default::default()
            }],
        }
    }

    /// Single colored span with italics suppressed.
    pub fn colored(text: impl Into<String>, color: TextColor) -> Self {
        Self {
            spans: vec![TextSpan {
                text: text.into(),
                color: Some(color),
                decorations: Decorations::empty(),
                no_italic: true,
            }],
        }
    }

    /// Parse the machine-readable legacy-code form.
    ///
    /// Unknown codes are dropped along with their `§`; a trailing lone `§`
    /// is dropped as well.
    pub fn parse(source: &str) -> Self {
        let mut spans = Vec::new();
        let mut current = TextSpan::default();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != FORMAT_CHAR {
                current.text.push(c);
                continue;
            }
            let Some(code) = chars.next() else { break };

            let mut next = TextSpan::default();
            if let Some(color) = TextColor::from_code(code) {
                next.color = Some(color);
            } else if let Some(decoration) = Decorations::from_code(code) {
                next.color = current.color;
                next.decorations = current.decorations | decoration;
            } else if code.to_ascii_lowercase() != 'r' {
                continue;
            }

            if current.text.is_empty() {
                current = next;
            } else {
                spans.push(std::mem::replace(&mut current, next));
            }
        }

        if !current.text.is_empty() {
            spans.push(current);
        }
        Self { spans }
    }

    /// Text with every formatting code removed.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Serialize back to the legacy-code form.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        let mut styled = false;
        for span in &self.spans {
            match span.color {
                Some(color) => out.push_str(&color.prefix()),
                None if styled || !span.decorations.is_empty() => {
                    out.push(FORMAT_CHAR);
                    out.push('r');
                }
                None => {}
            }
            out.push_str(&span.decorations.codes());
            out.push_str(&span.text);
            styled = span.color.is_some() || !span.decorations.is_empty();
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// Remove every `§x` formatting pair from `text`.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == FORMAT_CHAR {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Colors readable on a dark tooltip background, used by [`hash_color`].
const HASH_PALETTE: &[TextColor] = &[
    TextColor::DarkGreen,
    TextColor::DarkAqua,
    TextColor::DarkRed,
    TextColor::DarkPurple,
    TextColor::Gold,
    TextColor::Gray,
    TextColor::Blue,
    TextColor::Green,
    TextColor::Aqua,
    TextColor::Red,
    TextColor::LightPurple,
    TextColor::Yellow,
];

/// Prefix `text` with a color chosen deterministically from its content.
pub fn hash_color(text: &str) -> String {
    let hash = text
        .chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
        .wrapping_mul(2654435761);
    let color = HASH_PALETTE[(hash >> 16) as usize % HASH_PALETTE.len()];
    format!("{}{}", color.prefix(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_spans_on_codes() {
        let text = RichText::parse("§cGrave §lKeeper§r!");
        assert_eq!(text.spans.len(), 3);
        assert_eq!(text.spans[0].color, Some(TextColor::Red));
        assert_eq!(text.spans[1].decorations, Decorations::BOLD);
        assert_eq!(text.spans[1].color, Some(TextColor::Red));
        assert_eq!(text.spans[2].color, None);
        assert_eq!(text.plain(), "Grave Keeper!");
    }

    #[test]
    fn legacy_form_round_trips() {
        for source in ["§cGrave §lKeeper§r!", "plain", "§6§oGilded", ""] {
            let once = RichText::parse(source).to_legacy();
            assert_eq!(RichText::parse(&once).to_legacy(), once);
            assert_eq!(RichText::parse(&once).plain(), strip_formatting(source));
        }
    }

    #[test]
    fn formatting_only_names_are_empty() {
        assert!(RichText::parse("§c§l§r").is_empty());
        assert_eq!(strip_formatting("§c§l§r"), "");
    }

    #[test]
    fn colors_map_to_codes() {
        assert_eq!(TextColor::Red.code(), 'c');
        assert_eq!(TextColor::Gold.code(), '6');
        assert_eq!(TextColor::White.prefix(), "§f");
        assert_eq!(TextColor::from_code('A'), Some(TextColor::Green));
        for color in TextColor::all() {
            assert_eq!(TextColor::from_code(color.code()), Some(*color));
        }
    }

    #[test]
    fn hash_color_is_deterministic_and_invisible() {
        let a = hash_color("Sunken Temple");
        assert_eq!(a, hash_color("Sunken Temple"));
        assert_eq!(strip_formatting(&a), "Sunken Temple");
        assert!(a.starts_with(FORMAT_CHAR));
    }
}
