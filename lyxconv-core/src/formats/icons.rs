//! Icon mapping for tree views
//!
//! One Unicode character per container kind, so tree output can be scanned
//! quickly.

use crate::container::ContainerKind;

/// Icon for a container kind.
pub fn get_icon(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Text => "↵",
        ContainerKind::BlackBox => "▪",
        ContainerKind::Header => "⧉",
        ContainerKind::Footer => "⊥",
        ContainerKind::Layout => "☰",
        ContainerKind::Paragraph => "¶",
        ContainerKind::PlainLayout => "◦",
        ContainerKind::Heading => "§",
        ContainerKind::Title => "⊤",
        ContainerKind::Author => "@",
        ContainerKind::BibEntry => "†",
        ContainerKind::Inset => "▫",
        ContainerKind::Formula => "√",
        ContainerKind::Label => "#",
        ContainerKind::Reference => "⊕",
        ContainerKind::Citation => "“",
        ContainerKind::BibItem => "◫",
        ContainerKind::Footnote => "³",
        ContainerKind::Note => "✎",
        ContainerKind::Newline => "⏎",
        ContainerKind::Branch => "⑂",
        ContainerKind::TextStyle => "𝐼",
        ContainerKind::Table => "▦",
        ContainerKind::Row => "═",
        ContainerKind::Cell => "□",
        ContainerKind::Composite => "⊞",
    }
}

/// Icon for parameter lines shown in full tree views.
pub const PARAMETER_ICON: &str = "⚙";
