//! Structural roles of sections

use serde::{Deserialize, Serialize};

/// Structural role of a section (AsciiDoc section style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    /// Regular chapter or section
    #[default]
    Chapter,
    /// Book part (level 0 section)
    Part,
    Preface,
    Appendix,
    Bibliography,
    Glossary,
    Index,
    Colophon,
    Dedication,
    Acknowledgments,
}

impl SectionRole {
    /// Whether the role is a special section with its own `epub:type`
    pub fn is_special(self) -> bool {
        !matches!(self, SectionRole::Chapter)
    }

    /// EPUB structural semantic for this role
    pub fn epub_type(self) -> &'static str {
        match self {
            SectionRole::Chapter => "chapter",
            SectionRole::Part => "part",
            SectionRole::Preface => "preface",
            SectionRole::Appendix => "appendix",
            SectionRole::Bibliography => "bibliography",
            SectionRole::Glossary => "glossary",
            SectionRole::Index => "index",
            SectionRole::Colophon => "colophon",
            SectionRole::Dedication => "dedication",
            SectionRole::Acknowledgments => "acknowledgments",
        }
    }

    /// Whether sections with this role are listed in the landmarks nav
    pub fn is_landmark(self) -> bool {
        matches!(
            self,
            SectionRole::Appendix
                | SectionRole::Bibliography
                | SectionRole::Glossary
                | SectionRole::Index
                | SectionRole::Preface
        )
    }
}
