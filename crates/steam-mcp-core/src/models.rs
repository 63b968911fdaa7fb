//! Data models for guide retrieval.
//!
//! A [`Document`] is an ordered list of [`Section`]s. A section's position in
//! that list is its only identity: the same ordering is used when the
//! sections are embedded, indexed, and mapped back from index hits.

use serde::Serialize;

/// Separator placed between section texts in the full-document rendering.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Separator placed between ranked entries in the search rendering.
pub const RESULT_SEPARATOR: &str = "\n\n---\n\n";

/// A titled chunk of a guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: Option<String>,
    pub body: String,
}

impl Section {
    pub fn new(title: Option<String>, body: impl Into<String>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// The section as it is embedded and returned: the title line, if any,
    /// followed by the body.
    pub fn text(&self) -> String {
        match &self.title {
            Some(title) => format!("{}\n{}", title, self.body),
            None => self.body.clone(),
        }
    }
}

/// An ordered sequence of sections extracted from one guide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section texts in document order.
    pub fn section_texts(&self) -> Vec<String> {
        self.sections.iter().map(Section::text).collect()
    }

    /// All section texts joined by [`SECTION_SEPARATOR`].
    ///
    /// This is both the text returned on the full-document path and the
    /// text whose character count is compared against the size threshold.
    ///
    /// ```rust
    /// use steam_mcp_core::models::{Document, Section};
    ///
    /// let doc = Document::new(vec![
    ///     Section::new(Some("Intro".to_string()), "Welcome."),
    ///     Section::new(None, "No title here."),
    /// ]);
    /// assert_eq!(doc.full_text(), "Intro\nWelcome.\n\nNo title here.");
    /// ```
    pub fn full_text(&self) -> String {
        self.section_texts().join(SECTION_SEPARATOR)
    }
}

/// One search hit: a section and its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSection {
    /// Position of the section in the source document.
    pub index: usize,
    pub section: Section,
    /// Squared Euclidean distance to the query embedding (lower is closer).
    pub distance: f32,
}

/// Outcome of a retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "content", rename_all = "snake_case")]
pub enum Retrieval {
    /// The document was small enough to return whole.
    Full(String),
    /// Nearest sections, ordered by ascending distance.
    Ranked(Vec<RankedSection>),
}

impl Retrieval {
    /// Render the result as the text handed back to tool callers.
    pub fn render(&self) -> String {
        match self {
            Retrieval::Full(text) => text.clone(),
            Retrieval::Ranked(hits) => hits
                .iter()
                .map(|hit| format!("[Score: {:.2}]\n{}", hit.distance, hit.section.text()))
                .collect::<Vec<_>>()
                .join(RESULT_SEPARATOR),
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Retrieval::Full(_))
    }
}
