//! Line categorization for delta content.
//!
//! Every line falls into exactly one category, checked in priority order:
//! documentation, import, annotation, blank, then substantive. Counts are
//! immutable values combined with `+` (commit totals) and `max` (the two
//! sides of a changed block).

use std::iter::Sum;
use std::ops::Add;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::diff::{Delta, DeltaKind};

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z]+").expect("annotation pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCategory {
    Documentation,
    Import,
    Annotation,
    Blank,
    Substantive,
}

impl LineCategory {
    pub const ALL: [LineCategory; 5] = [
        LineCategory::Documentation,
        LineCategory::Import,
        LineCategory::Annotation,
        LineCategory::Blank,
        LineCategory::Substantive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LineCategory::Documentation => "doc",
            LineCategory::Import => "import",
            LineCategory::Annotation => "annotation",
            LineCategory::Blank => "blank",
            LineCategory::Substantive => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub documentation: usize,
    pub import: usize,
    pub annotation: usize,
    pub blank: usize,
    pub substantive: usize,
}

impl CategoryCounts {
    pub fn single(category: LineCategory) -> Self {
        let mut counts = Self::default();
        *counts.slot(category) = 1;
        counts
    }

    pub fn get(&self, category: LineCategory) -> usize {
        match category {
            LineCategory::Documentation => self.documentation,
            LineCategory::Import => self.import,
            LineCategory::Annotation => self.annotation,
            LineCategory::Blank => self.blank,
            LineCategory::Substantive => self.substantive,
        }
    }

    fn slot(&mut self, category: LineCategory) -> &mut usize {
        match category {
            LineCategory::Documentation => &mut self.documentation,
            LineCategory::Import => &mut self.import,
            LineCategory::Annotation => &mut self.annotation,
            LineCategory::Blank => &mut self.blank,
            LineCategory::Substantive => &mut self.substantive,
        }
    }

    /// Per-category maximum of two count vectors.
    pub fn max(self, other: Self) -> Self {
        Self {
            documentation: self.documentation.max(other.documentation),
            import: self.import.max(other.import),
            annotation: self.annotation.max(other.annotation),
            blank: self.blank.max(other.blank),
            substantive: self.substantive.max(other.substantive),
        }
    }

    pub fn total(&self) -> usize {
        LineCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn is_trivial(&self) -> bool {
        self.substantive == 0
    }
}

impl Add for CategoryCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            documentation: self.documentation + other.documentation,
            import: self.import + other.import,
            annotation: self.annotation + other.annotation,
            blank: self.blank + other.blank,
            substantive: self.substantive + other.substantive,
        }
    }
}

impl Sum for CategoryCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Line matching rules. The import keywords stand in for the language's
/// import/include/use statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRules {
    pub import_keywords: Vec<String>,
}

impl Default for LineRules {
    fn default() -> Self {
        Self {
            import_keywords: vec!["import".to_string()],
        }
    }
}

impl LineRules {
    pub fn with_import_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            import_keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classify_line(&self, line: &str) -> LineCategory {
        if line.contains('*') || line.contains("//") {
            LineCategory::Documentation
        } else if self.import_keywords.iter().any(|k| !k.is_empty() && line.contains(k.as_str())) {
            LineCategory::Import
        } else if ANNOTATION.is_match(line) {
            LineCategory::Annotation
        } else if line.is_empty() {
            LineCategory::Blank
        } else {
            LineCategory::Substantive
        }
    }

    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> CategoryCounts {
        lines
            .iter()
            .map(|line| CategoryCounts::single(self.classify_line(line.as_ref())))
            .sum()
    }

    /// A changed block counts the larger side per category, so it is
    /// substantive when either side holds a substantive line.
    pub fn classify_delta(&self, delta: &Delta) -> CategoryCounts {
        match delta.kind {
            DeltaKind::Insert => self.classify(&delta.target.lines),
            DeltaKind::Delete => self.classify(&delta.source.lines),
            DeltaKind::Change => self
                .classify(&delta.source.lines)
                .max(self.classify(&delta.target.lines)),
        }
    }

    pub fn classify_deltas(&self, deltas: &[Delta]) -> CategoryCounts {
        deltas.iter().map(|d| self.classify_delta(d)).sum()
    }
}
