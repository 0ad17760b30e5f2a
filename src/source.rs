use std::fmt::{Debug, Display, Formatter};

/// A 1-based line/column position in the input text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Debug for SourcePos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourcePos({}:{})", self.line, self.column)
    }
}

/// A region of the input, from the start of the first token to the end of
/// the last one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    pub start: SourcePos,
    pub end: SourcePos,
}

impl SourceSpan {
    pub fn new(start: SourcePos, end: SourcePos) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `pos`.
    pub fn point(pos: SourcePos) -> Self {
        Self { start: pos, end: pos }
    }

    /// The span covering `self` through `other`.
    pub fn to(self, other: SourceSpan) -> SourceSpan {
        SourceSpan {
            start: self.start,
            end: other.end,
        }
    }
}

impl Debug for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceSpan({}..{})", self.start, self.end)
    }
}
