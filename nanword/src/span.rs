use std::fmt::{self, Debug};
use std::ops::Range;


/// Byte range into a source text, not tied to the text itself
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq)]
pub struct FreeSpan {
    pub start: u32,
    pub end: u32,
}

impl From<Range<usize>> for FreeSpan {
    fn from(range: Range<usize>) -> Self {
        // sources past 4GiB get their spans clamped to the end
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        FreeSpan { start, end }
    }
}

impl FreeSpan {
    pub fn range(self) -> Range<usize> {
        (self.start as usize)..(self.end as usize)
    }

    /// Returns the spanned text, or an empty string if the span doesn't fit `source`
    pub fn slice(self, source: &str) -> &str {
        source.get(self.range()).unwrap_or("")
    }

    pub fn join(a: FreeSpan, b: FreeSpan) -> FreeSpan {
        FreeSpan {
            start: Ord::min(a.start, b.start),
            end: Ord::max(a.end, b.end),
        }
    }
}

impl Debug for FreeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Span")
            .field(&self.range())
            .finish()
    }
}
