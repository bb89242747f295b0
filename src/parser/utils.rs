use std::fmt;

/// A location in a GraphQL source text.
///
/// `line` and `col` count from one, `index` is the zero-based byte offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
pub struct SourcePosition {
    index: usize,
    line: usize,
    col: usize,
}

/// Half-open range `start..end` of a source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// First position covered.
    pub start: SourcePosition,

    /// First position past the covered text.
    pub end: SourcePosition,
}

impl Span {
    #[doc(hidden)]
    #[inline]
    pub fn zero_width(pos: SourcePosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn single_width(start: SourcePosition) -> Self {
        let mut end = start;
        end.advance_char(' ');
        Self { start, end }
    }

    /// A [`Span`] for nodes synthesized by the engine rather than parsed.
    #[inline]
    pub fn unlocated() -> Self {
        Self::zero_width(SourcePosition::new_origin())
    }

    /// Cuts the covered text out of `source`, or an empty string when the
    /// [`Span`] lies outside of it.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.index..self.end.index).unwrap_or_default()
    }
}

/// An AST node or token together with where it was written.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Spanning<T, Sp = Span> {
    /// The node itself.
    pub item: T,

    /// Where `item` was written.
    pub span: Sp,
}

impl<T> Spanning<T, Span> {
    #[doc(hidden)]
    pub fn new(span: Span, item: T) -> Self {
        Self { item, span }
    }

    #[doc(hidden)]
    pub fn zero_width(&pos: &SourcePosition, item: T) -> Spanning<T> {
        Self::new(Span::zero_width(pos), item)
    }

    #[doc(hidden)]
    pub fn single_width(&pos: &SourcePosition, item: T) -> Spanning<T> {
        Self::new(Span::single_width(pos), item)
    }

    #[doc(hidden)]
    pub fn start_end(&start: &SourcePosition, &end: &SourcePosition, item: T) -> Spanning<T> {
        Self::new(Span { start, end }, item)
    }

    #[doc(hidden)]
    pub fn unlocated(item: T) -> Spanning<T> {
        Self::new(Span::unlocated(), item)
    }

    /// Position right after `item`.
    #[inline]
    pub fn end(&self) -> SourcePosition {
        self.span.end
    }

    /// Replaces `item` with `f(item)`, keeping the [`Span`].
    pub fn map<O, F: FnOnce(T) -> O>(self, f: F) -> Spanning<O> {
        Spanning::new(self.span, f(self.item))
    }
}

impl<T: fmt::Display> fmt::Display for Spanning<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}. At {}", self.item, self.span.start)
    }
}

impl<T: std::error::Error> std::error::Error for Spanning<T> {}

impl SourcePosition {
    #[doc(hidden)]
    pub fn new(index: usize, line: usize, col: usize) -> SourcePosition {
        assert!(line >= 1 && col >= 1);

        SourcePosition { index, line, col }
    }

    #[doc(hidden)]
    pub fn new_origin() -> SourcePosition {
        SourcePosition::new(0, 1, 1)
    }

    /// Steps over `ch` without leaving the line.
    #[doc(hidden)]
    pub fn advance_char(&mut self, ch: char) {
        self.index += ch.len_utf8();
        self.col += 1;
    }

    /// Steps over a line terminator spelled with `len` bytes.
    #[doc(hidden)]
    pub fn advance_line(&mut self, len: usize) {
        self.index += len;
        self.line += 1;
        self.col = 1;
    }

    /// Byte offset into the source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line number, starting at one.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column number in characters, starting at one.
    pub fn column(&self) -> usize {
        self.col
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
