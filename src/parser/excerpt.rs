use std::fmt::Write as _;

use crate::parser::Span;

/// Renders the source lines around `span` with a caret line underneath the
/// spanned text.
///
/// Up to two lines of context are shown before and after the starting line.
/// Each line is prefixed with its right-aligned 1-based number and a `|`.
///
/// ```text
/// 1|{
/// 2|  hero(episode: 4 {
///                     ^
/// 3|}
/// ```
pub fn excerpt(source: &str, span: &Span) -> String {
    let lines = source
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect::<Vec<_>>();

    let (start, end) = (span.start, span.end);
    let first = start.line().saturating_sub(2).max(1);
    let last = (start.line() + 2).min(lines.len());
    if first > last {
        return String::new();
    }
    let width = last.to_string().len();

    let mut out = String::new();
    for (number, line) in (first..=last).zip(&lines[first - 1..last]) {
        if !out.is_empty() {
            out.push('\n');
        }
        _ = write!(out, "{number:>width$}|{line}");

        if number >= start.line() && number <= end.line() {
            out.push('\n');
            out.extend(std::iter::repeat_n(' ', start.column() + width));
            let carets = end.column().saturating_sub(start.column()).max(1);
            out.extend(std::iter::repeat_n('^', carets));
        }
    }
    out
}
