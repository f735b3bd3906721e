//! Line renderer
//!
//! Expands the configured line template once per projected row. Tokens have
//! the shape `&N&` where `N` is a decimal tracked-column index. The closing
//! delimiter must immediately follow the digits, so `&1&` can never match
//! inside `&12&`.

use crate::types::{Projection, TrackedColumns};

/// A parsed line template.
///
/// Parsing never fails: anything that is not a well-formed `&digits&` run is
/// literal text, including a lone `&`, `&&`, and unterminated `&12`.
#[derive(Debug, Clone)]
pub struct LineTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    /// Placeholder for the value of a column index.
    Column(usize),
}

impl LineTemplate {
    pub fn new(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('&') {
            literal.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match parse_token(after_open) {
                Some((column, consumed)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Column(column));
                    rest = &after_open[consumed..];
                }
                None => {
                    literal.push('&');
                    rest = after_open;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Expand the template for one row. `values` is the row's projected
    /// value sequence, laid out in tracked-column order.
    fn expand(&self, values: &[String], columns: &TrackedColumns) -> String {
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Column(column) => match columns.position(*column) {
                    Some(position) => line.push_str(&values[position]),
                    // Token for an untracked column: leave it verbatim.
                    None => {
                        line.push('&');
                        line.push_str(&column.to_string());
                        line.push('&');
                    }
                },
            }
        }
        line
    }
}

/// Parse `digits&` at the start of `input`. Returns the column index and how
/// many bytes of `input` the token body consumed (digits plus closing `&`).
fn parse_token(input: &str) -> Option<(usize, usize)> {
    let digits: usize = input.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || !input[digits..].starts_with('&') {
        return None;
    }
    let column = input[..digits].parse().ok()?;
    Some((column, digits + 1))
}

/// Render one line per projected row, in ascending row-index order.
///
/// Substitution is column-index-keyed: every occurrence of a tracked
/// column's token expands to the value extracted for that column. A tracked
/// column with no token in the template is silently dropped; rendering never
/// fails.
pub fn render(
    projection: &Projection,
    template: &LineTemplate,
    columns: &TrackedColumns,
) -> Vec<String> {
    projection
        .values()
        .map(|values| template.expand(values, columns))
        .collect()
}
