// src/search/highlight.rs
use serde::Serialize;

use super::tokenize;

/// A run of text; `start..end` are byte offsets into the highlighted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub emphasized: bool,
}

impl Span {
    fn new(start: usize, end: usize, emphasized: bool) -> Self {
        Self { start, end, emphasized }
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn occurrences(text: &[(usize, char)], text_len: usize, token: &str, out: &mut Vec<(usize, usize)>) {
    let needle: Vec<char> = token.chars().collect();
    if needle.is_empty() || needle.len() > text.len() {
        return;
    }
    for i in 0..=text.len() - needle.len() {
        let hit = needle
            .iter()
            .zip(&text[i..i + needle.len()])
            .all(|(&n, &(_, c))| same_letter(c, n));
        if hit {
            let end = text.get(i + needle.len()).map(|&(pos, _)| pos).unwrap_or(text_len);
            out.push((text[i].0, end));
        }
    }
}

/// Ranges are merged only when they overlap; touching ranges stay apart.
fn merge(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        if let Some(current) = merged.last_mut() {
            if start < current.1 {
                current.1 = current.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Splits `text` into alternating plain and emphasized runs for every
/// case-insensitive occurrence of a query token.
pub fn highlight(text: &str, query: &str) -> Vec<Span> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return vec![Span::new(0, text.len(), false)];
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ranges = Vec::new();
    for token in tokens {
        occurrences(&chars, text.len(), token, &mut ranges);
    }

    let mut spans = Vec::new();
    let mut last_end = 0;
    for (start, end) in merge(ranges) {
        if start > last_end {
            spans.push(Span::new(last_end, start, false));
        }
        spans.push(Span::new(start, end, true));
        last_end = end;
    }
    if last_end < text.len() || spans.is_empty() {
        spans.push(Span::new(last_end, text.len(), false));
    }
    spans
}
