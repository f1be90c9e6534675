// Tokenizing, packing and unpacking of structural codes.
//
// Tokens are separated by `SEPARATOR` and trimmed; empty tokens vanish. A
// token of the form `<count>*<value>` is a run: `expand` yields `value`
// `count` times. A token whose count is not a non-negative integer is left
// alone and passed through as a single opaque token, so the parsers can
// decide what to do with it.
//
// Packing groups adjacent identical tokens (compared as text) into runs.
// Runs of one are written bare, and the last run is flushed without a
// trailing separator, which makes `pack` the exact inverse of `unpack` on
// anything `pack` or `render_packed` emitted.

use std::fmt::Display;
use std::iter;

/// Separates tokens in a structural code.
pub const SEPARATOR: char = ',';

/// Separates the count from the value in a packed run token.
pub const RUN_MARK: char = '*';

/// Split a code into trimmed, non-empty tokens. Runs are not expanded.
pub fn tokens(code: &str) -> impl Iterator<Item = &str> {
    code.split(SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Lazily expand every `<count>*<value>` run into `count` copies of `value`.
///
/// Nothing is allocated, so `"1000000000*1"` only costs what the
/// consumer actually pulls from the iterator.
pub fn expand(code: &str) -> impl Iterator<Item = &str> {
    tokens(code).flat_map(|token| match split_run(token) {
        Some((count, value)) => iter::repeat_n(value, count),
        None => iter::repeat_n(token, 1),
    })
}

/// Expand all runs, producing the flat comma list.
pub fn unpack(code: &str) -> String {
    expand(code).collect::<Vec<_>>().join(",")
}

/// Collapse runs of identical tokens into `<count>*<value>` form.
///
/// The input is expanded first, so packing an already packed code is a no-op.
pub fn pack(code: &str) -> String {
    write_runs(expand(code))
}

/// Number of tokens `expand` would yield, computed from the run counts
/// without expanding anything.
pub fn token_count(code: &str) -> usize {
    tokens(code)
        .map(|token| split_run(token).map_or(1, |(count, _)| count))
        .fold(0usize, usize::saturating_add)
}

/// Render values as a flat code, one token per value.
pub fn render<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render values directly in packed form. Equivalent to
/// `pack(&render(values))` without the intermediate string.
pub fn render_packed<T: Display + PartialEq>(values: &[T]) -> String {
    write_runs(values.iter())
}

fn split_run(token: &str) -> Option<(usize, &str)> {
    let (count, value) = token.split_once(RUN_MARK)?;
    let count = count.trim().parse::<usize>().ok()?;
    Some((count, value.trim()))
}

fn write_runs<T: Display + PartialEq>(items: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    let mut run: Option<(T, usize)> = None;

    for item in items {
        if let Some((value, count)) = run.as_mut()
            && *value == item
        {
            *count += 1;
            continue;
        }
        if let Some((value, count)) = run.replace((item, 1)) {
            push_run(&mut out, &value, count);
        }
    }
    // Final run, no trailing separator.
    if let Some((value, count)) = run {
        push_run(&mut out, &value, count);
    }
    out
}

fn push_run<T: Display>(out: &mut String, value: &T, count: usize) {
    if !out.is_empty() {
        out.push(SEPARATOR);
    }
    if count > 1 {
        out.push_str(&format!("{count}{RUN_MARK}{value}"));
    } else {
        out.push_str(&value.to_string());
    }
}
