//! `{}` placeholder substitution for parameterized log calls.
//!
//! Placeholders are filled left to right. Substitution stops as soon as the
//! arguments run out; whatever is left of the template is kept verbatim. A
//! placeholder preceded by a backslash (`\{}`) is literal text, while a
//! doubled backslash (`\\{}`) yields one backslash followed by a real
//! placeholder.
//!
//! When the last argument is an error that no placeholder consumes, it is
//! split off as the error context of the call instead of being substituted.

use crate::message::Param;
use std::error::Error;
use std::fmt::Write;

pub const DELIM: &str = "{}";
const ESCAPE: char = '\\';

/// A formatted template together with the error split off its arguments.
pub struct Formatted<'a> {
    pub text: String,
    pub error: Option<&'a (dyn Error + 'static)>,
}

/// Number of placeholders in `template` that would take an argument.
pub fn count_placeholders(template: &str) -> usize {
    let mut count = 0;
    let mut rest = template;
    while let Some(j) = rest.find(DELIM) {
        let before = &rest[..j];
        if !is_escaped(before) || is_double_escaped(before) {
            count += 1;
        }
        rest = &rest[j + DELIM.len()..];
    }
    count
}

/// How many of `args` are substituted, the rest being a trailing error.
pub fn substitution_count(template: &str, args: &[Param]) -> usize {
    match args.last() {
        Some(last) if last.as_error().is_some() && count_placeholders(template) < args.len() => {
            args.len() - 1
        }
        _ => args.len(),
    }
}

/// Substitute `args` into `template` and split off a trailing error.
pub fn format<'a>(template: &str, args: &'a [Param]) -> Formatted<'a> {
    let used = substitution_count(template, args);
    Formatted {
        text: substitute(template, &args[..used]),
        error: if used < args.len() {
            args.last().and_then(Param::as_error)
        } else {
            None
        },
    }
}

/// Substitute every one of `args` into `template`, without looking for a
/// trailing error.
pub fn substitute(template: &str, args: &[Param]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut args = args.iter();
    let mut rest = template;
    loop {
        let j = match rest.find(DELIM) {
            Some(j) => j,
            None => break,
        };
        let before = &rest[..j];
        if is_escaped(before) && !is_double_escaped(before) {
            out.push_str(&before[..before.len() - 1]);
            out.push_str(DELIM);
            rest = &rest[j + DELIM.len()..];
            continue;
        }
        let arg = match args.next() {
            Some(arg) => arg,
            None => break,
        };
        if is_double_escaped(before) {
            out.push_str(&before[..before.len() - 1]);
        } else {
            out.push_str(before);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", arg);
        rest = &rest[j + DELIM.len()..];
    }
    out.push_str(rest);
    out
}

fn is_escaped(before: &str) -> bool {
    before.ends_with(ESCAPE)
}

fn is_double_escaped(before: &str) -> bool {
    let mut tail = before.chars().rev();
    tail.next() == Some(ESCAPE) && tail.next() == Some(ESCAPE)
}
