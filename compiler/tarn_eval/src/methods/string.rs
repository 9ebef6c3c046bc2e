//! `str` methods.
//!
//! Positions are counted in characters, not bytes. Methods whose output can
//! grow past the input (padding, `join`, `replace`) check the result length
//! against `max_str_len` before building it.

use crate::args::{arg_i64, arg_str, CallArgs};
use crate::errors::{type_error, value_error, EvalError, EvalResult};
use crate::format::str_format;
use crate::interpreter::Interpreter;
use crate::limits::ResourceLimits;
use crate::operators::check_len;
use crate::value::{SliceIndices, Value};

pub(super) const METHODS: &[&str] = &[
    "capitalize",
    "center",
    "count",
    "endswith",
    "find",
    "format",
    "index",
    "isalnum",
    "isalpha",
    "isdecimal",
    "isdigit",
    "islower",
    "isnumeric",
    "isspace",
    "istitle",
    "isupper",
    "join",
    "ljust",
    "lower",
    "lstrip",
    "partition",
    "replace",
    "rfind",
    "rindex",
    "rjust",
    "rpartition",
    "rsplit",
    "rstrip",
    "split",
    "splitlines",
    "startswith",
    "strip",
    "swapcase",
    "title",
    "upper",
    "zfill",
];

pub(super) fn call(interp: &mut Interpreter, s: &str, name: &str, mut args: CallArgs) -> EvalResult {
    let limits = *interp.limits();
    if name == "format" {
        let text = str_format(s, &args)?;
        check_len(text.chars().count(), &limits)?;
        return Ok(Value::from(text));
    }
    match name {
        "split" | "rsplit" => args.allow_keywords(name, &["sep", "maxsplit"])?,
        "splitlines" => args.allow_keywords(name, &["keepends"])?,
        _ => args.allow_keywords(name, &[])?,
    }
    let text = match name {
        "lower" => no_args(name, &args, || s.to_lowercase())?,
        "upper" => no_args(name, &args, || s.to_uppercase())?,
        "swapcase" => no_args(name, &args, || s.chars().map(swap_case).collect())?,
        "capitalize" => no_args(name, &args, || capitalize(s))?,
        "title" => no_args(name, &args, || title(s))?,
        "strip" | "lstrip" | "rstrip" => {
            args.expect_count(name, 0, 1)?;
            strip(s, name, args.get(0))?
        }
        "center" | "ljust" | "rjust" => {
            args.expect_count(name, 1, 2)?;
            let width = arg_i64(name, &args.positional[0])?;
            let fill = match args.get(1) {
                Some(fill) => fill_char(name, fill)?,
                None => ' ',
            };
            pad(s, name, width, fill, &limits)?
        }
        "zfill" => {
            args.expect_count(name, 1, 1)?;
            zfill(s, arg_i64(name, &args.positional[0])?, &limits)?
        }
        "replace" => {
            args.expect_count(name, 2, 3)?;
            let old = arg_str(name, &args.positional[0])?;
            let new = arg_str(name, &args.positional[1])?;
            let count = match args.get(2) {
                Some(c) => arg_i64(name, c)?,
                None => -1,
            };
            replace(s, old, new, count, &limits)?
        }
        "join" => {
            args.expect_count(name, 1, 1)?;
            join(s, &args.positional[0], &limits)?
        }
        "split" | "rsplit" => return split(s, name, &mut args),
        "splitlines" => return splitlines(s, &mut args),
        "partition" | "rpartition" => return partition(s, name, &args),
        "count" | "find" | "rfind" | "index" | "rindex" => return search(s, name, &args),
        "startswith" | "endswith" => return affix(s, name, &args),
        _ => return predicate(s, name, &args),
    };
    Ok(Value::from(text))
}

fn no_args(name: &str, args: &CallArgs, f: impl FnOnce() -> String) -> Result<String, EvalError> {
    args.expect_count(name, 0, 0)?;
    Ok(f())
}

fn swap_case(c: char) -> char {
    if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn strip(s: &str, name: &str, chars: Option<&Value>) -> Result<String, EvalError> {
    let set: Option<Vec<char>> = match chars {
        None | Some(Value::None) => None,
        Some(v) => Some(arg_str(name, v)?.chars().collect()),
    };
    let matches = |c: char| match &set {
        Some(set) => set.contains(&c),
        None => c.is_whitespace(),
    };
    let out = match name {
        "lstrip" => s.trim_start_matches(matches),
        "rstrip" => s.trim_end_matches(matches),
        _ => s.trim_matches(matches),
    };
    Ok(out.to_string())
}

fn fill_char(name: &str, fill: &Value) -> Result<char, EvalError> {
    let text = arg_str(name, fill)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(type_error(
            "The fill character must be exactly one character long",
        )),
    }
}

fn pad(s: &str, name: &str, width: i64, fill: char, limits: &ResourceLimits) -> Result<String, EvalError> {
    let len = s.chars().count();
    let width = usize::try_from(width).unwrap_or(0);
    if width <= len {
        return Ok(s.to_string());
    }
    check_len(width, limits)?;
    let total = width - len;
    let (left, right) = match name {
        "ljust" => (0, total),
        "rjust" => (total, 0),
        _ => {
            let left = total / 2 + (total & width & 1);
            (left, total - left)
        }
    };
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(s);
    out.extend(std::iter::repeat(fill).take(right));
    Ok(out)
}

fn zfill(s: &str, width: i64, limits: &ResourceLimits) -> Result<String, EvalError> {
    let len = s.chars().count();
    let width = usize::try_from(width).unwrap_or(0);
    if width <= len {
        return Ok(s.to_string());
    }
    check_len(width, limits)?;
    let (sign, digits) = match s.chars().next() {
        Some(c @ ('+' | '-')) => (Some(c), &s[1..]),
        _ => (None, s),
    };
    let mut out = String::with_capacity(width);
    out.extend(sign);
    out.extend(std::iter::repeat('0').take(width - len));
    out.push_str(digits);
    Ok(out)
}

fn replace(s: &str, old: &str, new: &str, count: i64, limits: &ResourceLimits) -> Result<String, EvalError> {
    let limit = usize::try_from(count).unwrap_or(usize::MAX);
    let occurrences = if old.is_empty() {
        s.chars().count() + 1
    } else {
        s.matches(old).count()
    }
    .min(limit);
    let old_len = old.chars().count();
    let new_len = new.chars().count();
    let result_len = (s.chars().count() + occurrences * new_len).saturating_sub(occurrences * old_len);
    check_len(result_len, limits)?;
    if old.is_empty() {
        let mut out = String::with_capacity(s.len() + occurrences * new.len());
        let mut inserted = 0;
        for c in s.chars() {
            if inserted < occurrences {
                out.push_str(new);
                inserted += 1;
            }
            out.push(c);
        }
        if inserted < occurrences {
            out.push_str(new);
        }
        return Ok(out);
    }
    Ok(s.replacen(old, new, occurrences))
}

fn join(sep: &str, items: &Value, limits: &ResourceLimits) -> Result<String, EvalError> {
    let mut parts = Vec::new();
    for (i, item) in items.iter()?.enumerate() {
        match item {
            Value::Str(s) => parts.push(s),
            other => {
                return Err(type_error(format!(
                    "sequence item {i}: expected str instance, {} found",
                    other.type_name()
                )))
            }
        }
    }
    let total: usize = parts.iter().map(|p| p.chars().count()).sum::<usize>()
        + sep.chars().count() * parts.len().saturating_sub(1);
    check_len(total, limits)?;
    Ok(parts.iter().map(|p| &**p).collect::<Vec<&str>>().join(sep))
}

/// Positional-or-keyword parameter.
fn param(args: &mut CallArgs, index: usize, name: &str) -> Option<Value> {
    args.take_keyword(name).or_else(|| args.positional.get(index).cloned())
}

fn split(s: &str, name: &str, args: &mut CallArgs) -> EvalResult {
    args.expect_count(name, 0, 2)?;
    let sep = param(args, 0, "sep");
    let maxsplit = match param(args, 1, "maxsplit") {
        Some(v) => arg_i64(name, &v)?,
        None => -1,
    };
    let limit = usize::try_from(maxsplit).ok();
    let reverse = name == "rsplit";
    let parts: Vec<String> = match &sep {
        None | Some(Value::None) => split_whitespace(s, limit, reverse),
        Some(sep) => {
            let sep = arg_str(name, sep)?;
            if sep.is_empty() {
                return Err(value_error("empty separator"));
            }
            match (limit, reverse) {
                (None, _) => s.split(sep).map(str::to_string).collect(),
                (Some(n), false) => s.splitn(n + 1, sep).map(str::to_string).collect(),
                (Some(n), true) => {
                    let mut parts: Vec<String> = s.rsplitn(n + 1, sep).map(str::to_string).collect();
                    parts.reverse();
                    parts
                }
            }
        }
    };
    Ok(Value::list(parts.into_iter().map(Value::from).collect()))
}

fn split_whitespace(s: &str, limit: Option<usize>, reverse: bool) -> Vec<String> {
    let Some(limit) = limit else {
        return s.split_whitespace().map(str::to_string).collect();
    };
    if reverse {
        let reversed: String = s.chars().rev().collect();
        let mut parts: Vec<String> = split_whitespace(&reversed, Some(limit), false)
            .into_iter()
            .map(|p| p.chars().rev().collect())
            .collect();
        parts.reverse();
        return parts;
    }
    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if parts.len() == limit {
            parts.push(rest.to_string());
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        parts.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }
    parts
}

fn splitlines(s: &str, args: &mut CallArgs) -> EvalResult {
    args.expect_count("splitlines", 0, 1)?;
    let keepends = match param(args, 0, "keepends") {
        Some(v) => v.is_truthy()?,
        None => false,
    };
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            let mut ending = String::from(c);
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
                ending.push('\n');
            }
            if keepends {
                current.push_str(&ending);
            }
            lines.push(Value::from(std::mem::take(&mut current)));
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        lines.push(Value::from(current));
    }
    Ok(Value::list(lines))
}

fn partition(s: &str, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 1, 1)?;
    let sep = arg_str(name, &args.positional[0])?;
    if sep.is_empty() {
        return Err(value_error("empty separator"));
    }
    let found = if name == "rpartition" { s.rfind(sep) } else { s.find(sep) };
    let parts = match found {
        Some(at) => [&s[..at], sep, &s[at + sep.len()..]],
        None if name == "rpartition" => ["", "", s],
        None => [s, "", ""],
    };
    Ok(Value::tuple(parts.into_iter().map(Value::from).collect()))
}

/// Character window `s[start:end]` and its character offset.
fn window<'a>(s: &'a str, args: &CallArgs, name: &str) -> Result<(&'a str, usize), EvalError> {
    let len = s.chars().count();
    let start = args.get(1).cloned().unwrap_or(Value::None);
    let end = args.get(2).cloned().unwrap_or(Value::None);
    for bound in [&start, &end] {
        if !matches!(bound, Value::None | Value::Int(_) | Value::Bool(_)) {
            return Err(type_error(format!(
                "{name}() slice indices must be integers or None"
            )));
        }
    }
    let span = SliceIndices::resolve(len, &start, &end, &Value::None)?;
    let (lo, hi) = (span.start as usize, (span.stop as usize).max(span.start as usize));
    let byte = |pos: usize| s.char_indices().nth(pos).map_or(s.len(), |(b, _)| b);
    Ok((&s[byte(lo)..byte(hi)], lo))
}

fn search(s: &str, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 1, 3)?;
    let needle = arg_str(name, &args.positional[0])?;
    let (hay, offset) = window(s, args, name)?;
    if name == "count" {
        let n = if needle.is_empty() {
            hay.chars().count() + 1
        } else {
            hay.matches(needle).count()
        };
        return Ok(Value::int(n as i64));
    }
    let found = if name.starts_with('r') { hay.rfind(needle) } else { hay.find(needle) };
    match found {
        Some(byte) => Ok(Value::int((offset + hay[..byte].chars().count()) as i64)),
        None if name.ends_with("index") => Err(value_error("substring not found")),
        None => Ok(Value::int(-1)),
    }
}

fn affix(s: &str, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 1, 3)?;
    let (hay, _) = window(s, args, name)?;
    let test = |candidate: &str| {
        if name == "startswith" {
            hay.starts_with(candidate)
        } else {
            hay.ends_with(candidate)
        }
    };
    match &args.positional[0] {
        Value::Str(candidate) => Ok(Value::Bool(test(candidate))),
        Value::Tuple(options) => {
            for option in options.iter() {
                if test(arg_str(name, option)?) {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        other => Err(type_error(format!(
            "{name} first arg must be str or a tuple of str, not {}",
            other.type_name()
        ))),
    }
}

fn predicate(s: &str, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 0, 0)?;
    let nonempty = !s.is_empty();
    let result = match name {
        "isalnum" => nonempty && s.chars().all(char::is_alphanumeric),
        "isalpha" => nonempty && s.chars().all(char::is_alphabetic),
        "isdecimal" | "isdigit" => nonempty && s.chars().all(|c| c.is_ascii_digit()),
        "isnumeric" => nonempty && s.chars().all(char::is_numeric),
        "isspace" => nonempty && s.chars().all(char::is_whitespace),
        "islower" => {
            s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
        }
        "isupper" => {
            s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
        }
        _ => nonempty && s.chars().any(char::is_alphabetic) && title(s) == s,
    };
    Ok(Value::Bool(result))
}
