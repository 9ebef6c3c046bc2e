//! String formatting: `%` interpolation, `str.format`, and `format()`.
//!
//! All three share one renderer. A conversion is described by a [`Spec`]
//! (fill, alignment, sign, width, precision, type), and the value is rendered
//! into a sign, a prefix, and a body before padding.

use crate::args::CallArgs;
use crate::errors::{index_error, key_error, type_error, value_error, EvalError};
use crate::value::repr::{float_repr, repr, to_str};
use crate::value::{Int, Value};

#[derive(Clone, Debug, PartialEq)]
struct Spec {
    fill: char,
    align: Option<char>,
    sign: char,
    alternate: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    ty: Option<char>,
}

impl Default for Spec {
    fn default() -> Self {
        Spec {
            fill: ' ',
            align: None,
            sign: '-',
            alternate: false,
            width: 0,
            grouping: None,
            precision: None,
            ty: None,
        }
    }
}

fn parse_spec(text: &str) -> Result<Spec, EvalError> {
    let chars: Vec<char> = text.chars().collect();
    let mut spec = Spec::default();
    let mut i = 0;
    let is_align = |c: char| matches!(c, '<' | '>' | '=' | '^');
    if chars.len() >= 2 && is_align(chars[1]) {
        spec.fill = chars[0];
        spec.align = Some(chars[1]);
        i = 2;
    } else if chars.first().copied().is_some_and(is_align) {
        spec.align = chars.first().copied();
        i = 1;
    }
    if let Some(&c @ ('+' | '-' | ' ')) = chars.get(i) {
        spec.sign = c;
        i += 1;
    }
    if chars.get(i) == Some(&'#') {
        spec.alternate = true;
        i += 1;
    }
    if chars.get(i) == Some(&'0') {
        if spec.align.is_none() {
            spec.fill = '0';
            spec.align = Some('=');
        }
        i += 1;
    }
    spec.width = read_number(&chars, &mut i).unwrap_or(0);
    if let Some(&c @ (',' | '_')) = chars.get(i) {
        spec.grouping = Some(c);
        i += 1;
    }
    if chars.get(i) == Some(&'.') {
        i += 1;
        spec.precision = Some(
            read_number(&chars, &mut i).ok_or_else(|| value_error("Format specifier missing precision"))?,
        );
    }
    if let Some(&c) = chars.get(i) {
        spec.ty = Some(c);
        i += 1;
    }
    if i != chars.len() {
        return Err(value_error("Invalid format specifier"));
    }
    Ok(spec)
}

fn read_number(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(char::is_ascii_digit) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

/// `format(value, spec)`.
pub fn format_value(value: &Value, spec_text: &str) -> Result<String, EvalError> {
    let spec = parse_spec(spec_text)?;
    match value {
        Value::Bool(_) if spec.ty.is_none() => Ok(pad("", "", &to_str(value), &spec, '<')),
        Value::Int(_) | Value::Bool(_) => {
            let Some(i) = value.as_int() else {
                return Err(type_error("expected an integer"));
            };
            format_int(&i, &spec)
        }
        Value::Float(f) => format_float(*f, &spec),
        Value::Str(s) => format_str(s, &spec),
        other if spec_text.is_empty() => Ok(to_str(other)),
        other => Err(type_error(format!(
            "unsupported format string passed to {}.__format__",
            other.type_name()
        ))),
    }
}

fn unknown_code(code: char, type_name: &str) -> EvalError {
    value_error(format!(
        "Unknown format code '{code}' for object of type '{type_name}'"
    ))
}

fn format_int(value: &Int, spec: &Spec) -> Result<String, EvalError> {
    let (radix, prefix) = match spec.ty {
        None | Some('d' | 'n') => (10, ""),
        Some('b') => (2, "0b"),
        Some('o') => (8, "0o"),
        Some('x') => (16, "0x"),
        Some('X') => (16, "0X"),
        Some('c') => {
            let ch = value
                .to_i64()
                .and_then(|c| u32::try_from(c).ok())
                .and_then(char::from_u32)
                .ok_or_else(|| crate::errors::overflow_error("%c arg not in range(0x110000)"))?;
            return Ok(pad("", "", &ch.to_string(), spec, '<'));
        }
        Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') => return format_float(value.to_f64(), spec),
        Some(code) => return Err(unknown_code(code, "int")),
    };
    let mut digits = value.abs().to_radix_string(radix, "");
    if spec.ty == Some('X') {
        digits = digits.to_uppercase();
    }
    if let Some(sep) = spec.grouping {
        digits = group_digits(&digits, sep);
    }
    let prefix = if spec.alternate { prefix } else { "" };
    Ok(pad(sign_str(value.is_negative(), spec.sign), prefix, &digits, spec, '>'))
}

fn format_float(x: f64, spec: &Spec) -> Result<String, EvalError> {
    let negative = x.is_sign_negative() && !x.is_nan();
    let a = x.abs();
    let upper = matches!(spec.ty, Some('E' | 'F' | 'G'));
    let mut body = match spec.ty {
        None => match spec.precision {
            Some(p) => general(a, p, false, spec.alternate),
            None => float_repr(a),
        },
        Some('e' | 'E') => scientific(a, spec.precision.unwrap_or(6), upper),
        Some('f' | 'F') => fixed(a, spec.precision.unwrap_or(6), upper),
        Some('g' | 'G') => general(a, spec.precision.unwrap_or(6), upper, spec.alternate),
        Some('%') => format!("{}%", fixed(a * 100.0, spec.precision.unwrap_or(6), false)),
        Some(code) => return Err(unknown_code(code, "float")),
    };
    if let Some(sep) = spec.grouping {
        let split = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
        body = format!("{}{}", group_digits(&body[..split], sep), &body[split..]);
    }
    Ok(pad(sign_str(negative, spec.sign), "", &body, spec, '>'))
}

fn format_str(s: &str, spec: &Spec) -> Result<String, EvalError> {
    match spec.ty {
        None | Some('s') => {}
        Some(code) => return Err(unknown_code(code, "str")),
    }
    if spec.sign != '-' {
        return Err(value_error("Sign not allowed in string format specifier"));
    }
    let text: String = match spec.precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    };
    Ok(pad("", "", &text, spec, '<'))
}

fn sign_str(negative: bool, sign: char) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, '+') => "+",
        (false, ' ') => " ",
        _ => "",
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

fn pad(sign: &str, prefix: &str, body: &str, spec: &Spec, default_align: char) -> String {
    let content_len = sign.chars().count() + prefix.chars().count() + body.chars().count();
    if spec.width <= content_len {
        return format!("{sign}{prefix}{body}");
    }
    let n = spec.width - content_len;
    let fill = |count: usize| spec.fill.to_string().repeat(count);
    match spec.align.unwrap_or(default_align) {
        '<' => format!("{sign}{prefix}{body}{}", fill(n)),
        '^' => format!("{}{sign}{prefix}{body}{}", fill(n / 2), fill(n - n / 2)),
        '=' => format!("{sign}{prefix}{}{body}", fill(n)),
        _ => format!("{}{sign}{prefix}{body}", fill(n)),
    }
}

fn non_finite(a: f64, upper: bool) -> Option<String> {
    let text = if a.is_nan() {
        "nan"
    } else if a.is_infinite() {
        "inf"
    } else {
        return None;
    };
    Some(if upper { text.to_uppercase() } else { text.to_string() })
}

fn fixed(a: f64, precision: usize, upper: bool) -> String {
    non_finite(a, upper).unwrap_or_else(|| format!("{a:.precision$}"))
}

fn scientific(a: f64, precision: usize, upper: bool) -> String {
    if let Some(text) = non_finite(a, upper) {
        return text;
    }
    let raw = format!("{a:.precision$e}");
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

fn general(a: f64, precision: usize, upper: bool, alternate: bool) -> String {
    if let Some(text) = non_finite(a, upper) {
        return text;
    }
    let p = precision.max(1);
    let sci = format!("{a:.prec$e}", prec = p - 1);
    let exp: i64 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    let mut text = if a == 0.0 || (-4..p as i64).contains(&exp) {
        let digits = if a == 0.0 { p - 1 } else { (p as i64 - 1 - exp) as usize };
        format!("{a:.digits$}")
    } else {
        scientific(a, p - 1, upper)
    };
    if !alternate {
        let (number, exponent) = match text.find(['e', 'E']) {
            Some(pos) => (text[..pos].to_string(), text[pos..].to_string()),
            None => (text.clone(), String::new()),
        };
        let number = if number.contains('.') {
            number.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            number
        };
        text = format!("{number}{exponent}");
    }
    text
}

// printf-style interpolation

/// `fmt % args`.
pub fn percent_format(fmt: &str, args: &Value) -> Result<String, EvalError> {
    let (items, mapping): (Vec<Value>, Option<&Value>) = match args {
        Value::Tuple(items) => (items.to_vec(), None),
        Value::Dict(_) => (Vec::new(), Some(args)),
        other => (vec![other.clone()], None),
    };
    let mut next = 0usize;
    let mut take = || -> Result<Value, EvalError> {
        let value = items
            .get(next)
            .cloned()
            .ok_or_else(|| type_error("not enough arguments for format string"))?;
        next += 1;
        Ok(value)
    };
    let chars: Vec<char> = fmt.chars().collect();
    let mut out = String::with_capacity(fmt.len());
    let mut i = 0;
    let mut used_mapping = false;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '%' {
            out.push(c);
            continue;
        }
        let start = i - 1;
        let mut keyed: Option<Value> = None;
        if chars.get(i) == Some(&'(') {
            let close = chars[i..]
                .iter()
                .position(|&c| c == ')')
                .ok_or_else(|| value_error("incomplete format key"))?;
            let key: String = chars[i + 1..i + close].iter().collect();
            i += close + 1;
            let Some(Value::Dict(d)) = mapping else {
                return Err(type_error("format requires a mapping"));
            };
            let key_value = Value::from(key.as_str());
            keyed = Some(
                d.borrow()
                    .get(&key_value)?
                    .cloned()
                    .ok_or_else(|| key_error(&repr(&key_value)))?,
            );
            used_mapping = true;
        }
        let mut spec = Spec::default();
        let mut zero = false;
        while let Some(&flag @ ('-' | '+' | ' ' | '#' | '0')) = chars.get(i) {
            match flag {
                '-' => spec.align = Some('<'),
                '+' => spec.sign = '+',
                ' ' if spec.sign != '+' => spec.sign = ' ',
                '#' => spec.alternate = true,
                '0' => zero = true,
                _ => {}
            }
            i += 1;
        }
        if chars.get(i) == Some(&'*') {
            i += 1;
            let width = take()?;
            spec.width = star_amount(&width)?;
        } else {
            spec.width = read_number(&chars, &mut i).unwrap_or(0);
        }
        if chars.get(i) == Some(&'.') {
            i += 1;
            if chars.get(i) == Some(&'*') {
                i += 1;
                let precision = take()?;
                spec.precision = Some(star_amount(&precision)?);
            } else {
                spec.precision = Some(read_number(&chars, &mut i).unwrap_or(0));
            }
        }
        while matches!(chars.get(i), Some('h' | 'l' | 'L')) {
            i += 1;
        }
        let Some(&conv) = chars.get(i) else {
            return Err(value_error("incomplete format"));
        };
        i += 1;
        if conv == '%' {
            out.push('%');
            continue;
        }
        let numeric = matches!(conv, 'd' | 'i' | 'u' | 'o' | 'x' | 'X' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G');
        if zero && numeric && spec.align.is_none() {
            spec.fill = '0';
            spec.align = Some('=');
        }
        let value = match keyed.take() {
            Some(v) => v,
            None => take()?,
        };
        let piece = match conv {
            'd' | 'i' | 'u' => {
                spec.ty = Some('d');
                spec.precision = None;
                format_int(&percent_int(&value, conv)?, &spec)?
            }
            'o' | 'x' | 'X' => {
                let Some(i) = value.as_int() else {
                    return Err(type_error(format!(
                        "%{conv} format: an integer is required, not {}",
                        value.type_name()
                    )));
                };
                spec.ty = Some(conv);
                spec.precision = None;
                format_int(&i, &spec)?
            }
            'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                let Some(x) = value.as_f64() else {
                    return Err(type_error(format!(
                        "must be real number, not {}",
                        value.type_name()
                    )));
                };
                spec.ty = Some(conv);
                format_float(x, &spec)?
            }
            'c' => {
                let ch = match &value {
                    Value::Str(s) if s.chars().count() == 1 => s.to_string(),
                    other => match other.as_int() {
                        Some(i) => {
                            spec.ty = Some('c');
                            spec.precision = None;
                            format_int(&i, &spec)?
                        }
                        None => return Err(type_error("%c requires int or char")),
                    },
                };
                if spec.ty == Some('c') {
                    ch
                } else {
                    pad("", "", &ch, &spec, '>')
                }
            }
            's' | 'r' | 'a' => {
                let text = if conv == 's' { to_str(&value) } else { repr(&value) };
                let text: String = match spec.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                pad("", "", &text, &spec, '>')
            }
            other => {
                return Err(value_error(format!(
                    "unsupported format character '{other}' (0x{:x}) at index {}",
                    other as u32,
                    start + 1
                )))
            }
        };
        out.push_str(&piece);
    }
    if mapping.is_none() && next < items.len() && !used_mapping {
        return Err(type_error(
            "not all arguments converted during string formatting",
        ));
    }
    Ok(out)
}

fn star_amount(value: &Value) -> Result<usize, EvalError> {
    value
        .as_int()
        .and_then(|i| i.to_i64())
        .map(|w| w.unsigned_abs() as usize)
        .ok_or_else(|| type_error("* wants int"))
}

fn percent_int(value: &Value, conv: char) -> Result<Int, EvalError> {
    match value {
        Value::Float(f) => Int::from_f64(*f).ok_or_else(|| {
            if f.is_nan() {
                value_error("cannot convert float NaN to integer")
            } else {
                crate::errors::overflow_error("cannot convert float infinity to integer")
            }
        }),
        other => other.as_int().ok_or_else(|| {
            type_error(format!(
                "%{conv} format: a real number is required, not {}",
                other.type_name()
            ))
        }),
    }
}

// str.format

/// `template.format(*args, **kwargs)`.
pub fn str_format(template: &str, args: &CallArgs) -> Result<String, EvalError> {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut auto_index: Option<usize> = None;
    let mut manual = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' if chars.get(i + 1) == Some(&'{') => {
                out.push('{');
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                out.push('}');
                i += 2;
            }
            '}' => return Err(value_error("Single '}' encountered in format string")),
            '{' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == '}')
                    .ok_or_else(|| value_error("expected '}' before end of string"))?;
                let field: String = chars[i + 1..i + close].iter().collect();
                i += close + 1;
                let (head, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                let (name, conversion) = match head.split_once('!') {
                    Some((n, c)) => (n, Some(c)),
                    None => (head, None),
                };
                let (base, index) = match name.find('[') {
                    Some(pos) => (&name[..pos], Some(&name[pos..])),
                    None => (name, None),
                };
                if base.contains('.') {
                    return Err(value_error(
                        "attribute access in format fields is not supported",
                    ));
                }
                let mut value = if base.is_empty() {
                    if manual {
                        return Err(value_error(
                            "cannot switch from manual field specification to automatic field numbering",
                        ));
                    }
                    let n = auto_index.map_or(0, |n| n + 1);
                    auto_index = Some(n);
                    positional(args, n)?
                } else if let Ok(n) = base.parse::<usize>() {
                    if auto_index.is_some() {
                        return Err(value_error(
                            "cannot switch from automatic field numbering to manual field specification",
                        ));
                    }
                    manual = true;
                    positional(args, n)?
                } else {
                    args.keyword(base)
                        .cloned()
                        .ok_or_else(|| key_error(&repr(&Value::from(base))))?
                };
                if let Some(index) = index {
                    value = index_field(value, index)?;
                }
                let value = match conversion {
                    None => value,
                    Some("r" | "a") => Value::from(repr(&value)),
                    Some("s") => Value::from(to_str(&value)),
                    Some(other) => {
                        return Err(value_error(format!(
                            "Unknown conversion specifier {other}"
                        )))
                    }
                };
                out.push_str(&format_value(&value, spec)?);
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn positional(args: &CallArgs, n: usize) -> Result<Value, EvalError> {
    args.get(n).cloned().ok_or_else(|| {
        index_error(format!(
            "Replacement index {n} out of range for positional args tuple"
        ))
    })
}

/// Apply `[key][key]...` lookups from a replacement field.
fn index_field(mut value: Value, mut rest: &str) -> Result<Value, EvalError> {
    while let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped
            .find(']')
            .ok_or_else(|| value_error("Missing ']' in format string"))?;
        let key = &stripped[..close];
        rest = &stripped[close + 1..];
        let key_value = key
            .parse::<i64>()
            .map_or_else(|_| Value::from(key), Value::int);
        value = match &value {
            Value::List(items) => {
                let items = items.borrow();
                let pos = crate::value::resolve_index(&key_value, items.len(), "list")?;
                items[pos].clone()
            }
            Value::Tuple(items) => {
                let pos = crate::value::resolve_index(&key_value, items.len(), "tuple")?;
                items[pos].clone()
            }
            Value::Dict(d) => d
                .borrow()
                .get(&key_value)?
                .cloned()
                .ok_or_else(|| key_error(&repr(&key_value)))?,
            other => return Err(crate::errors::not_subscriptable(other.type_name())),
        };
    }
    if !rest.is_empty() {
        return Err(value_error("Only '.' or '[' may follow ']' in format field specifier"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tuple(items: Vec<Value>) -> Value {
        Value::tuple(items)
    }

    #[test]
    fn percent_basic_conversions() {
        let args = tuple(vec![Value::int(42), Value::Float(3.14159), Value::from("hi")]);
        assert_eq!(
            percent_format("%d %.2f %s", &args).ok().as_deref(),
            Some("42 3.14 hi")
        );
        assert_eq!(percent_format("%5d|%-5d|", &tuple(vec![Value::int(7), Value::int(7)])).ok().as_deref(), Some("    7|7    |"));
        assert_eq!(percent_format("%05.1f", &Value::Float(-2.25)).ok().as_deref(), Some("-02.2"));
        assert_eq!(percent_format("%x %#o", &tuple(vec![Value::int(255), Value::int(8)])).ok().as_deref(), Some("ff 0o10"));
        assert_eq!(percent_format("%r", &Value::from("a")).ok().as_deref(), Some("'a'"));
        assert_eq!(percent_format("100%%", &tuple(vec![])).ok().as_deref(), Some("100%"));
    }

    #[test]
    fn percent_argument_count_errors() {
        assert!(percent_format("%d %d", &Value::int(1)).is_err());
        let err = percent_format("%d", &tuple(vec![Value::int(1), Value::int(2)]));
        assert!(matches!(err, Err(e) if e.message == "not all arguments converted during string formatting"));
    }

    #[test]
    fn percent_mapping_keys() {
        let mut d = crate::value::Dict::new();
        assert!(d.insert(Value::from("n"), Value::int(3)).is_ok());
        let out = percent_format("n=%(n)d", &Value::dict(d));
        assert_eq!(out.ok().as_deref(), Some("n=3"));
    }

    #[test]
    fn general_format_strips_zeros() {
        assert_eq!(percent_format("%g", &Value::Float(0.5)).ok().as_deref(), Some("0.5"));
        assert_eq!(percent_format("%g", &Value::Float(1e20)).ok().as_deref(), Some("1e+20"));
        assert_eq!(percent_format("%e", &Value::Float(1234.5)).ok().as_deref(), Some("1.234500e+03"));
    }

    #[test]
    fn format_spec_mini_language() {
        assert_eq!(format_value(&Value::int(1234567), ",").ok().as_deref(), Some("1,234,567"));
        assert_eq!(format_value(&Value::from("ab"), "^6").ok().as_deref(), Some("  ab  "));
        assert_eq!(format_value(&Value::from("ab"), "*>4").ok().as_deref(), Some("**ab"));
        assert_eq!(format_value(&Value::Float(0.25), ".1%").ok().as_deref(), Some("25.0%"));
        assert_eq!(format_value(&Value::int(-5), "+05d").ok().as_deref(), Some("-0005"));
        assert_eq!(format_value(&Value::int(5), "#b").ok().as_deref(), Some("0b101"));
        assert!(format_value(&Value::from("x"), "d").is_err());
    }

    #[test]
    fn str_format_fields() {
        let args = CallArgs::new(vec![Value::int(1), Value::from("b")]).with_keyword("k", Value::Float(2.5));
        assert_eq!(str_format("{} {} {k}", &args).ok().as_deref(), Some("1 b 2.5"));
        assert_eq!(str_format("{1}{0}{{}}", &args).ok().as_deref(), Some("b1{}"));
        assert_eq!(str_format("{!r:>5}", &CallArgs::new(vec![Value::from("x")])).ok().as_deref(), Some("  'x'"));
        assert!(str_format("{0}{}", &args).is_err());
        assert!(str_format("{5}", &args).is_err());
    }

    #[test]
    fn str_format_indexing() {
        let args = CallArgs::new(vec![Value::list(vec![Value::int(9), Value::int(8)])]);
        assert_eq!(str_format("{0[1]}", &args).ok().as_deref(), Some("8"));
    }
}
