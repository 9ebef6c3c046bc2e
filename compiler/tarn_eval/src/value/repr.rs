//! Text forms of values: `repr()` and `str()`.
//!
//! Containers render their elements with `repr`. Self-referencing
//! containers print `[...]` / `{...}` at the point of recursion.

use std::fmt::Write;
use std::rc::Rc;

use super::{DType, NdArray, Value};

pub fn repr(value: &Value) -> String {
    let mut out = String::new();
    write_repr(value, &mut out, &mut Vec::new());
    out
}

/// `str()` form: strings are raw, exceptions show their message.
pub fn to_str(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        Value::Exception(e) => e.message(),
        other => repr(other),
    }
}

pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    let sci = format!("{x:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..16).contains(&exp) {
        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

pub fn str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn write_repr(value: &Value, out: &mut String, active: &mut Vec<usize>) {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => out.push_str(&float_repr(*f)),
        Value::Str(s) => out.push_str(&str_repr(s)),
        Value::Ellipsis => out.push_str("Ellipsis"),
        Value::List(items) => {
            let id = Rc::as_ptr(items).cast::<()>() as usize;
            if active.contains(&id) {
                out.push_str("[...]");
                return;
            }
            active.push(id);
            out.push('[');
            write_items(&items.borrow(), out, active);
            out.push(']');
            active.pop();
        }
        Value::Tuple(items) => {
            out.push('(');
            write_items(items, out, active);
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::Dict(d) => {
            let id = Rc::as_ptr(d).cast::<()>() as usize;
            if active.contains(&id) {
                out.push_str("{...}");
                return;
            }
            active.push(id);
            out.push('{');
            for (i, (k, v)) in d.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(k, out, active);
                out.push_str(": ");
                write_repr(v, out, active);
            }
            out.push('}');
            active.pop();
        }
        Value::Range(r) => {
            if r.step == 1 {
                let _ = write!(out, "range({}, {})", r.start, r.stop);
            } else {
                let _ = write!(out, "range({}, {}, {})", r.start, r.stop, r.step);
            }
        }
        Value::Slice(s) => {
            out.push_str("slice(");
            write_repr(&s.start, out, active);
            out.push_str(", ");
            write_repr(&s.stop, out, active);
            out.push_str(", ");
            write_repr(&s.step, out, active);
            out.push(')');
        }
        Value::Exception(e) => {
            out.push_str(e.exc.name());
            out.push('(');
            write_items(&e.args, out, active);
            out.push(')');
        }
        Value::ExcType(t) => {
            let _ = write!(out, "<class '{}'>", t.name());
        }
        Value::Builtin(b) if b.is_type => {
            let _ = write!(out, "<class '{}'>", b.name);
        }
        Value::Builtin(b) => {
            let _ = write!(out, "<built-in function {}>", b.name);
        }
        Value::HostFn(h) => {
            let _ = write!(out, "<built-in function {}>", h.name);
        }
        Value::BoundMethod(m) => {
            let _ = write!(
                out,
                "<built-in method {} of {} object>",
                m.name,
                m.receiver.type_name()
            );
        }
        Value::Procedure(p) => {
            let _ = write!(out, "<Procedure {}>", p.signature());
        }
        Value::Array(a) => {
            out.push_str("array(");
            write_array(&a.borrow(), out);
            out.push(')');
        }
    }
}

fn write_items(items: &[Value], out: &mut String, active: &mut Vec<usize>) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(item, out, active);
    }
}

fn write_array(array: &NdArray, out: &mut String) {
    fn element(dtype: DType, x: f64) -> String {
        match dtype {
            DType::Bool if x != 0.0 => "True".to_string(),
            DType::Bool => "False".to_string(),
            DType::Float => float_repr(x),
        }
    }
    fn nest(array: &NdArray, axis: usize, base: usize, stride: &[usize], out: &mut String) {
        out.push('[');
        for k in 0..array.shape()[axis] {
            if k > 0 {
                out.push_str(", ");
            }
            let offset = base + k * stride[axis];
            if axis + 1 == array.ndim() {
                out.push_str(&element(array.dtype(), array.data()[offset]));
            } else {
                nest(array, axis + 1, offset, stride, out);
            }
        }
        out.push(']');
    }
    if array.ndim() == 0 {
        if let Some(&x) = array.data().first() {
            out.push_str(&element(array.dtype(), x));
        }
        return;
    }
    let shape = array.shape();
    let mut stride = vec![1; shape.len()];
    for i in (0..shape.len() - 1).rev() {
        stride[i] = stride[i + 1] * shape[i + 1];
    }
    nest(array, 0, 0, &stride, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_shortest_round_trip() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(0.1), "0.1");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(1.5e-5), "1.5e-05");
        assert_eq!(float_repr(123_456.789), "123456.789");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(f64::INFINITY), "inf");
        assert_eq!(float_repr(f64::NAN), "nan");
        assert_eq!(float_repr(0.0001), "0.0001");
    }

    #[test]
    fn strings_pick_a_quote() {
        assert_eq!(str_repr("abc"), "'abc'");
        assert_eq!(str_repr("it's"), "\"it's\"");
        assert_eq!(str_repr("a\nb"), "'a\\nb'");
        assert_eq!(str_repr("'\""), "'\\'\"'");
    }

    #[test]
    fn self_referencing_list_is_elided() {
        let list = Value::list(vec![Value::int(1)]);
        if let Value::List(items) = &list {
            items.borrow_mut().push(list.clone());
        }
        assert_eq!(repr(&list), "[1, [...]]");
        if let Value::List(items) = &list {
            items.borrow_mut().clear();
        }
    }

    #[test]
    fn singleton_tuple_has_trailing_comma() {
        assert_eq!(repr(&Value::tuple(vec![Value::int(1)])), "(1,)");
        assert_eq!(repr(&Value::tuple(Vec::new())), "()");
    }
}
