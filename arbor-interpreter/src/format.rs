//! Formatting for the `printf` built-in.
//!
//! Supports the conversions arbor programs can produce values for: `%d`,
//! `%i`, `%u`, `%s`, `%c` and `%%`, with C's flags (`-+ 0#`), field width and
//! precision (either may be `*`) and the `l`/`ll` length modifiers. Without a
//! length modifier integers are read as C `int`/`unsigned int`. Unknown
//! conversions are copied through unchanged and missing arguments print
//! nothing, so formatting never fails.

use std::iter::Peekable;
use std::slice;
use std::str::Chars;
use crate::Value;


pub fn printf(args: &[Value]) -> String {
    match args.split_first() {
        Some((&Value::Str(ref format), rest)) => apply(format, rest),
        _ => {
            let mut out = args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
            out.push('\n');
            out
        }
    }
}

/// Everything between `%` and the conversion character.
#[derive(Default, Debug)]
struct Conversion {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    long: bool,
}

impl Conversion {
    /// Reads flags, width, precision and length, copying what was read into
    /// `raw`. A `*` width or precision takes the next argument.
    fn parse(chars: &mut Peekable<Chars>, raw: &mut String, args: &mut slice::Iter<Value>) -> Self {
        let mut conversion = Conversion::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => conversion.left = true,
                '+' => conversion.plus = true,
                ' ' => conversion.space = true,
                '0' => conversion.zero = true,
                '#' => {}
                _ => break,
            }
            raw.push(flag);
            chars.next();
        }
        if let Some(width) = count(chars, raw, args) {
            // a negative `*` width left-justifies
            if width < 0 {
                conversion.left = true;
            }
            conversion.width = Some(width.unsigned_abs() as usize);
        }
        if let Some(&'.') = chars.peek() {
            raw.push('.');
            chars.next();
            let precision = count(chars, raw, args).unwrap_or(0);
            if precision >= 0 {
                conversion.precision = Some(precision as usize);
            }
        }
        while let Some(&'l') = chars.peek() {
            conversion.long = true;
            raw.push('l');
            chars.next();
        }
        conversion
    }
}

fn count(chars: &mut Peekable<Chars>, raw: &mut String, args: &mut slice::Iter<Value>) -> Option<i64> {
    if let Some(&'*') = chars.peek() {
        raw.push('*');
        chars.next();
        return Some(args.next().and_then(Value::as_int).unwrap_or(0));
    }
    let mut value = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        let so_far: i64 = value.unwrap_or(0);
        value = Some(so_far.saturating_mul(10).saturating_add(i64::from(digit)));
        raw.push(chars.next().unwrap_or('0'));
    }
    value
}

fn apply(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let mut raw = String::from("%");
        let conversion = Conversion::parse(&mut chars, &mut raw, &mut args);
        match chars.next() {
            Some('%') => out.push('%'),
            Some(kind @ ('d' | 'i' | 'u')) => {
                match args.next() {
                    Some(&Value::Int(value)) => push_int(&mut out, value, kind, &conversion),
                    Some(other) => push_padded(&mut out, "", &other.to_string(), &conversion, false),
                    None => {}
                }
            }
            Some('s') => {
                if let Some(value) = args.next() {
                    let text = value.to_string();
                    let text = match conversion.precision {
                        Some(precision) => text.chars().take(precision).collect(),
                        None => text,
                    };
                    push_padded(&mut out, "", &text, &conversion, false);
                }
            }
            Some('c') => {
                let text = match args.next() {
                    Some(&Value::Int(code)) => {
                        ::std::char::from_u32(code as u32).unwrap_or('?').to_string()
                    }
                    Some(other) => other.to_string(),
                    None => continue,
                };
                push_padded(&mut out, "", &text, &conversion, false);
            }
            Some(other) => {
                out.push_str(&raw);
                out.push(other);
            }
            None => out.push_str(&raw),
        }
    }
    out
}

fn push_int(out: &mut String, value: i64, kind: char, conversion: &Conversion) {
    let (negative, magnitude) = match kind {
        'u' if conversion.long => (false, value as u64),
        'u' => (false, u64::from(value as u32)),
        _ if conversion.long => (value < 0, value.unsigned_abs()),
        _ => {
            let value = value as i32;
            (value < 0, u64::from(value.unsigned_abs()))
        }
    };
    let digits = match conversion.precision {
        Some(0) if magnitude == 0 => String::new(),
        Some(precision) => format!("{:0>width$}", magnitude, width = precision),
        None => magnitude.to_string(),
    };
    let sign = if negative {
        "-"
    } else if kind == 'u' {
        ""
    } else if conversion.plus {
        "+"
    } else if conversion.space {
        " "
    } else {
        ""
    };
    let zero_fill = conversion.zero && !conversion.left && conversion.precision.is_none();
    push_padded(out, sign, &digits, conversion, zero_fill);
}

/// Pads `prefix` followed by `body` to the field width. Zero fill goes
/// between the two.
fn push_padded(out: &mut String, prefix: &str, body: &str, conversion: &Conversion, zero_fill: bool) {
    let len = prefix.chars().count() + body.chars().count();
    let padding = conversion.width.unwrap_or(0).saturating_sub(len);
    if conversion.left {
        out.push_str(prefix);
        out.push_str(body);
        out.extend(::std::iter::repeat(' ').take(padding));
    } else if zero_fill {
        out.push_str(prefix);
        out.extend(::std::iter::repeat('0').take(padding));
        out.push_str(body);
    } else {
        out.extend(::std::iter::repeat(' ').take(padding));
        out.push_str(prefix);
        out.push_str(body);
    }
}
