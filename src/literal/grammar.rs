use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, cut_err, delimited, opt, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take, take_while};

use crate::Value;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

// -- Strings ----------------------------------------------------------------

fn hex4(input: &mut &str) -> ModalResult<u32> {
    take(4usize)
        .try_map(|h: &str| u32::from_str_radix(h, 16))
        .parse_next(input)
}

fn unicode_escape(input: &mut &str) -> ModalResult<char> {
    let high = hex4(input)?;
    let code = if (0xD800..0xDC00).contains(&high) {
        "\\u".parse_next(input)?;
        let low = hex4(input)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ErrMode::from_input(input).cut());
        }
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };
    char::from_u32(code).ok_or_else(|| ErrMode::from_input(input).cut())
}

/// The character after a backslash. Both quote styles share JSON escapes.
fn escape(input: &mut &str) -> ModalResult<char> {
    let ch = match any.parse_next(input)? {
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        '\'' => '\'',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => unicode_escape(input)?,
        _ => return Err(ErrMode::from_input(input).cut()),
    };
    Ok(ch)
}

fn quoted(mut quote: char) -> impl FnMut(&mut &str) -> ModalResult<String> {
    move |input: &mut &str| {
        quote.parse_next(input)?;
        let mut s = String::new();
        loop {
            match any.parse_next(input)? {
                '\\' => s.push(escape(input)?),
                c if c == quote => return Ok(s),
                c => s.push(c),
            }
        }
    }
}

fn double_quoted(input: &mut &str) -> ModalResult<String> {
    quoted('"').parse_next(input)
}

fn single_quoted(input: &mut &str) -> ModalResult<String> {
    quoted('\'').parse_next(input)
}

// -- Scalars ----------------------------------------------------------------

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)?;
    if text.contains(['.', 'e', 'E']) {
        let f: f64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

// -- Containers -------------------------------------------------------------

fn bare_key<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$').parse_next(input)
}

fn key(input: &mut &str) -> ModalResult<String> {
    alt((double_quoted, single_quoted, bare_key.map(|k: &str| k.to_owned())))
        .context(StrContext::Expected(StrContextValue::Description("key")))
        .parse_next(input)
}

fn entry(input: &mut &str) -> ModalResult<(String, Value)> {
    let k = key.parse_next(input)?;
    (ws, cut_err(':'), ws).parse_next(input)?;
    let v = cut_err(value).parse_next(input)?;
    Ok((k, v))
}

fn object(input: &mut &str) -> ModalResult<Value> {
    let entries: Vec<(String, Value)> = delimited(
        ('{', ws),
        separated(0.., entry, (ws, ',', ws)),
        (ws, cut_err('}')),
    )
    .parse_next(input)?;
    Ok(Value::Map(entries))
}

fn array(input: &mut &str) -> ModalResult<Value> {
    let items: Vec<Value> = delimited(
        ('[', ws),
        separated(0.., value, (ws, ',', ws)),
        (ws, cut_err(']')),
    )
    .parse_next(input)?;
    Ok(Value::List(items))
}

fn value(input: &mut &str) -> ModalResult<Value> {
    alt((
        object,
        array,
        double_quoted.map(Value::String),
        single_quoted.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        "null".value(Value::Null),
        number,
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Top-level parsers ------------------------------------------------------

pub(crate) fn literal(input: &mut &str) -> ModalResult<Value> {
    delimited(ws, value, ws).parse_next(input)
}

/// Comma-separated values without the enclosing brackets, as produced by
/// [`export_rules`](crate::export_rules).
pub(crate) fn items(input: &mut &str) -> ModalResult<Vec<Value>> {
    delimited(ws, separated(0.., value, (ws, ',', ws)), ws).parse_next(input)
}
