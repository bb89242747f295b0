use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::{
    ast::{InputValue, ObjectField},
    parser::{LexerError, ParseError, ParseResult, Parser, ScalarToken, Spanning, Token},
};

pub fn parse_value_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    match parser.peek().item {
        Token::BracketOpen => parse_list_literal(parser, is_const),
        Token::CurlyOpen => parse_object_literal(parser, is_const),
        Token::Dollar if !is_const => parse_variable_literal(parser),
        Token::Scalar(_) => {
            let Spanning { item, span } = parser.next_token()?;
            let Token::Scalar(token) = item else {
                unreachable!("peeked a scalar token")
            };
            parse_scalar_literal(token)
                .map(|v| Spanning::new(span, v))
                .map_err(|e| Spanning::new(span, e))
        }
        Token::Boolean(b) => Ok(parser.next_token()?.map(|_| InputValue::Boolean(b))),
        Token::Null => Ok(parser.next_token()?.map(|_| InputValue::null())),
        Token::Name(name) => Ok(parser.next_token()?.map(|_| InputValue::enum_value(name))),
        Token::Keyword(kw) => Ok(parser
            .next_token()?
            .map(|_| InputValue::enum_value(kw.as_str()))),
        Token::EndOfFile => Err(Spanning::new(
            parser.peek().span,
            ParseError::UnexpectedEndOfFile,
        )),
        _ => Err(parser.next_token()?.map(ParseError::unexpected_token)),
    }
}

fn parse_list_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    Ok(parser
        .delimited_list(
            &Token::BracketOpen,
            |p| parse_value_literal(p, is_const),
            &Token::BracketClose,
        )?
        .map(InputValue::List))
}

fn parse_object_literal(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<InputValue> {
    let fields = parser.delimited_list(
        &Token::CurlyOpen,
        |p| parse_object_field(p, is_const),
        &Token::CurlyClose,
    )?;

    let mut object = IndexMap::with_capacity(fields.item.len());
    for field in fields.item {
        let field = field.item;
        if object.contains_key(&field.name.item) {
            return Err(Spanning::new(
                field.name.span,
                ParseError::DuplicateDefinition {
                    kind: "input field",
                    name: field.name.item.to_string(),
                },
            ));
        }
        object.insert(field.name.item.clone(), field);
    }

    Ok(Spanning::new(fields.span, InputValue::Object(object)))
}

fn parse_object_field(parser: &mut Parser<'_>, is_const: bool) -> ParseResult<ObjectField> {
    let key = parser.expect_name()?;

    parser.expect(&Token::Colon)?;

    let value = parse_value_literal(parser, is_const)?;
    let end = value.span.end;

    Ok(Spanning::start_end(
        &key.span.start,
        &end,
        ObjectField {
            name: key.map(ArcStr::from),
            value,
        },
    ))
}

fn parse_variable_literal(parser: &mut Parser<'_>) -> ParseResult<InputValue> {
    let start_pos = parser.expect(&Token::Dollar)?.span.start;
    let Spanning {
        item: name,
        span: name_span,
    } = parser.expect_name()?;

    Ok(Spanning::start_end(
        &start_pos,
        &name_span.end,
        InputValue::variable(name),
    ))
}

fn parse_scalar_literal(token: ScalarToken<'_>) -> Result<InputValue, ParseError> {
    match token {
        ScalarToken::Int(text) => parse_int_literal(text)
            .map(InputValue::Int)
            .ok_or(ParseError::ExpectedScalarError(
                "Int literal does not fit into a 64-bit signed integer",
            )),
        ScalarToken::Float(text) => text
            .parse::<f32>()
            .map(InputValue::Float)
            .map_err(|_| ParseError::ExpectedScalarError("Invalid Float literal")),
        ScalarToken::String(raw) => unquote_string(raw)
            .map(InputValue::String)
            .map_err(ParseError::LexerError),
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer literal as a 64-bit
/// integer, truncated to its low 32 bits.
fn parse_int_literal(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    let value = if negative { -magnitude } else { magnitude };
    Some(value as i32)
}

/// Strips the surrounding quotes of a string literal and resolves its escape
/// sequences.
pub(crate) fn unquote_string(raw: &str) -> Result<String, LexerError> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(LexerError::UnterminatedString)?;

    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unquoted.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => unquoted.push('"'),
            Some('\\') => unquoted.push('\\'),
            Some('/') => unquoted.push('/'),
            Some('b') => unquoted.push('\u{0008}'),
            Some('f') => unquoted.push('\u{000c}'),
            Some('n') => unquoted.push('\n'),
            Some('r') => unquoted.push('\r'),
            Some('t') => unquoted.push('\t'),
            Some('u') => {
                let escape = chars.by_ref().take(4).collect::<String>();
                let code_point = u32::from_str_radix(&escape, 16)
                    .map_err(|_| LexerError::UnknownEscapeSequence(format!("\\u{escape}")))?;
                // Lone surrogates have no `char` representation.
                unquoted.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(c) => return Err(LexerError::UnknownEscapeSequence(format!("\\{c}"))),
            None => return Err(LexerError::UnterminatedString),
        }
    }

    Ok(unquoted)
}
