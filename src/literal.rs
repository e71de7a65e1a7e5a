//! Typed literal parser using nom.
//!
//! Lets values be written as text (CLI arguments, fixtures) without losing
//! their static type.
//!
//! # Syntax
//!
//! ```text
//! null                          absent value
//! u32:6                         value of a fixed kind
//! &u32:6                        reference to a value
//! &u32                          reference that does not resolve
//! text:Ala ma Kota!             rest of input, verbatim
//! bytes:0x0a0b  blob:0a0b       hex, optional 0x prefix
//! datetime:2010-12-30 17:21:00.5
//! raw(int24):030201  raw(9):ff  explicit wire type, hex payload
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_opt, map_res, opt, recognize, rest, value, verify},
    number::complete::recognize_float,
    sequence::{pair, preceded, tuple},
};

use crate::error::{BindError, BindResult};
use crate::param::{Blob, Param, Raw, Scalar, ToParam};
use crate::temporal::Datetime;
use crate::types::{Kind, WireType};

/// An owned value of a known kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Owned {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    ISize(isize),
    USize(usize),
    F32(f32),
    F64(f64),
    Real(f64),
    Bytes(Vec<u8>),
    Text(String),
    Blob(Blob),
    Datetime(Datetime),
    Timestamp(Datetime),
    Raw(WireType, Vec<u8>),
}

impl Owned {
    pub fn scalar(&self) -> Scalar<'_> {
        match self {
            Owned::I8(v) => Scalar::I8(*v),
            Owned::U8(v) => Scalar::U8(*v),
            Owned::I16(v) => Scalar::I16(*v),
            Owned::U16(v) => Scalar::U16(*v),
            Owned::I32(v) => Scalar::I32(*v),
            Owned::U32(v) => Scalar::U32(*v),
            Owned::I64(v) => Scalar::I64(*v),
            Owned::U64(v) => Scalar::U64(*v),
            Owned::ISize(v) => Scalar::ISize(*v),
            Owned::USize(v) => Scalar::USize(*v),
            Owned::F32(v) => Scalar::F32(*v),
            Owned::F64(v) => Scalar::F64(*v),
            Owned::Real(v) => Scalar::Real(*v),
            Owned::Bytes(v) => Scalar::Bytes(v),
            Owned::Text(v) => Scalar::Text(v),
            Owned::Blob(v) => Scalar::Blob(&v.0),
            Owned::Datetime(v) => Scalar::Datetime(*v),
            Owned::Timestamp(v) => Scalar::Timestamp(*v),
            Owned::Raw(code, bytes) => Scalar::Raw(Raw::new(*code, bytes)),
        }
    }
}

/// A parsed literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Value(Owned),
    Ref { kind: Kind, target: Option<Owned> },
}

impl ToParam for Literal {
    fn to_param(&self) -> Param<'_> {
        match self {
            Literal::Null => Param::Null,
            Literal::Value(v) => Param::Value(v.scalar()),
            Literal::Ref { kind, target } => Param::Ref {
                kind: *kind,
                target: target.as_ref().map(Owned::scalar),
            },
        }
    }
}

/// Parse a complete literal.
pub fn parse_literal(input: &str) -> BindResult<Literal> {
    let input = input.trim();

    match parse_any(input) {
        Ok(("", lit)) => Ok(lit),
        Ok((remaining, _)) => Err(BindError::literal(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(BindError::literal(
            input.len() - e.input.len(),
            format!("Expected {:?}", e.code),
        )),
        Err(e) => Err(BindError::literal(0, format!("Parse failed: {:?}", e))),
    }
}

fn parse_any(input: &str) -> IResult<&str, Literal> {
    alt((value(Literal::Null, tag_no_case("null")), parse_ref, parse_value))(input)
}

/// `&kind` or `&kind:body`. Raw values carry their own indirection and
/// have no reference form.
fn parse_ref(input: &str) -> IResult<&str, Literal> {
    let (input, _) = char('&')(input)?;
    let (input, kind) = verify(parse_kind, |kind: &Kind| !matches!(kind, Kind::Raw(_)))(input)?;
    match input.strip_prefix(':') {
        Some(body) => {
            let (input, owned) = parse_body(kind, body)?;
            Ok((input, Literal::Ref { kind, target: Some(owned) }))
        }
        None => Ok((input, Literal::Ref { kind, target: None })),
    }
}

fn parse_value(input: &str) -> IResult<&str, Literal> {
    let (input, kind) = parse_kind(input)?;
    let (input, _) = char(':')(input)?;
    let (input, owned) = parse_body(kind, input)?;
    Ok((input, Literal::Value(owned)))
}

/// Parse a kind tag.
fn parse_kind(input: &str) -> IResult<&str, Kind> {
    alt((
        alt((
            value(Kind::ISize, tag("isize")),
            value(Kind::USize, tag("usize")),
            value(Kind::I8, tag("i8")),
            value(Kind::U8, tag("u8")),
            value(Kind::I16, tag("i16")),
            value(Kind::U16, tag("u16")),
            value(Kind::I32, tag("i32")),
            value(Kind::U32, tag("u32")),
            value(Kind::I64, tag("i64")),
            value(Kind::U64, tag("u64")),
        )),
        alt((
            value(Kind::F32, tag("f32")),
            value(Kind::F64, tag("f64")),
            value(Kind::Real, tag("real")),
            value(Kind::Bytes, tag("bytes")),
            value(Kind::Text, tag("text")),
            value(Kind::Blob, tag("blob")),
            value(Kind::Datetime, tag("datetime")),
            value(Kind::Timestamp, tag("timestamp")),
        )),
        parse_raw_kind,
    ))(input)
}

/// `raw(int24)` or `raw(9)`.
fn parse_raw_kind(input: &str) -> IResult<&str, Kind> {
    let (input, _) = tag("raw(")(input)?;
    let (input, code) = alt((
        map_res(digit1, |d: &str| d.parse::<u8>().map(|c| WireType::from_bits(c as u16))),
        map_opt(
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            WireType::from_name,
        ),
    ))(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Kind::Raw(code)))
}

fn parse_body(kind: Kind, input: &str) -> IResult<&str, Owned> {
    match kind {
        Kind::I8 => map(signed, Owned::I8)(input),
        Kind::U8 => map(number, Owned::U8)(input),
        Kind::I16 => map(signed, Owned::I16)(input),
        Kind::U16 => map(number, Owned::U16)(input),
        Kind::I32 => map(signed, Owned::I32)(input),
        Kind::U32 => map(number, Owned::U32)(input),
        Kind::I64 => map(signed, Owned::I64)(input),
        Kind::U64 => map(number, Owned::U64)(input),
        Kind::ISize => map(signed, Owned::ISize)(input),
        Kind::USize => map(number, Owned::USize)(input),
        Kind::F32 => map(float, Owned::F32)(input),
        Kind::F64 => map(float, Owned::F64)(input),
        Kind::Real => map(float, Owned::Real)(input),
        Kind::Bytes => map(hex_bytes, Owned::Bytes)(input),
        Kind::Blob => map(hex_bytes, |b| Owned::Blob(Blob(b)))(input),
        Kind::Text => map(rest, |s: &str| Owned::Text(s.to_string()))(input),
        Kind::Datetime => map(parse_datetime, Owned::Datetime)(input),
        Kind::Timestamp => map(parse_datetime, Owned::Timestamp)(input),
        Kind::Raw(code) => map(hex_bytes, move |b| Owned::Raw(code, b))(input),
    }
}

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse::<T>)(input)
}

fn signed<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<T>)(input)
}

fn float<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(recognize_float, str::parse::<T>)(input)
}

fn hex_bytes(input: &str) -> IResult<&str, Vec<u8>> {
    let (input, _) = opt(tag("0x"))(input)?;
    map_opt(take_while(|c: char| c.is_ascii_hexdigit()), decode_hex)(input)
}

fn decode_hex(digits: &str) -> Option<Vec<u8>> {
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

/// `YYYY-MM-DD[( |T)HH:MM:SS[.ffffff]]`
fn parse_datetime(input: &str) -> IResult<&str, Datetime> {
    let (input, (year, _, month, _, day)) =
        tuple((number::<u16>, char('-'), number::<u8>, char('-'), number::<u8>))(input)?;
    let (input, time) = opt(preceded(
        one_of(" T"),
        tuple((
            number::<u8>,
            char(':'),
            number::<u8>,
            char(':'),
            number::<u8>,
            opt(preceded(char('.'), fraction)),
        )),
    ))(input)?;

    let mut d = Datetime::date(year, month, day);
    if let Some((hour, _, minute, _, second, micros)) = time {
        d = d.with_time(hour, minute, second).with_micros(micros.unwrap_or(0));
    }
    Ok((input, d))
}

/// Up to six fractional digits, scaled to microseconds.
fn fraction(input: &str) -> IResult<&str, u32> {
    map_opt(digit1, |digits: &str| {
        if digits.len() > 6 {
            return None;
        }
        format!("{:0<6}", digits).parse().ok()
    })(input)
}
