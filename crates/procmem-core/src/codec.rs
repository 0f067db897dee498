//! Typed literal to raw bytes conversion.
//!
//! Every byte payload built from the command line (write data, search
//! needles, replacement data) goes through [`encode`]. A type spec is a tag
//! such as `i32` or `string0`, optionally prefixed with a byte-order marker:
//!
//! | prefix     | order          |
//! |------------|----------------|
//! | `<`        | little endian  |
//! | `>` / `!`  | big endian     |
//! | `=` / `@`  | native         |
//!
//! Without a prefix numeric values use native order.

use std::str::FromStr;

use strum::{EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Closed set of literal types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum TypeTag {
    #[strum(to_string = "bytes", serialize = "b")]
    Bytes,
    #[strum(to_string = "string", serialize = "s")]
    String,
    #[strum(to_string = "string0", serialize = "s0")]
    String0,
    #[strum(to_string = "int8", serialize = "i8")]
    Int8,
    #[strum(to_string = "uint8", serialize = "ui8")]
    UInt8,
    #[strum(to_string = "int16", serialize = "i16")]
    Int16,
    #[strum(to_string = "uint16", serialize = "ui16")]
    UInt16,
    #[strum(to_string = "int32", serialize = "i32")]
    Int32,
    #[strum(to_string = "uint32", serialize = "ui32")]
    UInt32,
    #[strum(to_string = "int64", serialize = "i64")]
    Int64,
    #[strum(to_string = "uint64", serialize = "ui64")]
    UInt64,
    #[strum(to_string = "float", serialize = "f")]
    Float,
    #[strum(to_string = "double", serialize = "d")]
    Double,
}

impl TypeTag {
    /// Encoded width for fixed-size numeric tags, `None` for byte and string tags.
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Bytes | Self::String | Self::String0 => None,
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double => Some(8),
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoStaticStr)]
pub enum ByteOrder {
    Little,
    Big,
    #[default]
    Native,
}

impl ByteOrder {
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '<' => Some(Self::Little),
            '>' | '!' => Some(Self::Big),
            '=' | '@' => Some(Self::Native),
            _ => None,
        }
    }
}

/// A parsed type spec: tag plus byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub tag: TypeTag,
    pub order: ByteOrder,
}

impl Default for TypeSpec {
    fn default() -> Self {
        Self {
            tag: TypeTag::Bytes,
            order: ByteOrder::Native,
        }
    }
}

impl FromStr for TypeSpec {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        let mut chars = spec.chars();
        let (order, name) = match chars.next().and_then(ByteOrder::from_prefix) {
            Some(order) => (Some(order), chars.as_str()),
            None => (None, spec),
        };
        let tag = TypeTag::from_str(name).map_err(|_| Error::InvalidType(spec.to_string()))?;
        // byte order only applies to numeric tags
        if order.is_some() && tag.width().is_none() {
            return Err(Error::InvalidType(spec.to_string()));
        }
        Ok(Self {
            tag,
            order: order.unwrap_or_default(),
        })
    }
}

macro_rules! pack {
    ($ty:ty, $text:expr, $order:expr) => {{
        let value: $ty = parse_number($text)?;
        match $order {
            ByteOrder::Little => value.to_le_bytes().to_vec(),
            ByteOrder::Big => value.to_be_bytes().to_vec(),
            ByteOrder::Native => value.to_ne_bytes().to_vec(),
        }
    }};
}

/// Convert `text` into bytes according to the type spec string `spec`.
pub fn encode(text: &str, spec: &str) -> Result<Vec<u8>> {
    encode_with(text, spec.parse()?)
}

/// Convert `text` into bytes according to an already parsed [`TypeSpec`].
pub fn encode_with(text: &str, spec: TypeSpec) -> Result<Vec<u8>> {
    let order = spec.order;
    let bytes = match spec.tag {
        TypeTag::Bytes => decode_hex(text)?,
        TypeTag::String => text.as_bytes().to_vec(),
        TypeTag::String0 => {
            let mut bytes = text.as_bytes().to_vec();
            bytes.push(0);
            bytes
        }
        TypeTag::Int8 => pack!(i8, text, order),
        TypeTag::UInt8 => pack!(u8, text, order),
        TypeTag::Int16 => pack!(i16, text, order),
        TypeTag::UInt16 => pack!(u16, text, order),
        TypeTag::Int32 => pack!(i32, text, order),
        TypeTag::UInt32 => pack!(u32, text, order),
        TypeTag::Int64 => pack!(i64, text, order),
        TypeTag::UInt64 => pack!(u64, text, order),
        TypeTag::Float => {
            // Narrowed from f64 so the result matches a C `float` cast of the literal.
            let value = parse_number::<f64>(text)? as f32;
            match order {
                ByteOrder::Little => value.to_le_bytes().to_vec(),
                ByteOrder::Big => value.to_be_bytes().to_vec(),
                ByteOrder::Native => value.to_ne_bytes().to_vec(),
            }
        }
        TypeTag::Double => pack!(f64, text, order),
    };

    if let Some(width) = spec.tag.width() {
        debug_assert_eq!(bytes.len(), width);
    }
    Ok(bytes)
}

fn parse_number<T>(text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| Error::Format(format!("invalid number {:?}: {}", text, e)))
}

/// Decode a hex digit string such as `"de ad be ef"` into bytes.
///
/// Whitespace may separate byte pairs but not the two digits of a byte.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len() / 2);
    let mut rest = text.trim_start().as_bytes();

    while !rest.is_empty() {
        let [hi, lo, tail @ ..] = rest else {
            return Err(Error::Format(format!(
                "odd number of hex digits in {:?}",
                text
            )));
        };
        match (hex_value(*hi), hex_value(*lo)) {
            (Some(hi), Some(lo)) => bytes.push(hi << 4 | lo),
            _ => return Err(Error::Format(format!("non-hex character in {:?}", text))),
        }
        rest = tail.trim_ascii_start();
    }

    Ok(bytes)
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}
