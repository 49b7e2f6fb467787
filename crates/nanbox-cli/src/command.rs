// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// command.rs:

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use nanbox::{BoxedValue, Tagged};
use std::ffi::CString;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Radix {
    Hex,
    Bin,
}

impl FromStr for Radix {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Radix::Hex),
            "bin" => Ok(Radix::Bin),
            other => Err(anyhow!("unknown radix `{other}`, expecting `hex` or `bin`")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Double,
    Nan,
    Bool,
    Null,
    Uint,
    Sint,
    Pointer,
    String,
    Auto,
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <Kind as ValueEnum>::from_str(s, true).map_err(|_| anyhow!("unknown kind `{s}`"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Encode { kind: Kind, value: Option<String> },
    Decode { word: String },
}

/// Parses one REPL line: `encode <kind> [value]`, `decode <word>`, or the `encode`
/// shorthand `<kind> [value]`.
pub fn parse_line(line: &str) -> Result<Request> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => bail!("empty input"),
        "decode" if rest.is_empty() => bail!("decode: missing word"),
        "decode" => Ok(Request::Decode {
            word: rest.to_string(),
        }),
        "encode" => parse_line(rest).and_then(|request| match request {
            Request::Encode { .. } => Ok(request),
            Request::Decode { .. } => bail!("encode: missing kind"),
        }),
        kind => Ok(Request::Encode {
            kind: kind.parse()?,
            value: (!rest.is_empty()).then(|| rest.to_string()),
        }),
    }
}

pub struct Report {
    pub value: BoxedValue,
    pub rendering: String,
}

impl Report {
    // string payloads are rendered while the caller still holds the pointee
    fn new(value: BoxedValue, rendering: String) -> Self {
        Self { value, rendering }
    }

    pub fn display(&self, radix: Radix) -> ReportDisplay<'_> {
        ReportDisplay(self, radix)
    }
}

pub struct ReportDisplay<'a>(&'a Report, Radix);

impl Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let ReportDisplay(report, radix) = self;
        let bits = report.value.to_bits();
        match radix {
            Radix::Hex => write!(f, "0x{:016X}", bits)?,
            Radix::Bin => write!(f, "0b{:064b}", bits)?,
        }
        write!(f, "  {:<7} {}", report.value.type_name(), report.rendering)?;
        if let Some(Tagged {
            signature,
            tag,
            payload,
        }) = report.value.tagged()
        {
            write!(
                f,
                "  [signature={:#06x} tag={} payload={:#014x}]",
                signature, tag, payload
            )?;
        }
        Ok(())
    }
}

/// The `--radix` flag wins over the `NANBOX_RADIX` setting; hex is the default.
pub fn resolve_radix(flag: Option<Radix>, setting: Option<&str>) -> Result<Radix> {
    match (flag, setting) {
        (Some(radix), _) => Ok(radix),
        (None, Some(setting)) => setting.parse().context("invalid NANBOX_RADIX setting"),
        (None, None) => Ok(Radix::Hex),
    }
}

pub fn evaluate(request: &Request) -> Result<Report> {
    match request {
        Request::Encode { kind, value } => encode(*kind, value.as_deref()),
        Request::Decode { word } => decode(word),
    }
}

fn required<'a>(kind: Kind, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| anyhow!("{kind:?}: missing value"))
}

pub fn encode(kind: Kind, value: Option<&str>) -> Result<Report> {
    let boxed = match kind {
        Kind::Double => BoxedValue::from_double(parse_double(required(kind, value)?)?),
        Kind::Nan => BoxedValue::NAN,
        Kind::Bool => BoxedValue::from_bool(required(kind, value)?.parse()?),
        Kind::Null => BoxedValue::NULL,
        Kind::Uint => BoxedValue::from_uint(required(kind, value)?.parse()?),
        Kind::Sint => BoxedValue::from_sint(required(kind, value)?.parse()?),
        Kind::Pointer => {
            let address = parse_word(required(kind, value)?)?;
            if address >> 48 != 0 {
                bail!("address {address:#x} does not fit in 48 bits");
            }
            BoxedValue::from_pointer(address as usize as *const u8)
        }
        Kind::String => {
            let text = CString::new(unquote(required(kind, value)?))?;
            let boxed = BoxedValue::from_string(&text);
            // SAFETY: `text` outlives the rendering.
            let rendering = format!("{:?}", unsafe { boxed.rendered() }.to_string());
            return Ok(Report::new(boxed, rendering));
        }
        Kind::Auto => return auto(required(kind, value)?),
    };
    Ok(Report::new(boxed, boxed.to_string()))
}

/// Boxes a literal following the generic dispatch rules. Quoted text becomes a
/// pointer, not a string.
fn auto(literal: &str) -> Result<Report> {
    let boxed = match literal {
        "null" => BoxedValue::from(()),
        "true" => BoxedValue::from(true),
        "false" => BoxedValue::from(false),
        _ if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') => {
            let text = CString::new(unquote(literal))?;
            let boxed = BoxedValue::from(text.as_c_str());
            return Ok(Report::new(boxed, boxed.to_string()));
        }
        _ if literal.starts_with('-') && literal.parse::<i32>().is_ok() => {
            BoxedValue::from(literal.parse::<i32>()?)
        }
        _ if literal.parse::<u32>().is_ok() => BoxedValue::from(literal.parse::<u32>()?),
        _ if is_integer(literal) => {
            bail!("unsupported literal `{literal}`: integer does not fit in u32 or i32")
        }
        _ => BoxedValue::from(
            parse_double(literal)
                .with_context(|| format!("unsupported literal `{literal}`"))?,
        ),
    };
    Ok(Report::new(boxed, boxed.to_string()))
}

fn is_integer(literal: &str) -> bool {
    let digits = literal.strip_prefix(['-', '+']).unwrap_or(literal);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

pub fn decode(word: &str) -> Result<Report> {
    let boxed = BoxedValue::from_bits(parse_word(word)?);
    Ok(Report::new(boxed, boxed.to_string()))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn parse_double(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .with_context(|| format!("invalid double `{text}`"))
}

fn parse_word(text: &str) -> Result<u64> {
    let text = text.replace('_', "");
    let parsed = if let Some(hex) = text.strip_prefix("0x").or(text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        text.parse()
    };
    parsed.with_context(|| format!("invalid word `{text}`"))
}
