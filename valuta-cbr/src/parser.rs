use std::borrow::Cow;

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use valuta_core::{BulletinParser, ParseError, RateRecord};

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses `ValCurs` daily bulletins into per-unit rate records.
///
/// Each `<Valute>` contributes one record named after its `<Name>`, with rate
/// `Value / Nominal` and the bulletin's `Date` attribute as its date. Other elements
/// (`NumCode`, `CharCode`, `VunitRate`, ...) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CbrParser;

impl CbrParser {
    /// Create a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Nominal", default)]
    nominal: String,
    #[serde(rename = "Value", default)]
    value: String,
}

impl BulletinParser for CbrParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RateRecord>, ParseError> {
        let text = decode(bytes)?;
        let doc: ValCurs = serde_xml_rs::from_str(strip_declaration(&text))
            .map_err(|e| ParseError::Xml(e.to_string()))?;

        let raw_date = doc
            .date
            .ok_or_else(|| ParseError::Xml("missing Date attribute on ValCurs".into()))?;
        let date = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT)
            .map_err(|_| ParseError::InvalidDate { value: raw_date.clone() })?;

        let records = doc
            .valutes
            .into_iter()
            .map(|v| to_record(v, date))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%date, records = records.len(), "parsed bulletin");

        Ok(records)
    }
}

fn to_record(v: Valute, date: NaiveDate) -> Result<RateRecord, ParseError> {
    let nominal: u32 = v
        .nominal
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNominal {
            currency: v.name.clone(),
            value: v.nominal.clone(),
        })?;
    let value = parse_decimal(&v.value).ok_or_else(|| ParseError::InvalidValue {
        currency: v.name.clone(),
        value: v.value.clone(),
    })?;
    RateRecord::from_nominal(v.name, value, nominal, date)
}

// Accepts both `75,50` and `75.50`.
fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(ParseError::Encoding(format!(
            "bytes are not valid {}",
            encoding.name()
        )));
    }
    Ok(text)
}

/// Encoding named by `<?xml ... encoding="..."?>`, if the document has a prolog.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let Ok(Event::Decl(decl)) = reader.read_event() else {
        return Ok(None);
    };
    let Some(label) = decl.encoding() else {
        return Ok(None);
    };
    let label = label.map_err(|e| ParseError::Encoding(e.to_string()))?;
    Encoding::for_label(&label).map(Some).ok_or_else(|| {
        ParseError::Encoding(format!(
            "unknown encoding '{}'",
            String::from_utf8_lossy(&label)
        ))
    })
}

// The text is already decoded, so a stale encoding declaration must not reach the
// XML reader.
fn strip_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return &trimmed[end + 2..];
    }
    text
}
