//! Information group parsing.
//!
//! ```text
//! historical: LABEL SP DATA SP CHECKSUM
//! standard:   LABEL HT [HORODATE HT] DATA HT CHECKSUM
//! ```

use crate::checksum;
use core_types::{DataGroup, ProtocolMode};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Wrong field count for the active mode.
    #[error("invalid {mode} group: found {found} fields, expected {expected}")]
    MalformedGroup {
        mode: ProtocolMode,
        found: usize,
        expected: &'static str,
    },
}

/// Splits one raw group (bytes between LF and CR) into its fields and checks
/// the checksum.
///
/// A checksum mismatch is reported through [`DataGroup::valid`], only a wrong
/// field count is an error.
pub fn parse_group(raw: &str, mode: ProtocolMode) -> Result<DataGroup, DecodeError> {
    match mode {
        ProtocolMode::Historical => parse_historical(raw),
        ProtocolMode::Standard => parse_standard(raw),
    }
}

fn parse_historical(raw: &str) -> Result<DataGroup, DecodeError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let (label, data, claimed) = match fields.as_slice() {
        [label, data, claimed] => (*label, *data, *claimed),
        // A checksum of 0x20 is indistinguishable from a separator once
        // whitespace is collapsed: "LABEL DATA" followed by SP SP.
        [label, data] if raw.ends_with("  ") => (*label, *data, " "),
        _ => {
            return Err(DecodeError::MalformedGroup {
                mode: ProtocolMode::Historical,
                found: fields.len(),
                expected: "3",
            })
        }
    };

    let span = format!("{} {}", label, data);
    Ok(DataGroup {
        label: label.to_string(),
        data: data.to_string(),
        horodate: None,
        checksum: claimed.to_string(),
        valid: matches_checksum(span.as_bytes(), claimed, None),
    })
}

fn parse_standard(raw: &str) -> Result<DataGroup, DecodeError> {
    let fields: Vec<&str> = raw.split('\t').collect();
    let (label, horodate, data, claimed) = match fields.as_slice() {
        [label, horodate, data, claimed] => (*label, Some(*horodate), *data, *claimed),
        [label, data, claimed] => (*label, None, *data, *claimed),
        _ => {
            return Err(DecodeError::MalformedGroup {
                mode: ProtocolMode::Standard,
                found: fields.len(),
                expected: "3 or 4",
            })
        }
    };

    let span = match horodate {
        Some(h) => format!("{}\t{}\t{}", label, h, data),
        None => format!("{}\t{}", label, data),
    };
    // Linky meters sum up to and including the separator before the checksum.
    let valid = matches_checksum(span.as_bytes(), claimed, Some(b'\t'));

    Ok(DataGroup {
        label: label.to_string(),
        data: data.to_string(),
        horodate: horodate.map(str::to_string),
        checksum: claimed.to_string(),
        valid,
    })
}

fn matches_checksum(span: &[u8], claimed: &str, trailing: Option<u8>) -> bool {
    let [c] = claimed.as_bytes() else {
        return false;
    };
    if checksum::verify(span, *c) {
        return true;
    }
    match trailing {
        Some(sep) => {
            let mut extended = Vec::with_capacity(span.len() + 1);
            extended.extend_from_slice(span);
            extended.push(sep);
            checksum::verify(&extended, *c)
        }
        None => false,
    }
}

/// Builds the raw text of a group with a freshly computed checksum.
///
/// `horodate` is only emitted in standard mode.
pub fn encode_group(
    mode: ProtocolMode,
    label: &str,
    horodate: Option<&str>,
    data: &str,
) -> String {
    let sep = char::from(mode.separator());
    let span = match (mode, horodate) {
        (ProtocolMode::Standard, Some(h)) => format!("{label}{sep}{h}{sep}{data}"),
        _ => format!("{label}{sep}{data}"),
    };
    let c = char::from(checksum::compute(span.as_bytes()));
    format!("{span}{sep}{c}")
}
