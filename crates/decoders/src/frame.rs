use crate::group::parse_group;
use core_types::{DataGroup, Decoder, Frame, ProtocolMode, CR, LF};

/// Position of the scanner relative to the LF…CR group delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    OutsideGroup,
    InsideGroup,
}

/// Decodes the body of one frame (the bytes between STX and ETX).
///
/// Groups are delimited by LF (start) and CR (end). Bytes outside a group are
/// ignored, and an LF inside a group restarts it. The first malformed group
/// aborts the whole frame: the result then carries the error and the raw group
/// text instead of any groups.
///
/// TIC is 7-bit ASCII. A group holding a byte of 0x80 or above is decoded
/// with lossy UTF-8 replacement and always reported with `valid = false`,
/// since its checksum span no longer matches what was on the wire.
pub fn decode_frame(body: &[u8], mode: ProtocolMode) -> Frame {
    let mut state = GroupState::OutsideGroup;
    let mut buffer: Vec<u8> = Vec::with_capacity(64);
    let mut groups: Vec<DataGroup> = Vec::new();

    for &b in body {
        match (state, b) {
            (_, LF) => {
                buffer.clear();
                state = GroupState::InsideGroup;
            }
            (GroupState::InsideGroup, CR) => {
                state = GroupState::OutsideGroup;
                let raw = String::from_utf8_lossy(&buffer);
                if raw.trim().is_empty() {
                    continue;
                }
                match parse_group(&raw, mode) {
                    Ok(mut group) if !group.label.is_empty() => {
                        if !buffer.is_ascii() {
                            group.valid = false;
                        }
                        groups.push(group);
                    }
                    Ok(_) => {}
                    Err(e) => return Frame::failed(e.to_string(), raw.into_owned()),
                }
            }
            (GroupState::InsideGroup, _) => buffer.push(b),
            (GroupState::OutsideGroup, _) => {}
        }
    }

    Frame::decoded(groups)
}

/// [`Decoder`] bound to one protocol mode.
#[derive(Debug, Clone, Copy)]
pub struct TicDecoder {
    mode: ProtocolMode,
}

impl TicDecoder {
    pub fn new(mode: ProtocolMode) -> Self {
        Self { mode }
    }
}

impl Decoder for TicDecoder {
    fn decode(&mut self, body: &[u8]) -> Frame {
        decode_frame(body, self.mode)
    }

    fn mode(&self) -> ProtocolMode {
        self.mode
    }

    fn name(&self) -> &'static str {
        match self.mode {
            ProtocolMode::Historical => "TIC historical",
            ProtocolMode::Standard => "TIC standard",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HISTORICAL_BODY: &[u8] = b"\nADCO 012345678901 E\r\nOPTARIF BASE 0\r\nISOUSC 45 ?\r";

    #[test]
    fn test_decode_historical() {
        let frame = decode_frame(HISTORICAL_BODY, ProtocolMode::Historical);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 3);
        assert_eq!(frame.groups[0].label, "ADCO");
        assert_eq!(frame.groups[0].data, "012345678901");
        assert_eq!(frame.groups[1].label, "OPTARIF");
        assert_eq!(frame.groups[1].data, "BASE");
        assert_eq!(frame.groups[2].label, "ISOUSC");
        assert!(frame.groups.iter().all(|g| g.valid));
    }

    #[test]
    fn test_decode_standard() {
        let body = b"\nADSC\t041876097468\tI\r\
            \nVTIC\t02\tJ\r\
            \nDATE\tH250221001022\t\t2\r\
            \nNGTF\t      BASE      \t<\r\
            \nSMAXSN\tH250221001022\t02560\t+\r";
        let frame = decode_frame(body, ProtocolMode::Standard);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 5);
        assert_eq!(frame.get("NGTF").unwrap().data, "      BASE      ");
        assert_eq!(frame.get("DATE").unwrap().data, "");
        assert_eq!(
            frame.get("SMAXSN").unwrap().horodate.as_deref(),
            Some("H250221001022")
        );
        assert_eq!(frame.invalid_groups(), 0);
    }

    #[test]
    fn test_invalid_checksum_keeps_frame() {
        let frame = decode_frame(
            b"\nADCO 012345678901 C\r\nOPTARIF BASE 0\r",
            ProtocolMode::Historical,
        );
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 2);
        assert!(!frame.groups[0].valid);
        assert!(frame.groups[1].valid);
    }

    #[test]
    fn test_malformed_group_poisons_frame() {
        let frame = decode_frame(
            b"\nADCO 012345678901 E\r\nBROKEN\r\nOPTARIF BASE 0\r",
            ProtocolMode::Historical,
        );
        assert!(frame.is_error());
        assert!(frame.groups.is_empty());
        let error = frame.error.unwrap();
        assert_eq!(error.details, "BROKEN");
        assert!(error.message.contains("historical"));
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let frame = decode_frame(
            b"\n\r\n   \r\nADCO 012345678901 E\r",
            ProtocolMode::Historical,
        );
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 1);

        // Standard group with an empty label parses but is not kept
        let frame = decode_frame(b"\n\t012\tA\r\nVTIC\t02\tJ\r", ProtocolMode::Standard);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 1);
        assert_eq!(frame.groups[0].label, "VTIC");
    }

    #[test]
    fn test_cr_outside_group_is_ignored() {
        let frame = decode_frame(
            b"\r\rnoise\r\nOPTARIF BASE 0\r\r",
            ProtocolMode::Historical,
        );
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 1);
    }

    #[test]
    fn test_lf_restarts_group() {
        let frame = decode_frame(b"\nGARBAGE\nOPTARIF BASE 0\r", ProtocolMode::Historical);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 1);
        assert_eq!(frame.groups[0].label, "OPTARIF");
    }

    #[test]
    fn test_unterminated_group_is_ignored() {
        let frame = decode_frame(b"\nOPTARIF BASE 0\r\nISOUSC 4", ProtocolMode::Historical);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 1);
    }

    #[test]
    fn test_non_ascii_group_is_never_valid() {
        // 'W' is the checksum of the lossy text "PTEC \u{FFFD}", not of the wire bytes
        let frame = decode_frame(b"\nPTEC \xb0 W\r\nOPTARIF BASE 0\r", ProtocolMode::Historical);
        assert!(!frame.is_error());
        assert_eq!(frame.groups.len(), 2);
        assert_eq!(frame.groups[0].label, "PTEC");
        assert_eq!(frame.groups[0].data, "\u{FFFD}");
        assert!(!frame.groups[0].valid);
        assert!(frame.groups[1].valid);
    }

    #[test]
    fn test_decoder_trait() {
        let mut decoder = TicDecoder::new(ProtocolMode::Historical);
        assert_eq!(decoder.mode(), ProtocolMode::Historical);
        assert_eq!(decoder.name(), "TIC historical");

        let before = chrono::Utc::now();
        let frame = decoder.decode(HISTORICAL_BODY);
        assert_eq!(frame.groups.len(), 3);
        assert!(frame.timestamp >= before);
    }
}
