//! Frame envelope, checksum and acknowledgement handling
//!
//! Standard frame:
//! ```text
//! <ID{id:02X}>{payload}{checksum:02X}<E>
//! ```
//! Identity assignment frame (no current ID, no checksum):
//! ```text
//! <ID><{new_id:02X}><E>
//! ```

use crate::core::SignId;
use crate::message::Message;

/// Acknowledgement sent by the sign for every accepted frame except ID assignment
pub const ACK: &[u8] = b"ACK";

/// Frame terminator
pub const TERMINATOR: &[u8] = b"<E>";

/// XOR of every payload byte
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// An addressed frame ready to be written to the sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    id: SignId,
    payload: Vec<u8>,
}

impl Frame {
    /// Wrap a rendered payload for the given sign
    pub fn new(id: SignId, payload: impl Into<Vec<u8>>) -> Self {
        Frame {
            id,
            payload: payload.into(),
        }
    }

    /// Addressed sign
    pub fn id(&self) -> SignId {
        self.id
    }

    /// Rendered message payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload checksum
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Bytes on the wire: `<ID` + 2 + `>` + payload + 2 + `<E>`
    pub fn wire_size(&self) -> usize {
        4 + 2 + self.payload.len() + 2 + TERMINATOR.len()
    }

    /// Serialize into the standard envelope
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_size());
        out.extend_from_slice(format!("<ID{:02X}>", self.id.value()).as_bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(format!("{:02X}", self.checksum()).as_bytes());
        out.extend_from_slice(TERMINATOR);
        out
    }
}

/// What the sign sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Literal `ACK`
    Ack,
    /// Two hex digits echoing a newly assigned ID
    IdEcho(u8),
    /// Anything else, including nothing at all
    Other(Vec<u8>),
}

/// Encoder and acknowledgement checks for AM03127 frames
pub struct FrameCodec;

impl FrameCodec {
    /// Wrap a payload in the standard envelope
    pub fn encode(id: SignId, payload: &[u8]) -> Vec<u8> {
        Frame::new(id, payload).to_bytes()
    }

    /// Build the ID assignment envelope
    ///
    /// Every sign on the line accepts this frame, so it carries neither a
    /// current ID nor a checksum.
    pub fn encode_identity(new_id: SignId) -> Vec<u8> {
        format!("<ID><{}><E>", new_id.to_hex()).into_bytes()
    }

    /// Response the sign sends when it accepts `message`
    pub fn expected_response(message: &Message) -> Vec<u8> {
        match message {
            Message::SetId { new_id } => new_id.to_hex().into_bytes(),
            _ => ACK.to_vec(),
        }
    }

    /// Byte-exact comparison; a short, long or empty response is a failure
    pub fn is_success(response: &[u8], expected: &[u8]) -> bool {
        response == expected
    }

    /// Classify raw response bytes
    pub fn decode_response(response: &[u8]) -> Response {
        if response == ACK {
            return Response::Ack;
        }

        let is_upper_hex = |b: &u8| b.is_ascii_digit() || (b'A'..=b'F').contains(b);
        if let [hi, lo] = response {
            if is_upper_hex(hi) && is_upper_hex(lo) {
                let digit = |b: u8| (b as char).to_digit(16).unwrap_or(0) as u8;
                return Response::IdEcho(digit(*hi) << 4 | digit(*lo));
            }
        }

        Response::Other(response.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(value: u8) -> SignId {
        SignId::new(value).unwrap()
    }

    #[test]
    fn test_checksum_xor() {
        assert_eq!(checksum(b""), 0);
        assert_eq!(checksum(b"A"), 0x41);
        assert_eq!(checksum(b"AA"), 0);
        assert_eq!(checksum(b"<D*>"), b'<' ^ b'D' ^ b'*' ^ b'>');
    }

    #[test]
    fn test_encode_envelope() {
        let bytes = FrameCodec::encode(id(1), b"<D*>");
        let expected = format!("<ID01><D*>{:02X}<E>", checksum(b"<D*>"));
        assert_eq!(bytes, expected.into_bytes());
    }

    #[test]
    fn test_encode_pads_id_and_checksum() {
        let bytes = FrameCodec::encode(id(0x0A), b"AB");
        // 'A' ^ 'B' == 0x03
        assert_eq!(bytes, b"<ID0A>AB03<E>".to_vec());
    }

    #[test]
    fn test_frame_wire_size() {
        let frame = Frame::new(id(1), b"<DU>".to_vec());
        assert_eq!(frame.to_bytes().len(), frame.wire_size());
        assert_eq!(frame.payload(), b"<DU>");
    }

    #[test]
    fn test_encode_identity() {
        assert_eq!(FrameCodec::encode_identity(id(5)), b"<ID><05><E>".to_vec());
        assert_eq!(FrameCodec::encode_identity(id(0xAB)), b"<ID><AB><E>".to_vec());
    }

    #[test]
    fn test_expected_response() {
        assert_eq!(
            FrameCodec::expected_response(&Message::SetId { new_id: id(5) }),
            b"05".to_vec()
        );
        assert_eq!(FrameCodec::expected_response(&Message::DeleteAll), ACK.to_vec());
    }

    #[test]
    fn test_is_success_is_exact() {
        assert!(FrameCodec::is_success(b"ACK", ACK));
        assert!(!FrameCodec::is_success(b"AC", ACK));
        assert!(!FrameCodec::is_success(b"ACK\r\n", ACK));
        assert!(!FrameCodec::is_success(b"", ACK));
        assert!(!FrameCodec::is_success(b"NAK", ACK));
    }

    #[test]
    fn test_decode_response() {
        assert_eq!(FrameCodec::decode_response(b"ACK"), Response::Ack);
        assert_eq!(FrameCodec::decode_response(b"0F"), Response::IdEcho(0x0F));
        assert_eq!(
            FrameCodec::decode_response(b"0f"),
            Response::Other(b"0f".to_vec())
        );
        assert_eq!(FrameCodec::decode_response(b""), Response::Other(Vec::new()));
    }

    proptest! {
        #[test]
        fn prop_checksum_order_independent(payload in proptest::collection::vec(any::<u8>(), 0..128)) {
            let mut sorted = payload.clone();
            sorted.sort_unstable();
            let mut reversed = payload.clone();
            reversed.reverse();

            prop_assert_eq!(checksum(&payload), checksum(&sorted));
            prop_assert_eq!(checksum(&payload), checksum(&reversed));
        }

        #[test]
        fn prop_encode_keeps_payload(raw_id in 1u8..=255, payload in proptest::collection::vec(any::<u8>(), 0..128)) {
            let bytes = FrameCodec::encode(id(raw_id), &payload);
            let header = format!("<ID{:02X}>", raw_id).into_bytes();

            prop_assert!(bytes.starts_with(&header));
            prop_assert!(bytes.ends_with(TERMINATOR));
            prop_assert_eq!(&bytes[header.len()..header.len() + payload.len()], &payload[..]);

            let trailer = format!("{:02X}<E>", checksum(&payload)).into_bytes();
            prop_assert_eq!(&bytes[header.len() + payload.len()..], &trailer[..]);
        }

        #[test]
        fn prop_is_success_only_on_equality(response in proptest::collection::vec(any::<u8>(), 0..6)) {
            prop_assert_eq!(FrameCodec::is_success(&response, ACK), response == ACK);
        }
    }
}
