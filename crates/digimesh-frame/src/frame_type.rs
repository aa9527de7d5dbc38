//! API frame type identifiers (byte 3 of every frame).
//!
//! Types below 0x80 are requests sent to the local radio.
//! Types 0x80 and above are produced by the radio.

/// Local AT command.
pub const AT_COMMAND: u8 = 0x08;

/// Transmit request to a remote node.
pub const TRANSMIT_REQUEST: u8 = 0x10;

/// Response to a local AT command.
pub const AT_RESPONSE: u8 = 0x88;

/// Unsolicited modem status.
pub const MODEM_STATUS: u8 = 0x8A;

/// Delivery status for a transmit request.
pub const TRANSMIT_STATUS: u8 = 0x8B;

/// Data received from a remote node.
pub const RECEIVE_PACKET: u8 = 0x90;

/// Typed view of the frame type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    AtCommand,
    TransmitRequest,
    AtResponse,
    ModemStatus,
    TransmitStatus,
    ReceivePacket,
    /// Any type this crate has no constant for.
    Unknown(u8),
}

impl FrameType {
    /// The wire value of this frame type.
    pub fn as_u8(self) -> u8 {
        match self {
            FrameType::AtCommand => AT_COMMAND,
            FrameType::TransmitRequest => TRANSMIT_REQUEST,
            FrameType::AtResponse => AT_RESPONSE,
            FrameType::ModemStatus => MODEM_STATUS,
            FrameType::TransmitStatus => TRANSMIT_STATUS,
            FrameType::ReceivePacket => RECEIVE_PACKET,
            FrameType::Unknown(raw) => raw,
        }
    }

    /// Returns true for frames the radio sends to the host.
    pub fn is_from_radio(self) -> bool {
        self.as_u8() >= 0x80
    }
}

impl From<u8> for FrameType {
    fn from(raw: u8) -> Self {
        match raw {
            AT_COMMAND => FrameType::AtCommand,
            TRANSMIT_REQUEST => FrameType::TransmitRequest,
            AT_RESPONSE => FrameType::AtResponse,
            MODEM_STATUS => FrameType::ModemStatus,
            TRANSMIT_STATUS => FrameType::TransmitStatus,
            RECEIVE_PACKET => FrameType::ReceivePacket,
            other => FrameType::Unknown(other),
        }
    }
}

impl From<FrameType> for u8 {
    fn from(frame_type: FrameType) -> Self {
        frame_type.as_u8()
    }
}

/// Returns a human-readable name for a frame type byte.
pub fn frame_type_name(raw: u8) -> &'static str {
    match raw {
        AT_COMMAND => "AT_COMMAND",
        TRANSMIT_REQUEST => "TRANSMIT_REQUEST",
        AT_RESPONSE => "AT_RESPONSE",
        MODEM_STATUS => "MODEM_STATUS",
        TRANSMIT_STATUS => "TRANSMIT_STATUS",
        RECEIVE_PACKET => "RECEIVE_PACKET",
        _ => "UNKNOWN",
    }
}
