//! # Command Packet Encoder
//!
//! Builds the 7-byte command datagram sent to the vehicle every tick.
//!
//! ## Wire Layout
//!
//! Little-endian, no padding:
//!
//! ```text
//! Offset  Size  Field
//! 0       2     x_speed   (i16)
//! 2       2     y_speed   (i16)
//! 4       2     z_speed   (i16)
//! 6       1     arm_state (u8)
//! ```
//!
//! ## arm_state
//!
//! ```text
//! bit 7      rotate flag
//! bits 0-6   servo command (0-127)
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::{DepthConfig, SERVO_COMMAND_MAX};
use crate::error::{BridgeError, Result};

/// Encoded packet length in bytes.
pub const COMMAND_PACKET_LEN: usize = 7;

/// Bit carrying the rotate flag inside `arm_state`.
pub const ROTATE_BIT: u8 = 7;

/// Command sent to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandPacket {
    pub x_speed: i16,
    pub y_speed: i16,
    pub z_speed: i16,
    pub arm_state: u8,
}

/// Packs the rotate flag and servo command into one byte.
///
/// Only the low 7 bits of `servo` are kept, so the servo value can never
/// corrupt the rotate flag.
///
/// # Examples
///
/// ```
/// use rov_bridge::control::packet::pack_arm_state;
///
/// assert_eq!(pack_arm_state(true, 75), 0xCB);
/// assert_eq!(pack_arm_state(false, 75), 0x4B);
/// ```
#[must_use]
pub fn pack_arm_state(rotate: bool, servo: u8) -> u8 {
    (u8::from(rotate) << ROTATE_BIT) | (servo & SERVO_COMMAND_MAX)
}

/// Splits `arm_state` back into `(rotate, servo)`.
#[must_use]
pub fn unpack_arm_state(arm_state: u8) -> (bool, u8) {
    ((arm_state >> ROTATE_BIT) & 1 == 1, arm_state & SERVO_COMMAND_MAX)
}

/// Assembles a packet from the derived fields.
#[must_use]
pub fn encode(x_speed: i16, y_speed: i16, z_speed: i16, rotate: bool, servo: u8) -> CommandPacket {
    CommandPacket {
        x_speed,
        y_speed,
        z_speed,
        arm_state: pack_arm_state(rotate, servo),
    }
}

/// Vertical speed from the two direction buttons.
///
/// Up wins over down. With neither held the small brake speed is sent, not
/// zero.
#[must_use]
pub fn select_z_speed(up: bool, down: bool, depth: &DepthConfig) -> i16 {
    if up {
        depth.up_speed
    } else if down {
        depth.down_speed
    } else {
        depth.brake_speed
    }
}

impl CommandPacket {
    /// Rotate flag carried in bit 7 of `arm_state`.
    #[must_use]
    pub fn rotate(&self) -> bool {
        unpack_arm_state(self.arm_state).0
    }

    /// Servo command carried in bits 0-6 of `arm_state`.
    #[must_use]
    pub fn servo(&self) -> u8 {
        unpack_arm_state(self.arm_state).1
    }

    /// Serializes the packet into its wire layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use rov_bridge::control::packet::encode;
    ///
    /// let bytes = encode(-600, 0, -50, true, 75).to_bytes();
    /// assert_eq!(&bytes[..], &[0xA8, 0xFD, 0x00, 0x00, 0xCE, 0xFF, 0xCB]);
    /// ```
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(COMMAND_PACKET_LEN);
        buf.put_i16_le(self.x_speed);
        buf.put_i16_le(self.y_speed);
        buf.put_i16_le(self.z_speed);
        buf.put_u8(self.arm_state);
        buf.freeze()
    }

    /// Parses a packet from its wire layout.
    ///
    /// # Errors
    ///
    /// Returns `Packet` error if `data` is not exactly [`COMMAND_PACKET_LEN`]
    /// bytes long.
    pub fn from_bytes(mut data: &[u8]) -> Result<Self> {
        if data.len() != COMMAND_PACKET_LEN {
            return Err(BridgeError::Packet(format!(
                "expected {} bytes, got {}",
                COMMAND_PACKET_LEN,
                data.len()
            )));
        }

        Ok(Self {
            x_speed: data.get_i16_le(),
            y_speed: data.get_i16_le(),
            z_speed: data.get_i16_le(),
            arm_state: data.get_u8(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rotate_with_servo() {
        let arm_state = pack_arm_state(true, 75);
        assert_eq!(arm_state, 0xCB);
        assert_eq!(arm_state, 203);
        assert_eq!(unpack_arm_state(arm_state), (true, 75));
    }

    #[test]
    fn test_pack_without_rotate() {
        assert_eq!(pack_arm_state(false, 0), 0x00);
        assert_eq!(pack_arm_state(false, 127), 0x7F);
        assert_eq!(pack_arm_state(true, 0), 0x80);
        assert_eq!(pack_arm_state(true, 127), 0xFF);
    }

    #[test]
    fn test_pack_masks_servo_to_seven_bits() {
        // 150 = 0b1001_0110 would set the rotate bit without masking
        assert_eq!(pack_arm_state(false, 150), 150 & 0x7F);
        assert_eq!(unpack_arm_state(pack_arm_state(false, 150)), (false, 22));
    }

    #[test]
    fn test_unpack_inverts_pack_for_all_values() {
        for rotate in [false, true] {
            for servo in 0..=u8::MAX {
                let arm_state = pack_arm_state(rotate, servo);
                assert_eq!(unpack_arm_state(arm_state), (rotate, servo & 0x7F));
            }
        }
    }

    #[test]
    fn test_encode_fields() {
        let packet = encode(-600, 300, -50, true, 75);
        assert_eq!(packet.x_speed, -600);
        assert_eq!(packet.y_speed, 300);
        assert_eq!(packet.z_speed, -50);
        assert_eq!(packet.arm_state, 0xCB);
        assert!(packet.rotate());
        assert_eq!(packet.servo(), 75);
    }

    #[test]
    fn test_select_z_speed() {
        let depth = DepthConfig::default();
        assert_eq!(select_z_speed(true, false, &depth), -1300);
        assert_eq!(select_z_speed(false, true, &depth), 350);
        assert_eq!(select_z_speed(true, true, &depth), -1300);
    }

    #[test]
    fn test_z_speed_brakes_when_idle() {
        let depth = DepthConfig::default();
        assert_eq!(select_z_speed(false, false, &depth), -50);
    }

    #[test]
    fn test_to_bytes_layout() {
        let packet = CommandPacket {
            x_speed: 0x0102,
            y_speed: -2,
            z_speed: i16::MIN,
            arm_state: 0x80,
        };
        let bytes = packet.to_bytes();
        assert_eq!(bytes.len(), COMMAND_PACKET_LEN);
        assert_eq!(&bytes[..], &[0x02, 0x01, 0xFE, 0xFF, 0x00, 0x80, 0x80]);
    }

    #[test]
    fn test_from_bytes_decodes_layout() {
        let packet = CommandPacket::from_bytes(&[0xA8, 0xFD, 0x2C, 0x01, 0xCE, 0xFF, 0xCB]).unwrap();
        assert_eq!(packet, encode(-600, 300, -50, true, 75));
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        let short = CommandPacket::from_bytes(&[0u8; 6]);
        assert!(matches!(short, Err(BridgeError::Packet(_))));

        // A padded 8-byte struct is not accepted either
        let padded = CommandPacket::from_bytes(&[0u8; 8]);
        assert!(matches!(padded, Err(BridgeError::Packet(_))));
    }

    #[test]
    fn test_default_packet_is_zero() {
        let bytes = CommandPacket::default().to_bytes();
        assert_eq!(&bytes[..], &[0u8; COMMAND_PACKET_LEN]);
    }
}
