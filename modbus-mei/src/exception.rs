use thiserror::Error;

use crate::encoding::*;

/**
 * Exception codes a server answers with instead of a regular response.
 * See the [MODBUS Application Protocol Specification](https://www.modbus.org/docs/Modbus_Application_Protocol_V1_1b3.pdf) for more details.
 */
#[repr(u8)]
#[derive(Error, Debug, Clone, Copy)]
pub enum ModbusException {
    #[error("illegal function")]
    IllegalFunction = 1,
    #[error("illegal data address")]
    IllegalDataAddress = 2,
    /// A request field is outside its allowed range. Read device identification
    /// answers an out of range read code or object id with this.
    #[error("illegal data value")]
    IllegalDataValue = 3,
    #[error("server device failure")]
    ServerDeviceFailure = 4,
    #[error("acknowledge")]
    Acknowledge = 5,
    #[error("server device busy")]
    ServerDeviceBusy = 6,
    #[error("memory parity error")]
    MemoryParityError = 8,
    #[error("gateway path unavailable")]
    GatewayPathUnavailable = 10,
    #[error("gateway target device failed to respond")]
    GatewayTargetDeviceFailedToRespond = 11,
    #[error("unknown exception code {0:#04x}")]
    Unknown(u8),
}

impl From<u8> for ModbusException {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::IllegalFunction,
            2 => Self::IllegalDataAddress,
            3 => Self::IllegalDataValue,
            4 => Self::ServerDeviceFailure,
            5 => Self::Acknowledge,
            6 => Self::ServerDeviceBusy,
            8 => Self::MemoryParityError,
            10 => Self::GatewayPathUnavailable,
            11 => Self::GatewayTargetDeviceFailedToRespond,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ModbusException> for u8 {
    fn from(value: ModbusException) -> Self {
        match value {
            ModbusException::IllegalFunction => 1,
            ModbusException::IllegalDataAddress => 2,
            ModbusException::IllegalDataValue => 3,
            ModbusException::ServerDeviceFailure => 4,
            ModbusException::Acknowledge => 5,
            ModbusException::ServerDeviceBusy => 6,
            ModbusException::MemoryParityError => 8,
            ModbusException::GatewayPathUnavailable => 10,
            ModbusException::GatewayTargetDeviceFailedToRespond => 11,
            ModbusException::Unknown(value) => value,
        }
    }
}

impl PartialEq for ModbusException {
    fn eq(&self, other: &Self) -> bool {
        u8::from(*self) == u8::from(*other)
    }
}

/// Body of an exception response: the exception code alone.
#[derive(PartialEq, Debug)]
pub struct ExceptionMessage {
    pub code: ModbusException,
}

impl From<ModbusException> for ExceptionMessage {
    fn from(code: ModbusException) -> Self {
        Self { code }
    }
}

impl Encodable for ExceptionMessage {
    fn encode(&self, encoder: &mut Encoder) -> EncodeResult {
        encoder.write_u8(self.code.into());
        Ok(())
    }
}

impl Decodable<Self> for ExceptionMessage {
    fn decode(decoder: &mut Decoder) -> DecodeResult<Self> {
        Ok(Self {
            code: decoder.read_u8()?.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_data_value_is_code_three() {
        assert_eq!(u8::from(ModbusException::IllegalDataValue), 0x03);
        assert_eq!(ModbusException::from(0x03), ModbusException::IllegalDataValue);
        assert_eq!(ModbusException::from(0x42), ModbusException::Unknown(0x42));
    }

    #[test]
    fn exception_message_is_one_byte() {
        let bytes = ExceptionMessage::from(ModbusException::IllegalDataValue).encode_to_bytes().unwrap();
        assert_eq!(bytes, vec![0x03]);
        assert_eq!(
            ExceptionMessage::decode_from_bytes(&bytes),
            Ok(ExceptionMessage {
                code: ModbusException::IllegalDataValue
            })
        );
        assert_eq!(ExceptionMessage::decode_from_bytes(&[]), Err(DecodeError::MissingData));
    }

    #[test]
    fn display_names_the_exception() {
        assert_eq!(ModbusException::IllegalDataValue.to_string(), "illegal data value");
        assert_eq!(ModbusException::Unknown(0x42).to_string(), "unknown exception code 0x42");
    }
}
