//! Identifiers carried in the header of Modbus Encapsulated Interface (MEI) frames.

/// MEI sub-function, the first body byte after function code 0x2B.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum ModbusEncapsulatedInterfaceType {
    ReadDeviceIdentification = 0x0E,
    Unknown(u8),
}

impl From<u8> for ModbusEncapsulatedInterfaceType {
    fn from(value: u8) -> Self {
        match value {
            0x0E => Self::ReadDeviceIdentification,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ModbusEncapsulatedInterfaceType> for u8 {
    fn from(value: ModbusEncapsulatedInterfaceType) -> Self {
        match value {
            ModbusEncapsulatedInterfaceType::ReadDeviceIdentification => 0x0E,
            ModbusEncapsulatedInterfaceType::Unknown(value) => value,
        }
    }
}

impl PartialEq for ModbusEncapsulatedInterfaceType {
    fn eq(&self, other: &Self) -> bool {
        u8::from(*self) == u8::from(*other)
    }
}

/// Largest raw read code a request may carry.
pub const READ_CODE_MAX: u8 = 0x04;

/// Read device id code: how much identification data is requested.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum ReadDeviceIdentificationIdCode {
    /// Stream of the mandatory objects 0x00..=0x02.
    Basic = 0x01,
    /// Stream of the standard objects up to 0x7F.
    Regular = 0x02,
    /// Stream including the private objects up to 0xFF.
    Extended = 0x03,
    /// One specific object.
    Individual = 0x04,
    Unknown(u8),
}

impl ReadDeviceIdentificationIdCode {
    /// Last object id included in a stream read, `None` for individual and unknown codes.
    pub fn stream_end(self) -> Option<u8> {
        match self {
            Self::Basic => Some(0x02),
            Self::Regular => Some(0x7F),
            Self::Extended => Some(0xFF),
            Self::Individual | Self::Unknown(_) => None,
        }
    }

    pub fn is_in_range(self) -> bool {
        u8::from(self) <= READ_CODE_MAX
    }
}

impl From<u8> for ReadDeviceIdentificationIdCode {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Basic,
            0x02 => Self::Regular,
            0x03 => Self::Extended,
            0x04 => Self::Individual,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ReadDeviceIdentificationIdCode> for u8 {
    fn from(value: ReadDeviceIdentificationIdCode) -> Self {
        match value {
            ReadDeviceIdentificationIdCode::Basic => 0x01,
            ReadDeviceIdentificationIdCode::Regular => 0x02,
            ReadDeviceIdentificationIdCode::Extended => 0x03,
            ReadDeviceIdentificationIdCode::Individual => 0x04,
            ReadDeviceIdentificationIdCode::Unknown(value) => value,
        }
    }
}

impl PartialEq for ReadDeviceIdentificationIdCode {
    fn eq(&self, other: &Self) -> bool {
        u8::from(*self) == u8::from(*other)
    }
}

/// Conformity level advertised in every response.
/// The high bit flags support for individual access.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum ReadDeviceIdentificationConformityLevel {
    BasicStream = 0x01,
    RegularStream = 0x02,
    ExtendedStream = 0x03,
    BasicStreamAndIndividual = 0x81,
    RegularStreamAndIndividual = 0x82,
    ExtendedStreamAndIndividual = 0x83,
    Unknown(u8),
}

impl ReadDeviceIdentificationConformityLevel {
    pub fn supports_individual(self) -> bool {
        u8::from(self) & 0x80 != 0
    }
}

impl From<u8> for ReadDeviceIdentificationConformityLevel {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::BasicStream,
            0x02 => Self::RegularStream,
            0x03 => Self::ExtendedStream,
            0x81 => Self::BasicStreamAndIndividual,
            0x82 => Self::RegularStreamAndIndividual,
            0x83 => Self::ExtendedStreamAndIndividual,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ReadDeviceIdentificationConformityLevel> for u8 {
    fn from(value: ReadDeviceIdentificationConformityLevel) -> Self {
        match value {
            ReadDeviceIdentificationConformityLevel::BasicStream => 0x01,
            ReadDeviceIdentificationConformityLevel::RegularStream => 0x02,
            ReadDeviceIdentificationConformityLevel::ExtendedStream => 0x03,
            ReadDeviceIdentificationConformityLevel::BasicStreamAndIndividual => 0x81,
            ReadDeviceIdentificationConformityLevel::RegularStreamAndIndividual => 0x82,
            ReadDeviceIdentificationConformityLevel::ExtendedStreamAndIndividual => 0x83,
            ReadDeviceIdentificationConformityLevel::Unknown(value) => value,
        }
    }
}

impl PartialEq for ReadDeviceIdentificationConformityLevel {
    fn eq(&self, other: &Self) -> bool {
        u8::from(*self) == u8::from(*other)
    }
}
