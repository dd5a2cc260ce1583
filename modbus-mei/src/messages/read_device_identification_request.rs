use thiserror::Error;
use tracing::debug;

use crate::{
    device_information::DeviceInformationProvider, encoding::*, exception::ModbusException, messages::ReadDeviceIdentificationResponse,
    modbus_encapsulated_interface::*,
};

/// A request value outside its allowed range. Answered with [`ModbusException::IllegalDataValue`].
#[derive(Error, PartialEq, Debug, Clone, Copy)]
pub enum RequestRangeError {
    #[error("object id {0:#x} does not fit a byte")]
    ObjectId(u16),
    #[error("read code {0:#x} is above {max:#04x}", max = READ_CODE_MAX)]
    ReadCode(u16),
}

impl From<RequestRangeError> for ModbusException {
    fn from(_: RequestRangeError) -> Self {
        ModbusException::IllegalDataValue
    }
}

/// Read device identification request body: MEI type, read device id code and object id.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ReadDeviceIdentificationRequest {
    pub kind: ModbusEncapsulatedInterfaceType,
    pub device_id_code: ReadDeviceIdentificationIdCode,
    pub object_id: u8,
}

impl ReadDeviceIdentificationRequest {
    pub fn new(device_id_code: ReadDeviceIdentificationIdCode, object_id: u8) -> Self {
        Self {
            kind: ModbusEncapsulatedInterfaceType::ReadDeviceIdentification,
            device_id_code,
            object_id,
        }
    }

    /// Builds a request from values held in wider fields.
    /// The object id is checked before the read code; the first failure is reported.
    pub fn from_values(read_code: u16, object_id: u16) -> Result<Self, RequestRangeError> {
        let object_id = u8::try_from(object_id).map_err(|_| RequestRangeError::ObjectId(object_id))?;
        let read_code = u8::try_from(read_code)
            .ok()
            .filter(|code| *code <= READ_CODE_MAX)
            .ok_or(RequestRangeError::ReadCode(read_code))?;
        Ok(Self::new(read_code.into(), object_id))
    }

    /**
     * Validates the request and answers it from `provider`.
     * An out of range read code yields [`ModbusException::IllegalDataValue`],
     * which the caller sends back as an exception response.
     */
    pub fn execute<'p, P>(&self, provider: &'p P) -> Result<ReadDeviceIdentificationResponse<'p>, ModbusException>
    where
        P: DeviceInformationProvider + ?Sized,
    {
        // object_id is a u8, its full range is valid.
        if !self.device_id_code.is_in_range() {
            debug!(read_code = u8::from(self.device_id_code), "rejecting read device identification: read code out of range");
            return Err(ModbusException::IllegalDataValue);
        }

        let objects = provider.lookup(self.device_id_code, self.object_id);
        debug!(
            read_code = u8::from(self.device_id_code),
            object_id = self.object_id,
            objects = objects.len(),
            "read device identification"
        );
        Ok(ReadDeviceIdentificationResponse::new(self.device_id_code, objects))
    }
}

impl Encodable for ReadDeviceIdentificationRequest {
    fn encode(&self, encoder: &mut Encoder) -> EncodeResult {
        encoder.write_u8(self.kind.into());
        encoder.write_u8(self.device_id_code.into());
        encoder.write_u8(self.object_id);
        Ok(())
    }
}

impl Decodable<Self> for ReadDeviceIdentificationRequest {
    fn decode(decoder: &mut Decoder) -> DecodeResult<Self> {
        let req = Self {
            kind: decoder.read_u8()?.into(),
            device_id_code: decoder.read_u8()?.into(),
            object_id: decoder.read_u8()?,
        };
        if decoder.remaining() > 0 {
            return Err(DecodeError::InvalidData("Request longer than 3 bytes"));
        }
        Ok(req)
    }
}
