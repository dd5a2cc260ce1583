use tracing::trace;

use crate::{device_information::DeviceObjects, encoding::*, modbus_encapsulated_interface::*};

/// Bytes preceding the object list in an RTU frame: address, function code and the six byte header.
pub const RTU_HEADER_LENGTH: usize = 8;
/// CRC trailing every RTU frame.
pub const RTU_CRC_LENGTH: usize = 2;

#[derive(PartialEq, Debug, Clone)]
pub struct ReadDeviceIdentificationResponse<'a> {
    pub kind: ModbusEncapsulatedInterfaceType,
    pub device_id_code: ReadDeviceIdentificationIdCode,
    pub conformity_level: ReadDeviceIdentificationConformityLevel,
    pub more_follows: bool,
    pub next_object_id: u8,
    /// Object count as declared in the header. Encoding writes `objects.len()` instead.
    pub number_of_objects: u8,
    pub objects: DeviceObjects<'a>,
}

impl<'a> ReadDeviceIdentificationResponse<'a> {
    /// A complete answer: objects are never split across several responses.
    pub fn new(device_id_code: ReadDeviceIdentificationIdCode, objects: DeviceObjects<'a>) -> Self {
        Self {
            kind: ModbusEncapsulatedInterfaceType::ReadDeviceIdentification,
            device_id_code,
            conformity_level: ReadDeviceIdentificationConformityLevel::ExtendedStreamAndIndividual,
            more_follows: false,
            next_object_id: 0x00,
            number_of_objects: u8::try_from(objects.len()).unwrap_or(u8::MAX),
            objects,
        }
    }

    pub fn into_owned(self) -> ReadDeviceIdentificationResponse<'static> {
        ReadDeviceIdentificationResponse {
            kind: self.kind,
            device_id_code: self.device_id_code,
            conformity_level: self.conformity_level,
            more_follows: self.more_follows,
            next_object_id: self.next_object_id,
            number_of_objects: self.number_of_objects,
            objects: self.objects.into_owned(),
        }
    }

    /**
     * Total length of the RTU frame whose first bytes are `data`, CRC included.
     *
     * With too few bytes to resolve every object length the result is a lower
     * bound; read more and ask again. Estimates never shrink as `data` grows.
     */
    pub fn estimate_frame_size(data: &[u8]) -> usize {
        let mut size = RTU_HEADER_LENGTH;
        if data.len() < RTU_HEADER_LENGTH {
            return size + RTU_CRC_LENGTH;
        }

        let count = data[RTU_HEADER_LENGTH - 1];
        for _ in 0..count {
            if data.len() < size + 2 {
                trace!(available = data.len(), estimate = size + RTU_CRC_LENGTH, "object header not received yet");
                return size + RTU_CRC_LENGTH;
            }
            size += usize::from(data[size + 1]) + 2;
        }

        size + RTU_CRC_LENGTH
    }
}

impl<'a> Encodable for ReadDeviceIdentificationResponse<'a> {
    fn encode(&self, encoder: &mut Encoder) -> EncodeResult {
        encoder.write_u8(self.kind.into());
        encoder.write_u8(self.device_id_code.into());
        encoder.write_u8(self.conformity_level.into());
        encoder.write_u8(if self.more_follows { 0xFF } else { 0x00 });
        encoder.write_u8(self.next_object_id);
        encoder.write_u8(self.objects.len().try_into()?);
        for (id, data) in self.objects.iter() {
            let length = u8::try_from(data.len()).map_err(|_| EncodeError::PayloadTooLarge {
                object_id: id,
                length: data.len(),
            })?;
            encoder.write_u8(id);
            encoder.write_u8(length);
            encoder.write_bytes(data);
        }
        Ok(())
    }
}

impl<'a> Decodable<Self> for ReadDeviceIdentificationResponse<'a> {
    fn decode(decoder: &mut Decoder) -> DecodeResult<Self> {
        let kind = decoder.read_u8()?.into();
        let device_id_code = decoder.read_u8()?.into();
        let conformity_level = decoder.read_u8()?.into();
        let more_follows = decoder.read_u8()? != 0;
        let next_object_id = decoder.read_u8()?;
        let number_of_objects = decoder.read_u8()?;

        // The buffer end terminates the object list.
        let mut objects = DeviceObjects::with_capacity(number_of_objects.into());
        while decoder.remaining() > 0 {
            let id = decoder.read_u8()?;
            let length = decoder.read_u8()?;
            let data = decoder.read_bytes(length.into())?;
            if objects.insert(id, data).is_some() {
                return Err(DecodeError::InvalidData("Duplicate object id"));
            }
        }

        if objects.len() != usize::from(number_of_objects) {
            return Err(DecodeError::InvalidData("Object count does not match header"));
        }

        Ok(Self {
            kind,
            device_id_code,
            conformity_level,
            more_follows,
            next_object_id,
            number_of_objects,
            objects,
        })
    }
}
