use thiserror::Error;
use tracing::debug;

use crate::{
    device_information::DeviceInformationProvider,
    encoding::*,
    exception::{ExceptionMessage, ModbusException},
    function_code::FunctionCode,
    messages::*,
    modbus_encapsulated_interface::ModbusEncapsulatedInterfaceType,
};

/// Protocol data unit: function code and body, without transport framing.
#[derive(PartialEq, Debug, Clone)]
pub struct Pdu {
    pub function_code: FunctionCode,
    pub body: Vec<u8>,
}

impl Pdu {
    pub fn exception(function_code: FunctionCode, code: ModbusException) -> Self {
        Self {
            function_code: function_code.as_err(),
            body: vec![code.into()],
        }
    }
}

impl Encodable for Pdu {
    fn encode(&self, encoder: &mut Encoder) -> EncodeResult {
        encoder.write_u8(self.function_code.into());
        encoder.write_bytes(&self.body);
        Ok(())
    }
}

impl Decodable<Self> for Pdu {
    fn decode(decoder: &mut Decoder) -> DecodeResult<Self> {
        let function_code = decoder.read_u8()?.into();
        let body = decoder.read_bytes(decoder.remaining())?;
        Ok(Self { function_code, body })
    }
}

impl TryFrom<&ReadDeviceIdentificationRequest> for Pdu {
    type Error = EncodeError;

    fn try_from(req: &ReadDeviceIdentificationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            function_code: FunctionCode::ModbusEncapsulatedInterface,
            body: req.encode_to_bytes()?,
        })
    }
}

/**
 * Answers a request PDU. Protocol failures come back as exception PDUs
 * (function code with the high bit set, one byte exception code), never as errors.
 */
pub fn handle_request<P>(pdu: &Pdu, provider: &P) -> Pdu
where
    P: DeviceInformationProvider + ?Sized,
{
    match dispatch(pdu, provider) {
        Ok(body) => Pdu {
            function_code: pdu.function_code,
            body,
        },
        Err(code) => {
            debug!(function_code = u8::from(pdu.function_code), exception = %code, "answering with exception");
            Pdu::exception(pdu.function_code, code)
        }
    }
}

fn dispatch<P>(pdu: &Pdu, provider: &P) -> Result<Vec<u8>, ModbusException>
where
    P: DeviceInformationProvider + ?Sized,
{
    if pdu.function_code != FunctionCode::ModbusEncapsulatedInterface {
        return Err(ModbusException::IllegalFunction);
    }

    let kind = pdu.body.first().copied().map(ModbusEncapsulatedInterfaceType::from);
    match kind {
        Some(ModbusEncapsulatedInterfaceType::ReadDeviceIdentification) => {
            let req = ReadDeviceIdentificationRequest::decode_from_bytes(&pdu.body).map_err(|err| {
                debug!(%err, "undecodable read device identification request");
                ModbusException::IllegalDataValue
            })?;
            let res = req.execute(provider)?;
            res.encode_to_bytes().map_err(|err| {
                debug!(%err, "read device identification response does not encode");
                ModbusException::ServerDeviceFailure
            })
        }
        Some(ModbusEncapsulatedInterfaceType::Unknown(_)) | None => Err(ModbusException::IllegalFunction),
    }
}

/// Why a PDU received as answer to a read device identification request was not usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("server answered with exception: {0}")]
    Exception(ModbusException),
    #[error("unexpected function code {0:#04x}")]
    UnexpectedFunction(u8),
    #[error(transparent)]
    Malformed(#[from] DecodeError),
}

/// Client side counterpart of [`handle_request`].
pub fn parse_read_device_identification(pdu: &Pdu) -> Result<ReadDeviceIdentificationResponse<'static>, ResponseError> {
    if pdu.function_code == FunctionCode::ModbusEncapsulatedInterface.as_err() {
        let exception = ExceptionMessage::decode_from_bytes(&pdu.body)?;
        return Err(ResponseError::Exception(exception.code));
    }
    if pdu.function_code != FunctionCode::ModbusEncapsulatedInterface {
        return Err(ResponseError::UnexpectedFunction(pdu.function_code.into()));
    }
    let res = ReadDeviceIdentificationResponse::decode_from_bytes(&pdu.body)?;
    if res.kind != ModbusEncapsulatedInterfaceType::ReadDeviceIdentification {
        return Err(DecodeError::InvalidData("Not a read device identification response").into());
    }
    Ok(res)
}
