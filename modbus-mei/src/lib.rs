//! Codec for the Modbus Encapsulated Interface "Read Device Identification"
//! transaction (function code 0x2B, MEI type 0x0E).

mod device_information;
mod encoding;
mod exception;
mod function_code;
mod messages;
mod modbus_encapsulated_interface;
mod pdu;
mod rtu;

pub use device_information::{DeviceIdentification, DeviceInformationProvider, DeviceObjects};
pub use encoding::{Decodable, DecodeError, Decoder, Encodable, EncodeError, Encoder};
pub use exception::{ExceptionMessage, ModbusException};
pub use function_code::FunctionCode;
pub use messages::*;
pub use modbus_encapsulated_interface::*;
pub use pdu::{handle_request, parse_read_device_identification, Pdu, ResponseError};
pub use rtu::{read_rtu_frame, RTU_EXCEPTION_FRAME_LENGTH};
