mod read_device_identification_request;
mod read_device_identification_response;

pub use read_device_identification_request::*;
pub use read_device_identification_response::*;
