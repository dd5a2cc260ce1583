#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum FunctionCode {
    ModbusEncapsulatedInterface = 43,
    Error(u8),
    Unknown(u8),
}

impl FunctionCode {
    pub fn as_err(self) -> Self {
        FunctionCode::Error(u8::from(self) | 128u8)
    }

    pub fn is_err(self) -> bool {
        matches!(self, FunctionCode::Error(_))
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        match value {
            43 => Self::ModbusEncapsulatedInterface,
            _ => {
                if value & 128 != 0 {
                    Self::Error(value)
                } else {
                    Self::Unknown(value)
                }
            }
        }
    }
}

impl From<FunctionCode> for u8 {
    fn from(value: FunctionCode) -> Self {
        match value {
            FunctionCode::ModbusEncapsulatedInterface => 43,
            FunctionCode::Error(value) => value,
            FunctionCode::Unknown(value) => value,
        }
    }
}

impl PartialEq for FunctionCode {
    fn eq(&self, other: &Self) -> bool {
        u8::from(*self) == u8::from(*other)
    }
}
