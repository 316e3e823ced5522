use std::fmt::{Debug, Display, Error, Formatter};

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    EmptyData,
    InvalidCharacterSet(Mode),
    InvalidMode,
    InvalidCorrectionLevel,
    InvalidMaskingPattern,
    // Carries the max bit capacity attempted before giving up
    DataTooLarge(usize),
    // Carries the version that missed a table entry
    InternalTableLookup(usize),
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match *self {
            Self::EmptyData => f.write_str("Empty data"),
            Self::InvalidCharacterSet(m) => {
                write!(f, "Input contains characters outside the {m:?} mode alphabet")
            }
            Self::InvalidMode => f.write_str("Invalid encoding mode"),
            Self::InvalidCorrectionLevel => f.write_str("Invalid error correction level"),
            Self::InvalidMaskingPattern => f.write_str("Invalid masking pattern"),
            Self::DataTooLarge(cap) => {
                write!(f, "Data too large: no version holds it, max capacity {cap} bits")
            }
            Self::InternalTableLookup(v) => {
                write!(f, "Missing table entry for version {v}")
            }
        }
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
