//! # qrgrid
//!
//! A Rust library for encoding text into QR code matrices with Reed-Solomon error
//! correction and automatic mask selection.
//!
//! ## Features
//!
//! - **Mode Encoding**: Numeric, alphanumeric and byte modes with per-mode charset validation
//! - **Automatic Version Selection**: Picks the smallest version (1-40) that fits the data
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H) over GF(256)
//! - **Mask Selection**: Scores all 8 mask patterns and commits the lowest penalty
//!
//! ## Quick Start
//!
//! ```rust
//! use qrgrid::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new("Hello, World!").build()?;
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrgrid::{QRBuilder, ECLevel, MaskPattern, Mode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("HELLO WORLD")
//!     .mode(Mode::Alphanumeric)   // Encoding mode - if not provided, defaults to Mode::Byte
//!     .ec_level(ECLevel::Q)       // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))  // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! println!("{}", qr.metadata());
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! Versions 1-40, with sizes from 21x21 to 177x177 modules.
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
