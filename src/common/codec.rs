use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version, MAX_VERSION};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    pub fn contains(self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Chunk is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Chunk is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Chunk is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    // Raw encoded bit length, before the mode/char count header
    pub fn encoded_bit_len(self, char_count: usize) -> usize {
        match self {
            Self::Numeric => (char_count / 3) * 10 + [0, 4, 7][char_count % 3],
            Self::Alphanumeric => (char_count / 2) * 11 + (char_count % 2) * 6,
            Self::Byte => char_count * 8,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = QRError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b0001 => Ok(Self::Numeric),
            0b0010 => Ok(Self::Alphanumeric),
            0b0100 => Ok(Self::Byte),
            _ => Err(QRError::InvalidMode),
        }
    }
}

// Encoder
//------------------------------------------------------------------------------

// Encodes data in the requested mode, selects the smallest fitting version
// and pads the stream to the exact bit capacity of that version
pub fn encode(data: &[u8], mode: Mode, ecl: ECLevel) -> QRResult<(BitStream, Version)> {
    if !data.iter().all(|&b| mode.contains(b)) {
        return Err(QRError::InvalidCharacterSet(mode));
    }

    let raw_len = mode.encoded_bit_len(data.len());
    let ver = find_smallest_version(raw_len, mode, ecl)?;
    let bit_capacity = ver.data_bit_capacity(ecl)?;

    let mut bs = BitStream::new(bit_capacity);
    writer::push_header(data.len(), mode, ver, &mut bs);
    match mode {
        Mode::Numeric => writer::push_numeric_data(data, &mut bs),
        Mode::Alphanumeric => writer::push_alphanumeric_data(data, &mut bs),
        Mode::Byte => writer::push_byte_data(data, &mut bs),
    }
    writer::push_terminator(&mut bs);
    writer::pad_remaining_capacity(&mut bs);

    debug_assert!(bs.len() == bit_capacity, "Padded stream should fill capacity exactly");

    Ok((bs, ver))
}

// Smallest version whose data capacity holds header + raw data; the header
// length field widens with the version tier, hence the recheck per version
fn find_smallest_version(raw_len: usize, mode: Mode, ecl: ECLevel) -> QRResult<Version> {
    for v in 1..=MAX_VERSION {
        let ver = Version::new(v);
        let header_len = ver.mode_bits() + ver.char_count_bits(mode);
        if raw_len + header_len <= ver.data_bit_capacity(ecl)? {
            return Ok(ver);
        }
    }
    Err(QRError::DataTooLarge(Version::new(MAX_VERSION).data_bit_capacity(ecl)?))
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(crate) mod writer {
    use super::super::bitstream::BitStream;
    use super::super::metadata::Version;
    use super::Mode;

    pub const PADDING_CODEWORDS: [u8; 2] = [0b11101100, 0b00010001];

    pub fn push_header(char_count: usize, mode: Mode, ver: Version, out: &mut BitStream) {
        out.push_bits(mode as u8, ver.mode_bits());
        let len_bits = ver.char_count_bits(mode);
        debug_assert!(
            char_count < (1 << len_bits),
            "Char count exceeds length field: Char count {char_count}, Field bits {len_bits}"
        );
        out.push_bits(char_count as u16, len_bits);
    }

    pub fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10 + 2) / 3;
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    pub fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11 + 1) / 2;
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    pub fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            out.push_bits(Mode::Byte.encode_chunk(chunk), 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }
}

#[cfg(test)]
mod codec_tests {
    use test_case::test_case;

    use super::super::metadata::{ECLevel, Version};
    use super::writer::PADDING_CODEWORDS;
    use super::*;

    #[test_case("123456", 20; "two full groups")]
    #[test_case("12345", 17; "full group and pair")]
    #[test_case("1234", 14; "full group and single")]
    #[test_case("12", 7; "pair")]
    #[test_case("1", 4; "single")]
    fn test_numeric_bit_len(data: &str, exp_len: usize) {
        assert_eq!(Mode::Numeric.encoded_bit_len(data.len()), exp_len);
        let (bs, _) = encode(data.as_bytes(), Mode::Numeric, ECLevel::L).unwrap();
        let header_len = 4 + Version::new(1).char_count_bits(Mode::Numeric);
        assert!(bs.len() >= header_len + exp_len);
    }

    #[test]
    fn test_numeric_encoding() {
        let (bs, ver) = encode(b"01234567", Mode::Numeric, ECLevel::L).unwrap();
        assert_eq!(ver, Version::new(1));
        // 0001 0000001000 0000001100 0101011001 1000011
        assert_eq!(
            &bs.data()[..5],
            &[0b00010000, 0b00100000, 0b00001100, 0b01010110, 0b01100001]
        );
    }

    #[test]
    fn test_alphanumeric_pair_value() {
        let a = Mode::Alphanumeric.encode_chunk(b"AB");
        assert_eq!(a, 10 * 45 + 11);
        assert_eq!(Mode::Alphanumeric.encoded_bit_len(2), 11);
        assert_eq!(Mode::Alphanumeric.encoded_bit_len(3), 17);
    }

    #[test]
    fn test_alphanumeric_encoding() {
        let (bs, _) = encode(b"AC-42", Mode::Alphanumeric, ECLevel::L).unwrap();
        // 0010 000000101 00111001110 11100111001 000010
        assert_eq!(
            &bs.data()[..5],
            &[0b00100000, 0b00101001, 0b11001110, 0b11100111, 0b00100001]
        );
    }

    #[test]
    fn test_byte_encoding() {
        let (bs, _) = encode("aðŸŒŽ".as_bytes(), Mode::Byte, ECLevel::L).unwrap();
        let exp_bytes = "aðŸŒŽ".as_bytes();
        assert_eq!(bs.data()[0], 0b01000000 | exp_bytes.len() as u8 >> 4);
        // Each UTF-8 byte lands verbatim after the 12-bit header
        for (i, b) in exp_bytes.iter().enumerate() {
            let hi = bs.data()[1 + i] << 4;
            let lo = bs.data()[2 + i] >> 4;
            assert_eq!(hi | lo, *b);
        }
    }

    #[test]
    fn test_invalid_character_set() {
        assert!(matches!(
            encode(b"12a", Mode::Numeric, ECLevel::L),
            Err(QRError::InvalidCharacterSet(Mode::Numeric))
        ));
        assert!(matches!(
            encode(b"hello", Mode::Alphanumeric, ECLevel::L),
            Err(QRError::InvalidCharacterSet(Mode::Alphanumeric))
        ));
    }

    #[test]
    fn test_exact_capacity_fill() {
        for (data, mode) in [
            ("HELLO".as_bytes(), Mode::Byte),
            ("12345678901234567890123456789012345678".as_bytes(), Mode::Numeric),
            ("HELLO WORLD $%*+-./:".as_bytes(), Mode::Alphanumeric),
        ] {
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let (bs, ver) = encode(data, mode, ecl).unwrap();
                assert_eq!(bs.len(), ver.data_bit_capacity(ecl).unwrap());
                assert_eq!(bs.len() & 7, 0);
            }
        }
    }

    #[test_case("HELLO", ECLevel::L, 1)]
    #[test_case("HELLO", ECLevel::H, 1)]
    #[test_case("HELLO WORLD HELLO WORLD", ECLevel::H, 3)]
    fn test_version_selection(data: &str, ecl: ECLevel, exp_ver: usize) {
        let (_, ver) = encode(data.as_bytes(), Mode::Byte, ecl).unwrap();
        assert_eq!(ver, Version::new(exp_ver));
    }

    #[test]
    fn test_version_selection_boundary() {
        // Version 1-L holds 19 data codewords; byte header is 12 bits
        let data = vec![b'a'; 17];
        let (_, ver) = encode(&data, Mode::Byte, ECLevel::L).unwrap();
        assert_eq!(ver, Version::new(1));
        let data = vec![b'a'; 18];
        let (_, ver) = encode(&data, Mode::Byte, ECLevel::L).unwrap();
        assert_eq!(ver, Version::new(2));
    }

    #[test]
    fn test_data_too_large() {
        let data = vec![b'a'; 2954];
        let max_cap = Version::new(40).data_bit_capacity(ECLevel::L).unwrap();
        assert!(matches!(
            encode(&data, Mode::Byte, ECLevel::L),
            Err(QRError::DataTooLarge(cap)) if cap == max_cap
        ));
        let data = vec![b'a'; 2953];
        assert!(encode(&data, Mode::Byte, ECLevel::L).is_ok());
    }

    #[test]
    fn test_padding_codewords() {
        let (bs, ver) = encode(b"A", Mode::Alphanumeric, ECLevel::L).unwrap();
        // 4 + 9 header bits + 6 data bits + 4 terminator + 1 pad bit
        let data = bs.data();
        assert_eq!(data.len(), ver.data_codewords(ECLevel::L).unwrap());
        for (i, b) in data[3..].iter().enumerate() {
            assert_eq!(*b, PADDING_CODEWORDS[i % 2]);
        }
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(Mode::try_from(0b0100), Ok(Mode::Byte));
        assert_eq!(Mode::try_from(0b1000), Err(QRError::InvalidMode));
    }
}
