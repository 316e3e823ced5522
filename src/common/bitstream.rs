use std::fmt::Display;
use std::mem;

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

#[derive(Clone)]
pub struct BitStream {
    data: Box<[u8; MAX_PAYLOAD_SIZE]>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Read pointer for the bit iterator
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(
            capacity <= MAX_PAYLOAD_SIZE << 3,
            "Capacity exceeds max payload size: {capacity}"
        );
        Self { data: Box::new([0; MAX_PAYLOAD_SIZE]), len: 0, capacity, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }
}

// Bit push
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        match size {
            0 => (),
            1..=8 => {
                let bits = bits.to_u8().expect("Bits should fit in u8");
                let offset = self.len & 7;
                let pos = self.len >> 3;

                if offset + size <= 8 {
                    self.data[pos] |= bits << (8 - size - offset);
                } else {
                    self.data[pos] |= bits >> (size + offset - 8);
                    self.data[pos + 1] = bits << (16 - size - offset);
                }

                self.len += size;
            }
            9..=16 => {
                self.push_bits((bits >> 8).to_u8().expect("High byte should fit in u8"), size - 8);
                self.push_bits((bits & T::from(0xFF).unwrap()).to_u8().unwrap(), 8);
            }
            _ => unreachable!("Bits from only u8 and u16 can be pushed"),
        }
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from a byte array: Bit offset {}",
            self.len & 7
        );
        let arr_bits = arr.len() << 3;
        debug_assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );

        let pos = self.len >> 3;
        self.data[pos..pos + arr.len()].copy_from_slice(arr);
        self.len += arr_bits;
    }
}

// Bit iterator, MSB of the first byte first
//------------------------------------------------------------------------------

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }
        let offset = self.cursor & 7;
        let pos = self.cursor >> 3;
        self.cursor += 1;
        Some(self.data[pos] & (0b10000000 >> offset) != 0)
    }
}

// Global constants
//------------------------------------------------------------------------------

const MAX_PAYLOAD_SIZE: usize = 4096;

#[cfg(test)]
mod bit_stream_tests {
    use super::BitStream;

    #[test]
    fn test_len() {
        let mut bs = BitStream::new(152);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0u8, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000u8, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000u8, 8);
        assert_eq!(bs.len(), 12);
        bs.push_bits(0b1111111u8, 7);
        assert_eq!(bs.len(), 19);
    }

    #[test]
    fn test_push_bits_across_byte_boundary() {
        let mut bs = BitStream::new(152);
        bs.push_bits(0b1101u8, 4);
        bs.push_bits(0b00100011u8, 8);
        bs.push_bits(0b0100u8, 4);
        assert_eq!(bs.data(), &[0b11010010, 0b00110100]);
    }

    #[test]
    fn test_push_u16_bits() {
        let mut bs = BitStream::new(152);
        bs.push_bits(0b0100_0000_0101u16, 12);
        assert_eq!(bs.data(), &[0b01000000, 0b01010000]);
        assert_eq!(bs.len(), 12);
    }

    #[test]
    fn test_extend() {
        let mut bs = BitStream::new(152);
        bs.push_bits(0b10110100u8, 8);
        bs.extend(&[0xDE, 0xAD]);
        assert_eq!(bs.data(), &[0b10110100, 0xDE, 0xAD]);
    }

    #[test]
    fn test_bit_iterator() {
        let mut bs = BitStream::new(16);
        bs.push_bits(0b10100000u8, 8);
        let bits = bs.by_ref().take(4).collect::<Vec<_>>();
        assert_eq!(bits, vec![true, false, true, false]);
    }

    #[test]
    #[should_panic]
    fn test_push_bits_capacity_overflow() {
        let mut bs = BitStream::new(8);
        bs.push_bits(0xFFu8, 8);
        bs.push_bits(1u8, 1);
    }
}
