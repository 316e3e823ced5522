mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use crate::common::{
    bitstream::BitStream,
    codec::{encode, Mode},
    ec::ecc,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a str,
    mode: Mode,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a str) -> Self {
        Self { data, mode: Mode::Byte, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a str) -> &mut Self {
        self.data = data;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        format!("{{ Mode: {:?}, Ec level: {:?} }}", self.mode, self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        println!("\nGenerating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        println!("Encoding data...");
        let (encoded_data, version) = encode(self.data.as_bytes(), self.mode, self.ec_level)?;

        let total_codewords = version.total_codewords()?;
        let data_capacity = version.data_bit_capacity(self.ec_level)? >> 3;
        let ec_capacity = Self::ec_capacity(version, self.ec_level)?;

        println!("Constructing payload with ecc & interleaving...");
        let (data_blocks, ecc_blocks) =
            Self::compute_ecc(encoded_data.data(), version, self.ec_level)?;
        let mut payload = BitStream::new(total_codewords << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        println!("Constructing QR...");
        let mut qr = QR::new(version, self.ec_level);

        println!("Drawing functional patterns...");
        qr.draw_all_function_patterns();

        println!("Drawing encoding region...");
        qr.draw_encoding_region(payload);

        match self.mask {
            Some(m) => {
                println!("Applying mask {:?}...", *m);
                qr.apply_mask(m);
            }
            None => {
                println!("Finding & applying best mask...");
                apply_best_mask(&mut qr);
            }
        };

        println!("\x1b[1;32mQR generated successfully!\n \x1b[0m");

        let total_modules = version.width() * version.width();
        let dark_modules = qr.count_dark_modules();
        let light_modules = total_modules - dark_modules;

        println!("Report:");
        println!("{}", qr.metadata());
        println!("Data capacity: {data_capacity}, Error capacity: {ec_capacity}");
        println!("Data size: {}, Encoded size: {}", self.data.len(), encoded_data.len() >> 3);
        println!(
            "Dark Cells: {}, Light Cells: {}, Balance: {}\n",
            dark_modules,
            light_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    fn compute_ecc(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> QRResult<(Vec<&[u8]>, Vec<Vec<u8>>)> {
        let data_blocks = Self::blockify(data, version, ec_level)?;

        let ecc_size_per_block = version.ecc_per_block(ec_level)?;
        let ecc_blocks = data_blocks.iter().map(|b| ecc(b, ecc_size_per_block)).collect::<Vec<_>>();

        Ok((data_blocks, ecc_blocks))
    }

    // Splits data into block_count contiguous blocks; when the length doesn't
    // divide evenly the remainder blocks at the end carry one extra codeword
    pub(crate) fn blockify(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> QRResult<Vec<&[u8]>> {
        let block_count = version.block_count(ec_level)?;
        let block_size = data.len() / block_count;
        let remainder = data.len() % block_count;

        let short_count = block_count - remainder;
        let split = short_count * block_size;

        let mut data_blocks = Vec::with_capacity(block_count);
        data_blocks.extend(data[..split].chunks(block_size));
        if remainder > 0 {
            data_blocks.extend(data[split..].chunks(block_size + 1));
        }

        debug_assert!(
            data_blocks.len() == block_count,
            "Block count mismatch: Blocks {}, Expected {block_count}",
            data_blocks.len()
        );

        Ok(data_blocks)
    }

    // Approximate number of codeword errors correctable across all blocks
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> QRResult<usize> {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        let ec_bytes = version.block_count(ec_level)? * version.ecc_per_block(ec_level)?;
        Ok((ec_bytes - p) / 2)
    }

    // Column-major read over the blocks; short blocks simply drop out of
    // the tail columns
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().expect("Blocks is empty");
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
