// GF(256) arithmetic
//------------------------------------------------------------------------------

// Field generated by x^8 + x^4 + x^3 + x^2 + 1
const GF_PRIMITIVE: usize = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x = 1usize;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x > 255 {
            x ^= GF_PRIMITIVE;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    // log(0) is undefined and must never be consulted
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

// Antilog table: GF_EXP[i] = α^i
const GF_EXP: [u8; 256] = build_exp_table();

// Log table: GF_LOG[α^i] = i
const GF_LOG: [u8; 256] = build_log_table();

const fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    GF_EXP[(GF_LOG[a as usize] as usize + GF_LOG[b as usize] as usize) % 255]
}

// Generator polynomials
//------------------------------------------------------------------------------

// Largest correction block length across all versions and levels
const MAX_BLOCK_ECC: usize = 30;

// Row k holds the coefficients of Π (x - α^i) for i in 0..k, in log domain,
// leading term dropped (the division below ejects it)
const fn build_generator_table() -> [[u8; MAX_BLOCK_ECC]; MAX_BLOCK_ECC + 1] {
    let mut table = [[0u8; MAX_BLOCK_ECC]; MAX_BLOCK_ECC + 1];
    let mut poly = [0u8; MAX_BLOCK_ECC + 1];
    poly[0] = 1;
    let mut len = 1;
    let mut i = 0;
    while i < MAX_BLOCK_ECC {
        let a = GF_EXP[i];
        let mut next = [0u8; MAX_BLOCK_ECC + 1];
        let mut j = 0;
        while j < len {
            next[j] ^= poly[j];
            next[j + 1] ^= gf_mul(poly[j], a);
            j += 1;
        }
        poly = next;
        len += 1;

        let ec_len = i + 1;
        let mut k = 0;
        while k < ec_len {
            table[ec_len][k] = GF_LOG[poly[k + 1] as usize];
            k += 1;
        }
        i += 1;
    }
    table
}

static GENERATOR_POLYNOMIALS: [[u8; MAX_BLOCK_ECC]; MAX_BLOCK_ECC + 1] = build_generator_table();

fn generator_polynomial(ec_len: usize) -> &'static [u8] {
    debug_assert!(
        (1..=MAX_BLOCK_ECC).contains(&ec_len),
        "No generator polynomial for ec length {ec_len}"
    );
    &GENERATOR_POLYNOMIALS[ec_len][..ec_len]
}

// Error correction codewords
//------------------------------------------------------------------------------

// Polynomial long division of the data block by the generator polynomial;
// the remainder is the correction block, exactly ec_len bytes
pub fn ecc(data: &[u8], ec_len: usize) -> Vec<u8> {
    let gen = generator_polynomial(ec_len);
    let dlen = data.len();
    let mut buf = vec![0u8; dlen + ec_len];
    buf[..dlen].copy_from_slice(data);

    for i in 0..dlen {
        let lead = buf[i];
        if lead == 0 {
            continue;
        }
        let log_lead = GF_LOG[lead as usize] as usize;
        for (j, &g) in gen.iter().enumerate() {
            buf[i + 1 + j] ^= GF_EXP[(g as usize + log_lead) % 255];
        }
    }

    buf[dlen..].to_vec()
}
