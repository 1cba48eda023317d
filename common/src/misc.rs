
/// Widens the low `bits` bits of `val` to 16 bits, copying bit `bits - 1`
/// into every higher bit.
pub fn sign_extend(val: u16, bits: u32) -> u16 {
    debug_assert!(bits > 0 && bits < u16::BITS);
    let val = val & field_mask(bits);
    if (val >> (bits - 1)) & 0x1 != 0 {
        val | (u16::MAX << bits)
    } else {
        val
    }
}

pub fn field_mask(bits: u32) -> u16 {
    ((1u32 << bits) - 1) as u16
}

////////////////////////////////////////////////////////////////////////////////

pub trait IsNegative: Copy {
    fn is_negative(self) -> bool;
}

impl IsNegative for u16 {
    fn is_negative(self) -> bool {
        self & 0x8000 != 0
    }
}
