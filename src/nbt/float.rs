//! Approximate float comparison used by tag equality.
//!
//! Two values are equal when they are within [`MAX_ULPS`] units in the last
//! place of each other. NaN never compares equal, so a tree holding a NaN is
//! not equal to itself, and the relation is not transitive. It exists so that
//! round-tripped documents compare equal, nothing more.

pub const MAX_ULPS: u64 = 4;

const F32_SIGN: u32 = 1 << 31;
const F64_SIGN: u64 = 1 << 63;

fn biased_f32(bits: u32) -> u32 {
    if bits & F32_SIGN != 0 {
        (!bits).wrapping_add(1)
    } else {
        bits | F32_SIGN
    }
}

fn biased_f64(bits: u64) -> u64 {
    if bits & F64_SIGN != 0 {
        (!bits).wrapping_add(1)
    } else {
        bits | F64_SIGN
    }
}

pub fn almost_equal_f32(lhs: f32, rhs: f32) -> bool {
    if lhs.is_nan() || rhs.is_nan() {
        return false;
    }
    let a = biased_f32(lhs.to_bits());
    let b = biased_f32(rhs.to_bits());
    u64::from(a.abs_diff(b)) <= MAX_ULPS
}

pub fn almost_equal_f64(lhs: f64, rhs: f64) -> bool {
    if lhs.is_nan() || rhs.is_nan() {
        return false;
    }
    let a = biased_f64(lhs.to_bits());
    let b = biased_f64(rhs.to_bits());
    a.abs_diff(b) <= MAX_ULPS
}
