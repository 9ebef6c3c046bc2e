//! Arbitrary-precision integer with an inline fast path.
//!
//! `Int` keeps values that fit in `i64` inline and only allocates a
//! `BigInt` once a result overflows. Every constructor normalizes, so a
//! `Big` never holds a value that fits in `i64`. That makes the derived
//! `PartialEq` and `Hash` agree with numeric equality.
//!
//! Division and modulo follow floor semantics: the quotient rounds toward
//! negative infinity and the remainder takes the sign of the divisor.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Int {
    Small(i64),
    Big(Rc<BigInt>),
}

impl Int {
    pub const ZERO: Int = Int::Small(0);
    pub const ONE: Int = Int::Small(1);

    #[inline]
    pub const fn from_i64(value: i64) -> Self {
        Int::Small(value)
    }

    /// Build from a `BigInt`, demoting to the inline form when it fits.
    pub fn from_bigint(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Int::Small(small),
            None => Int::Big(Rc::new(value)),
        }
    }

    /// Integral part of a finite float. `None` for infinities and NaN.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let truncated = value.trunc();
        if (-9.223_372_036_854_775_808e18..9.223_372_036_854_775_808e18).contains(&truncated) {
            return Some(Int::Small(truncated as i64));
        }
        BigInt::from_f64(truncated).map(Int::from_bigint)
    }

    pub fn to_bigint(&self) -> BigInt {
        match self {
            Int::Small(v) => BigInt::from(*v),
            Int::Big(b) => (**b).clone(),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Int::Small(v) => Some(*v),
            Int::Big(_) => None,
        }
    }

    /// Nearest float. Values beyond the float range become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Int::Small(v) => *v as f64,
            Int::Big(b) => b.to_f64().unwrap_or(if b.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Int::Small(0))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Int::Small(v) => *v < 0,
            Int::Big(b) => b.is_negative(),
        }
    }

    /// Number of bits needed to represent the magnitude.
    pub fn bit_length(&self) -> u64 {
        match self {
            Int::Small(v) => u64::from(64 - v.unsigned_abs().leading_zeros()),
            Int::Big(b) => b.bits(),
        }
    }

    pub fn add(&self, rhs: &Int) -> Int {
        if let (Int::Small(a), Int::Small(b)) = (self, rhs) {
            if let Some(v) = a.checked_add(*b) {
                return Int::Small(v);
            }
        }
        Int::from_bigint(self.to_bigint() + rhs.to_bigint())
    }

    pub fn sub(&self, rhs: &Int) -> Int {
        if let (Int::Small(a), Int::Small(b)) = (self, rhs) {
            if let Some(v) = a.checked_sub(*b) {
                return Int::Small(v);
            }
        }
        Int::from_bigint(self.to_bigint() - rhs.to_bigint())
    }

    pub fn mul(&self, rhs: &Int) -> Int {
        if let (Int::Small(a), Int::Small(b)) = (self, rhs) {
            if let Some(v) = a.checked_mul(*b) {
                return Int::Small(v);
            }
        }
        Int::from_bigint(self.to_bigint() * rhs.to_bigint())
    }

    pub fn neg(&self) -> Int {
        match self {
            Int::Small(v) => v
                .checked_neg()
                .map_or_else(|| Int::from_bigint(-BigInt::from(*v)), Int::Small),
            Int::Big(b) => Int::from_bigint(-(**b).clone()),
        }
    }

    pub fn abs(&self) -> Int {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Floor division. `None` when `rhs` is zero.
    pub fn floor_div(&self, rhs: &Int) -> Option<Int> {
        if rhs.is_zero() {
            return None;
        }
        if let (Int::Small(a), Int::Small(b)) = (self, rhs) {
            // i64::MIN // -1 overflows and takes the big path.
            if !(*a == i64::MIN && *b == -1) {
                return Some(Int::Small(a.div_floor(b)));
            }
        }
        Some(Int::from_bigint(self.to_bigint().div_floor(&rhs.to_bigint())))
    }

    /// Floor modulo. `None` when `rhs` is zero.
    pub fn modulo(&self, rhs: &Int) -> Option<Int> {
        if rhs.is_zero() {
            return None;
        }
        if let (Int::Small(a), Int::Small(b)) = (self, rhs) {
            if *b == -1 {
                return Some(Int::ZERO);
            }
            return Some(Int::Small(a.mod_floor(b)));
        }
        Some(Int::from_bigint(self.to_bigint().mod_floor(&rhs.to_bigint())))
    }

    pub fn pow(&self, exponent: u32) -> Int {
        if let Int::Small(base) = self {
            if let Some(v) = base.checked_pow(exponent) {
                return Int::Small(v);
            }
        }
        Int::from_bigint(self.to_bigint().pow(exponent))
    }

    /// Modular exponentiation with a non-negative exponent and non-zero modulus.
    /// The result carries the sign of the modulus.
    pub fn pow_mod(&self, exponent: &Int, modulus: &Int) -> Int {
        let m = modulus.to_bigint();
        let raw = self.to_bigint().modpow(&exponent.to_bigint(), &m);
        Int::from_bigint(raw.mod_floor(&m))
    }

    pub fn shl(&self, shift: u64) -> Int {
        if let Int::Small(v) = self {
            if shift < 63 && u64::from(v.unsigned_abs().leading_zeros()) > shift + 1 {
                return Int::Small(v << shift);
            }
        }
        Int::from_bigint(self.to_bigint() << shift)
    }

    pub fn shr(&self, shift: u64) -> Int {
        match self {
            Int::Small(v) => {
                if shift >= 64 {
                    Int::Small(if *v < 0 { -1 } else { 0 })
                } else {
                    Int::Small(v >> shift)
                }
            }
            Int::Big(b) => Int::from_bigint(&**b >> shift),
        }
    }

    pub fn bitand(&self, rhs: &Int) -> Int {
        match (self, rhs) {
            (Int::Small(a), Int::Small(b)) => Int::Small(a & b),
            _ => Int::from_bigint(self.to_bigint() & rhs.to_bigint()),
        }
    }

    pub fn bitor(&self, rhs: &Int) -> Int {
        match (self, rhs) {
            (Int::Small(a), Int::Small(b)) => Int::Small(a | b),
            _ => Int::from_bigint(self.to_bigint() | rhs.to_bigint()),
        }
    }

    pub fn bitxor(&self, rhs: &Int) -> Int {
        match (self, rhs) {
            (Int::Small(a), Int::Small(b)) => Int::Small(a ^ b),
            _ => Int::from_bigint(self.to_bigint() ^ rhs.to_bigint()),
        }
    }

    /// Bitwise inversion, `-x - 1`.
    pub fn invert(&self) -> Int {
        match self {
            Int::Small(v) => Int::Small(!v),
            Int::Big(b) => Int::from_bigint(-(**b).clone() - 1),
        }
    }

    /// Digits in the given radix with an optional prefix, sign first.
    pub fn to_radix_string(&self, radix: u32, prefix: &str) -> String {
        let big = self.to_bigint();
        let digits = big.abs().to_str_radix(radix);
        if big.is_negative() {
            format!("-{prefix}{digits}")
        } else {
            format!("{prefix}{digits}")
        }
    }

    /// Compare against a float exactly. `None` when `rhs` is NaN.
    pub fn cmp_f64(&self, rhs: f64) -> Option<Ordering> {
        if rhs.is_nan() {
            return None;
        }
        if rhs.is_infinite() {
            return Some(if rhs > 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            });
        }
        let floor = rhs.floor();
        let whole = Int::from_f64(floor)?;
        match self.cmp(&whole) {
            Ordering::Equal if rhs > floor => Some(Ordering::Less),
            ord => Some(ord),
        }
    }
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Int::Small(a), Int::Small(b)) => a.cmp(b),
            _ => self.to_bigint().cmp(&other.to_bigint()),
        }
    }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Int::Small(value)
    }
}

impl From<usize> for Int {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Int::from_bigint(BigInt::from(value)), Int::Small)
    }
}

impl From<BigInt> for Int {
    fn from(value: BigInt) -> Self {
        Int::from_bigint(value)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Int::Small(v) => write!(f, "{v}"),
            Int::Big(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
