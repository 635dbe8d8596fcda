use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// T values are float numbers
pub trait Float: ::num::Float + Debug + Default {}

impl<T: ::num::Float + Debug + Default> Float for T {}

/// Scalar values that can be stored in run-length encoded vectors.
///
/// Besides the usual signed ring/field operations provided by the `num` traits, an element must
/// define when two values are `identical`, i.e. when they belong to the same run. For integers
/// this is plain equality, while floats are compared with the relative `TOLERANCE`.
pub trait Element:
    ::num::Num
    + ::num::Signed
    + ::num::NumCast
    + ::num::Bounded
    + Copy
    + PartialOrd
    + Debug
    + Default
    + Display
{
    /// Relative tolerance used to compare values. Zero for exact types.
    const TOLERANCE: f64;

    /// Determines whether two values are identical for the purpose of run-length encoding.
    /// No guarantees are made about which of the two values is kept in the resulting run.
    fn identical(&self, other: &Self) -> bool;

    /// Multiplicative inverse, `1 / self`. Integer types follow integer division rules.
    fn recip(self) -> Self;

    /// Raise the value to an integer power. Negative exponents are computed as the reciprocal
    /// of the positive power.
    fn powi(self, exp: i32) -> Self;

    /// Raise the value to a power of the same type. Floats accept any real exponent, integers
    /// follow `powi` semantics for negative exponents.
    fn pow(self, exp: Self) -> Self;

    /// Contribution of a run with the given value and length to a sum, `self * count`.
    /// The count is never narrowed to `Self`, the product overflows only if the result does.
    fn times(self, count: usize) -> Self;

    /// Always false for exact types.
    fn is_nan(&self) -> bool;

    /// Total order over all values, NaN sorts after everything else and all NaNs are equal.
    fn total_order(&self, other: &Self) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
        }
    }
}

/// `value * count` by binary doubling in the value's own type. Partial results never exceed
/// the magnitude of the final product.
#[inline]
fn times_by_doubling<T: Copy + ::num::Zero + std::ops::Add<Output = T>>(value: T, count: usize) -> T {
    let (mut result, mut base, mut count) = (T::zero(), value, count);
    while count > 0 {
        if count & 1 == 1 {
            result = result + base;
        }
        count >>= 1;
        if count > 0 {
            base = base + base;
        }
    }
    result
}

macro_rules! impl_float_element {
    ($($t:ty = $tolerance:expr),+ $(,)?) => {
        $(
            impl Element for $t {
                const TOLERANCE: f64 = $tolerance;

                #[inline]
                fn identical(&self, other: &Self) -> bool {
                    let (first, second) = (*self, *other);
                    if first.is_nan() || second.is_nan() {
                        return first.is_nan() && second.is_nan();
                    }
                    if first == second {
                        return true;
                    }
                    if first.is_infinite() || second.is_infinite() {
                        return false;
                    }

                    let scale = first.abs().max(second.abs()).max(1.0);
                    (first - second).abs() <= (Self::TOLERANCE as $t) * scale
                }

                #[inline(always)]
                fn recip(self) -> Self {
                    <$t>::recip(self)
                }

                #[inline(always)]
                fn powi(self, exp: i32) -> Self {
                    <$t>::powi(self, exp)
                }

                #[inline(always)]
                fn pow(self, exp: Self) -> Self {
                    <$t>::powf(self, exp)
                }

                #[inline(always)]
                fn times(self, count: usize) -> Self {
                    self * (count as $t)
                }

                #[inline(always)]
                fn is_nan(&self) -> bool {
                    <$t>::is_nan(*self)
                }
            }
        )+
    };
}

macro_rules! impl_int_element {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Element for $t {
                const TOLERANCE: f64 = 0.0;

                #[inline(always)]
                fn identical(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline(always)]
                fn recip(self) -> Self {
                    1 / self
                }

                #[inline]
                fn powi(self, exp: i32) -> Self {
                    let power = <$t>::pow(self, exp.unsigned_abs());
                    if exp >= 0 {
                        power
                    } else {
                        1 / power
                    }
                }

                #[inline]
                fn pow(self, exp: Self) -> Self {
                    let (mut power, mut base, mut left): ($t, $t, _) = (1, self, exp.unsigned_abs());
                    while left > 0 {
                        if left & 1 == 1 {
                            power *= base;
                        }
                        left >>= 1;
                        if left > 0 {
                            base *= base;
                        }
                    }

                    if exp >= 0 {
                        power
                    } else {
                        1 / power
                    }
                }

                #[inline]
                fn times(self, count: usize) -> Self {
                    times_by_doubling(self, count)
                }

                #[inline(always)]
                fn is_nan(&self) -> bool {
                    false
                }
            }
        )+
    };
}

impl_float_element!(f32 = 1e-6, f64 = 1e-12);
impl_int_element!(i8, i16, i32, i64, isize);
