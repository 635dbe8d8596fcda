use std::ops;

use eyre::Result;
use paste::paste;

use rlekit_core_rs::num::Element;

use super::merge2::{merge_scalar, Arith, BinaryOp, Flipped};
use super::operand::Operand;
use super::RleVec;

// Binary operations against any operand kind. Vector-vector forms fail on a dimension mismatch
// before any work is done, so the in-place variants never leave a half-updated receiver.
macro_rules! impl_binary_ops {
    ($(($name:ident, $arith:expr)),+ $(,)?) => {
        paste! {
            impl<V: Element> RleVec<V> {
                $(
                    #[doc = concat!("Elementwise `self ", stringify!($name), " rhs`.")]
                    pub fn [<try_ $name>]<'a>(&self, rhs: impl Into<Operand<'a, V>>) -> Result<Self>
                    where
                        V: 'a,
                    {
                        rhs.into().combine(self, $arith)
                    }

                    #[doc = concat!("In-place elementwise `self ", stringify!($name), "= rhs`.")]
                    pub fn [<try_ $name _assign>]<'a>(
                        &mut self,
                        rhs: impl Into<Operand<'a, V>>,
                    ) -> Result<()>
                    where
                        V: 'a,
                    {
                        *self = self.[<try_ $name>](rhs)?;
                        Ok(())
                    }
                )+
            }
        }
    };
}

impl_binary_ops!(
    (add, Arith::Add),
    (sub, Arith::Sub),
    (mul, Arith::Mul),
    (div, Arith::Div),
);

impl<V: Element> RleVec<V> {
    /// Elementwise `lhs - self`.
    pub fn try_rsub<'a>(&self, lhs: impl Into<Operand<'a, V>>) -> Result<Self>
    where
        V: 'a,
    {
        lhs.into().combine(self, Flipped(Arith::Sub))
    }

    /// Elementwise `lhs / self`.
    pub fn try_rdiv<'a>(&self, lhs: impl Into<Operand<'a, V>>) -> Result<Self>
    where
        V: 'a,
    {
        lhs.into().combine(self, Flipped(Arith::Div))
    }

    /// Apply `func` to every run value. The result is re-coalesced, since a transform may map
    /// distinct neighbors to identical values.
    pub fn map(&self, mut func: impl FnMut(V) -> V) -> Self {
        let mut result = Self::with_run_capacity(self.num_runs());
        for run in &self.runs {
            result.push_run(func(run.value), run.count);
        }
        result
    }

    /// In-place version of `map`.
    pub fn map_inplace(&mut self, mut func: impl FnMut(V) -> V) {
        for run in &mut self.runs {
            run.value = func(run.value);
        }
        self.coalesce();
    }

    pub fn abs(&self) -> Self {
        self.map(|x| x.abs())
    }

    pub fn abs_inplace(&mut self) {
        self.map_inplace(|x| x.abs())
    }

    pub fn recip(&self) -> Self {
        self.map(Element::recip)
    }

    pub fn recip_inplace(&mut self) {
        self.map_inplace(Element::recip)
    }

    pub fn powi(&self, exp: i32) -> Self {
        self.map(|x| Element::powi(x, exp))
    }

    pub fn powi_inplace(&mut self, exp: i32) {
        self.map_inplace(|x| Element::powi(x, exp))
    }

    /// Elementwise `self ^ exp` with an exponent of the element type, e.g. `0.5` for a square
    /// root of a float vector.
    pub fn pow(&self, exp: V) -> Self {
        self.map(|x| Element::pow(x, exp))
    }

    pub fn pow_inplace(&mut self, exp: V) {
        self.map_inplace(|x| Element::pow(x, exp))
    }

    pub fn neg_inplace(&mut self) {
        for run in &mut self.runs {
            run.value = -run.value;
        }
    }
}

// Broadcast operators with a scalar right-hand side.
macro_rules! impl_scalar_ops {
    ($(($Trait:ident, $arith:expr)),+ $(,)?) => {
        paste! {
            $(
                impl<V: Element> ops::$Trait<V> for &RleVec<V> {
                    type Output = RleVec<V>;

                    fn [<$Trait:lower>](self, rhs: V) -> RleVec<V> {
                        merge_scalar(self, rhs, $arith)
                    }
                }

                impl<V: Element> ops::$Trait<V> for RleVec<V> {
                    type Output = RleVec<V>;

                    fn [<$Trait:lower>](mut self, rhs: V) -> RleVec<V> {
                        ops::[<$Trait Assign>]::[<$Trait:lower _assign>](&mut self, rhs);
                        self
                    }
                }

                impl<V: Element> ops::[<$Trait Assign>]<V> for RleVec<V> {
                    fn [<$Trait:lower _assign>](&mut self, rhs: V) {
                        let mut op = $arith;
                        self.map_inplace(|x| op.apply(&x, &rhs));
                    }
                }
            )+
        }
    };
}

impl_scalar_ops!(
    (Add, Arith::Add),
    (Sub, Arith::Sub),
    (Mul, Arith::Mul),
    (Div, Arith::Div),
);

impl<V: Element> ops::Neg for &RleVec<V> {
    type Output = RleVec<V>;

    fn neg(self) -> RleVec<V> {
        let mut result = self.clone();
        result.neg_inplace();
        result
    }
}

impl<V: Element> ops::Neg for RleVec<V> {
    type Output = RleVec<V>;

    fn neg(mut self) -> RleVec<V> {
        self.neg_inplace();
        self
    }
}
