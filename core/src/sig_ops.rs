use crate::{
    Sig, SigT,
    sig::{Buf, MapBuf, MapBuf2, SigCtx},
};
use std::ops::{Add, Mul};

macro_rules! impl_op {
    ($sig_sig:ident, $sig_scalar:ident, $trait:ident, $fn:ident) => {
        /// Signal for applying the operation pairwise to each element of a pair of signals
        pub struct $sig_sig<L, R>
        where
            L: SigT<Item = f32>,
            R: SigT<Item = f32>,
        {
            lhs: L,
            rhs: R,
        }

        impl<L, R> SigT for $sig_sig<L, R>
        where
            L: SigT<Item = f32>,
            R: SigT<Item = f32>,
        {
            type Item = f32;

            fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
                MapBuf2::new(
                    self.lhs.sample(ctx),
                    self.rhs.sample(ctx),
                    |lhs: f32, rhs: f32| lhs.$fn(rhs),
                )
            }
        }

        impl<S, R> $trait<Sig<R>> for Sig<S>
        where
            S: SigT<Item = f32>,
            R: SigT<Item = f32>,
        {
            type Output = Sig<$sig_sig<S, R>>;

            fn $fn(self, rhs: Sig<R>) -> Self::Output {
                Sig($sig_sig {
                    lhs: self.0,
                    rhs: rhs.0,
                })
            }
        }

        /// Signal for applying the operation to each element of a signal and a scalar
        pub struct $sig_scalar<L>
        where
            L: SigT<Item = f32>,
        {
            lhs: L,
            rhs: f32,
        }

        impl<L> SigT for $sig_scalar<L>
        where
            L: SigT<Item = f32>,
        {
            type Item = f32;

            fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
                let rhs = self.rhs;
                MapBuf::new(self.lhs.sample(ctx), move |lhs: f32| lhs.$fn(rhs))
            }
        }

        impl<S> $trait<f32> for Sig<S>
        where
            S: SigT<Item = f32>,
        {
            type Output = Sig<$sig_scalar<S>>;

            fn $fn(self, rhs: f32) -> Self::Output {
                Sig($sig_scalar { lhs: self.0, rhs })
            }
        }

        impl<S> $trait<Sig<S>> for f32
        where
            S: SigT<Item = f32>,
        {
            type Output = Sig<$sig_scalar<S>>;

            fn $fn(self, rhs: Sig<S>) -> Self::Output {
                // both supported operations are commutative
                Sig($sig_scalar {
                    lhs: rhs.0,
                    rhs: self,
                })
            }
        }
    };
}

impl_op!(SigAdd, SigAddScalar, Add, add);
impl_op!(SigMul, SigMulScalar, Mul, mul);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signal_arithmetic() {
        let buf = (Sig(2.0_f32) * Sig(3.0_f32) + 1.0).render(100.0, 2);
        assert_eq!(buf.as_slice(), &[7.0, 7.0]);
        let buf = (0.5 * Sig(4.0_f32)).render(100.0, 1);
        assert_eq!(buf.as_slice(), &[2.0]);
    }
}
