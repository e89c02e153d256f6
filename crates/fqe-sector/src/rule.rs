/// Composes an alpha and a beta address contribution into a state-vector index.
///
/// The contributions are produced by the caller's encoder; the kernel only
/// applies the combination. Implementations must be pure.
pub trait AddressRule: Sync {
    /// Returns the composite address for one (alpha, beta) pair.
    fn combine(&self, alpha: u64, beta: u64) -> u64;
}

/// Combination for linear (mod 2) encoders: bitwise XOR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XorRule;

impl AddressRule for XorRule {
    #[inline]
    fn combine(&self, alpha: u64, beta: u64) -> u64 {
        alpha ^ beta
    }
}

/// Additive combination, for tables with a row stride baked into the alpha part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetRule;

impl AddressRule for OffsetRule {
    #[inline]
    fn combine(&self, alpha: u64, beta: u64) -> u64 {
        alpha.wrapping_add(beta)
    }
}

impl<R: AddressRule + ?Sized> AddressRule for &R {
    #[inline]
    fn combine(&self, alpha: u64, beta: u64) -> u64 {
        (**self).combine(alpha, beta)
    }
}
