//! Prime sizing for bucket arrays.
//!
//! Both tables keep their capacity prime. For quadratic probing this makes the first
//! `(capacity + 1) / 2` probe positions distinct, which is what the load-factor ceiling of
//! the open addressing table relies on.

/// Returns `true` if `n` is prime.
///
/// Trial division by odd factors up to `factor * factor <= n`.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    while factor.checked_mul(factor).is_some_and(|square| square <= n) {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }

    true
}

/// Returns the smallest prime that is greater than or equal to `n`.
///
/// Anything below 2 rounds up to 2. Otherwise the candidate is forced odd and advanced two at
/// a time until it passes [`is_prime`].
#[must_use]
pub fn next_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }

    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }

    candidate
}
