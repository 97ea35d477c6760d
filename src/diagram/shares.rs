//! Percentage shares with one decimal that add up to exactly 100.
//!
//! Shares are handed out in tenths of a percent by largest remainder: every
//! weight first gets the tenths it fully earns, then the leftover tenths go
//! to the weights with the largest remainders, earlier weights first on ties.

const TENTHS: u128 = 1000;

/// One share per weight, in input order. All zeros when the weights sum to 0.
pub fn shares(weights: &[u64]) -> Vec<f64> {
    let total: u128 = weights.iter().map(|w| u128::from(*w)).sum();
    if total == 0 {
        return vec![0.0; weights.len()];
    }

    let mut tenths: Vec<u128> = Vec::with_capacity(weights.len());
    let mut remainders: Vec<(u128, usize)> = Vec::with_capacity(weights.len());
    for (index, weight) in weights.iter().enumerate() {
        let scaled = u128::from(*weight) * TENTHS;
        tenths.push(scaled / total);
        remainders.push((scaled % total, index));
    }

    let leftover = TENTHS - tenths.iter().sum::<u128>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, index) in remainders.into_iter().take(leftover as usize) {
        tenths[index] += 1;
    }

    tenths.into_iter().map(|t| t as f64 / 10.0).collect()
}
