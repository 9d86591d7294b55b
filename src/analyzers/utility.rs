use std::collections::HashMap;
use std::hash::Hash;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns `None` for empty input.
pub fn stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    Some(variance.sqrt())
}

/// Sample standard deviation (`n - 1` denominator) given a pre-computed
/// mean. Returns `None` for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Middle value, or the average of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Counts every value and orders them by count descending, then by value
/// ascending, so equal inputs always rank the same way.
pub fn frequency_ranking<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut ranking: Vec<(K, usize)> = counts.into_iter().collect();
    ranking.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    ranking
}

/// Every value sharing the highest count, in ascending order, with that count.
pub fn modes<K, I>(values: I) -> Option<(Vec<K>, usize)>
where
    K: Eq + Hash + Ord,
    I: IntoIterator<Item = K>,
{
    let ranking = frequency_ranking(values);
    let top = ranking.first()?.1;
    let tied = ranking
        .into_iter()
        .take_while(|(_, count)| *count == top)
        .map(|(k, _)| k)
        .collect();
    Some((tied, top))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values).unwrap();
        assert_eq!(m, 5.0);
        assert_eq!(stddev(&values, m), Some(2.0));
    }

    #[test]
    fn test_sample_stddev_uses_n_minus_one() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // sum of squares 32 over 7
        let s = sample_stddev(&values, 5.0).unwrap();
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);

        assert_eq!(sample_stddev(&[42.0], 42.0), None);
        assert_eq!(sample_stddev(&[], 0.0), None);
    }

    #[test]
    fn test_empty_input_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(stddev(&[], 0.0), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.349), 33.3);
        assert_eq!(round1(33.35001), 33.4);
    }

    #[test]
    fn test_frequency_ranking_breaks_ties_by_value() {
        let ranking = frequency_ranking(vec![5, 3, 5, 3, 1]);
        assert_eq!(ranking, vec![(3, 2), (5, 2), (1, 1)]);
    }

    #[test]
    fn test_modes_returns_all_ties() {
        let (tied, count) = modes(vec!["b", "a", "b", "a", "c"]).unwrap();
        assert_eq!(tied, vec!["a", "b"]);
        assert_eq!(count, 2);

        assert!(modes(Vec::<u32>::new()).is_none());
    }
}
