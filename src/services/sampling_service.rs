//! Point-budget downsampler
//!
//! Safety net behind the adaptive interval sampling: whatever still exceeds
//! the render budget after merging gets thinned to a uniform stride here.

/// Reduce `data` to at most `max_points` stride-selected elements, appending
/// the original last element when the stride missed it. Output length is
/// `max_points` or `max_points + 1`; deterministic for identical inputs.
pub fn sample_data_points<T: Clone>(data: &[T], max_points: usize) -> Vec<T> {
    if data.len() <= max_points {
        return data.to_vec();
    }
    let step = data.len() as f64 / max_points as f64;
    let mut sampled = Vec::with_capacity(max_points + 1);
    let mut last_index = None;
    for i in 0..max_points {
        let index = (i as f64 * step).floor() as usize;
        sampled.push(data[index].clone());
        last_index = Some(index);
    }
    if last_index != Some(data.len() - 1) {
        sampled.push(data[data.len() - 1].clone());
    }
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_under_budget() {
        let data: Vec<u32> = (0..50).collect();
        assert_eq!(sample_data_points(&data, 100), data);
        assert_eq!(sample_data_points(&data, 50), data);
    }

    #[test]
    fn test_thousand_points_to_hundred() {
        let data: Vec<u32> = (0..1000).collect();
        let sampled = sample_data_points(&data, 100);
        assert!(sampled.len() == 100 || sampled.len() == 101);
        assert_eq!(*sampled.first().unwrap(), 0);
        assert_eq!(*sampled.last().unwrap(), 999);
    }

    #[test]
    fn test_last_element_always_preserved() {
        for len in [101usize, 333, 800, 801, 1234] {
            let data: Vec<usize> = (0..len).collect();
            let sampled = sample_data_points(&data, 100);
            assert_eq!(*sampled.last().unwrap(), len - 1, "len={}", len);
            assert!(sampled.len() <= 101, "len={}", len);
        }
    }

    #[test]
    fn test_no_appended_duplicate_when_stride_lands_on_last() {
        // 200 / 100 = 2.0: index 99 * 2 = 198, last element appended once
        let data: Vec<u32> = (0..200).collect();
        let sampled = sample_data_points(&data, 100);
        assert_eq!(sampled.len(), 101);
        assert_eq!(sampled[99], 198);
        assert_eq!(sampled[100], 199);
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u32> = (0..977).collect();
        assert_eq!(sample_data_points(&data, 123), sample_data_points(&data, 123));
    }
}
