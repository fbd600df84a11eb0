//! Alignment of monthly series onto a different month range

/// How to fill target months that the source series does not cover
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extend<T> {
    /// Repeat the first (left side) or last (right side) known value
    Edge,
    /// Use a fixed value on both sides
    Value(T),
}

/// Re-index `values` (laid out on the contiguous month axis `source_t`) onto
/// `target_t`.
///
/// Months inside the source range copy the source value; months before or
/// after it are filled according to `extend`. An empty source can only be
/// filled with `Extend::Value`, otherwise `T::default()` is used.
pub fn adjust_array_zero<T: Copy + Default>(
    values: &[T],
    source_t: &[i64],
    target_t: &[i64],
    extend: Extend<T>,
) -> Vec<T> {
    let (first, last) = match (values.first(), values.last(), source_t.first()) {
        (Some(&f), Some(&l), Some(_)) => (f, l),
        _ => {
            let fill = match extend {
                Extend::Value(v) => v,
                Extend::Edge => T::default(),
            };
            return vec![fill; target_t.len()];
        }
    };
    let start = source_t[0];
    let len = values.len().min(source_t.len()) as i64;

    target_t
        .iter()
        .map(|&t| {
            let idx = t - start;
            if idx < 0 {
                match extend {
                    Extend::Edge => first,
                    Extend::Value(v) => v,
                }
            } else if idx >= len {
                match extend {
                    Extend::Edge => last,
                    Extend::Value(v) => v,
                }
            } else {
                values[idx as usize]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_and_extend_edges() {
        let values = [1.0, 2.0, 3.0];
        let source = [5, 6, 7];
        let target = [3, 4, 5, 6, 7, 8];
        let out = adjust_array_zero(&values, &source, &target, Extend::Edge);
        assert_eq!(out, vec![1.0, 1.0, 1.0, 2.0, 3.0, 3.0]);

        let inner = adjust_array_zero(&values, &source, &[6], Extend::Edge);
        assert_eq!(inner, vec![2.0]);
    }

    #[test]
    fn test_extend_with_value() {
        let out = adjust_array_zero(&[4.0, 5.0], &[0, 1], &[-1, 0, 1, 2], Extend::Value(0.0));
        assert_eq!(out, vec![0.0, 4.0, 5.0, 0.0]);
    }

    #[test]
    fn test_empty_source() {
        let out: Vec<bool> = adjust_array_zero(&[], &[], &[0, 1], Extend::Value(true));
        assert_eq!(out, vec![true, true]);
    }
}
