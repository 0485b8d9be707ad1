/// Trailing simple moving average over `values`.
///
/// Entry `i` is the arithmetic mean of the `window` values ending at `i`
/// inclusive, or `None` while fewer than `window` observations exist. A
/// window longer than the input yields an all-`None` series. Maintained as
/// an incremental running sum so the whole scan stays O(n) regardless of
/// window size.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    debug_assert!(window > 0, "window must be validated by the caller");

    let mut out = Vec::with_capacity(values.len());
    let mut running_sum = 0.0;

    for (i, value) in values.iter().enumerate() {
        running_sum += value;
        if i >= window {
            running_sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(running_sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warms_up_then_averages() {
        let values = [10.0, 11.0, 9.0, 12.0];
        let ma = rolling_mean(&values, 2);
        assert_eq!(ma[0], None);
        assert_relative_eq!(ma[1].unwrap(), 10.5);
        assert_relative_eq!(ma[2].unwrap(), 10.0);
        assert_relative_eq!(ma[3].unwrap(), 10.5);
    }

    #[test]
    fn window_of_one_is_the_input() {
        let values = [3.0, 7.0, 5.0];
        let ma = rolling_mean(&values, 1);
        assert_eq!(ma, vec![Some(3.0), Some(7.0), Some(5.0)]);
    }

    #[test]
    fn window_longer_than_input_is_all_undefined() {
        let values = [1.0, 2.0, 3.0];
        assert!(rolling_mean(&values, 4).iter().all(Option::is_none));
    }

    #[test]
    fn matches_naive_mean_over_a_longer_series() {
        let values: Vec<f64> = (1..=50).map(|v| v as f64 * 1.37).collect();
        let window = 7;
        let ma = rolling_mean(&values, window);
        for i in (window - 1)..values.len() {
            let naive: f64 =
                values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
            assert_relative_eq!(ma[i].unwrap(), naive, max_relative = 1e-12);
        }
    }
}
