/// Weight of the choice stored at `position` out of `len` choices.
///
/// With a non-negative step the first choice ranks highest:
/// `(len - 1 - position) * step + start`. With a negative step the weight
/// sequence starts at the last choice: `start + (len - 1 - position) * step`.
/// Both branches of [`weighted_average`] reduce to this expression.
///
/// Returns `None` when `position` is not below `len`.
pub fn weight_for(position: usize, len: usize, start_bound: i32, iterate_step: i32) -> Option<i64> {
    let rank = len.checked_sub(position)?.checked_sub(1)? as i64; // 0 for the last choice
    Some(i64::from(start_bound) + rank * i64::from(iterate_step))
}

/// Average weight of a ballot's votes. `vote_counts` is in stored choice order.
///
/// Returns 0.0 when nobody voted.
pub fn weighted_average(start_bound: i32, iterate_step: i32, vote_counts: &[usize]) -> f32 {
    let total_votes: usize = vote_counts.iter().sum();
    if total_votes == 0 {
        return 0.0;
    }

    let len = vote_counts.len();
    let mut total: i64 = 0;

    if iterate_step < 0 {
        // Walk the weights forward, the choices backward
        for i in 0..len {
            let weight = i64::from(start_bound) + i as i64 * i64::from(iterate_step);
            total += weight * vote_counts[len - 1 - i] as i64;
        }
    } else {
        for (i, count) in vote_counts.iter().enumerate() {
            let current = (len - i) as i64; // len for the first choice, 1 for the last
            let weight = (current - 1) * i64::from(iterate_step) + i64::from(start_bound);
            total += weight * *count as i64;
        }
    }

    total as f32 / total_votes as f32
}
