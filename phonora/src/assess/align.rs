/// Word-level Levenshtein alignment of `reference` against `recognized`.
///
/// Returns, for each reference index, the recognized index it is paired
/// with, or `None` when the reference word was dropped. Recognized words
/// with no reference partner (insertions) do not appear in the result.
/// On equal cost the backtrace prefers a pairing, then dropping the
/// reference word, then skipping a recognized word.
pub fn align_words(reference: &[&str], recognized: &[&str]) -> Vec<Option<usize>> {
    let n = reference.len();
    let m = recognized.len();

    // cost[i][j]: edit distance between reference[..i] and recognized[..j]
    let mut cost = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in cost.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        cost[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let pair = cost[i - 1][j - 1] + usize::from(reference[i - 1] != recognized[j - 1]);
            cost[i][j] = pair.min(cost[i - 1][j] + 1).min(cost[i][j - 1] + 1);
        }
    }

    let mut pairing = vec![None; n];
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        let pair = cost[i - 1][j - 1] + usize::from(reference[i - 1] != recognized[j - 1]);
        if cost[i][j] == pair {
            pairing[i - 1] = Some(j - 1);
            i -= 1;
            j -= 1;
        } else if cost[i][j] == cost[i - 1][j] + 1 {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairing
}
