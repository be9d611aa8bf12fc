use uuid::Uuid;

/// One answered flashcard or question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsweredItem {
    pub item_id: Uuid,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScore {
    /// 0..=100
    pub score: i16,
    pub correct_count: i32,
    pub incorrect_count: i32,
}

/// Score a finished session from its finalized answers only.
///
/// `round(100 * correct / total)`, half away from zero. An empty session scores 0.
pub fn finalize_session(items: &[AnsweredItem]) -> SessionScore {
    let correct = items.iter().filter(|item| item.is_correct).count() as i64;
    let total = items.len() as i64;

    let score = if total == 0 {
        0
    } else {
        // Integer form of round-half-up for non-negative values
        (200 * correct + total) / (2 * total)
    };

    SessionScore {
        score: score as i16,
        correct_count: correct as i32,
        incorrect_count: (total - correct) as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(correct: usize, incorrect: usize) -> Vec<AnsweredItem> {
        (0..correct)
            .map(|_| true)
            .chain((0..incorrect).map(|_| false))
            .map(|is_correct| AnsweredItem {
                item_id: Uuid::new_v4(),
                is_correct,
            })
            .collect()
    }

    #[test]
    fn test_all_correct_scores_100() {
        let result = finalize_session(&answers(10, 0));
        assert_eq!(result.score, 100);
        assert_eq!(result.correct_count, 10);
        assert_eq!(result.incorrect_count, 0);
    }

    #[test]
    fn test_empty_session_scores_zero() {
        let result = finalize_session(&[]);
        assert_eq!(
            result,
            SessionScore {
                score: 0,
                correct_count: 0,
                incorrect_count: 0
            }
        );
    }

    #[test]
    fn test_rounding() {
        // 2/3 = 66.67
        assert_eq!(finalize_session(&answers(2, 1)).score, 67);
        // 1/3 = 33.33
        assert_eq!(finalize_session(&answers(1, 2)).score, 33);
        // 1/8 = 12.5
        assert_eq!(finalize_session(&answers(1, 7)).score, 13);
        assert_eq!(finalize_session(&answers(0, 4)).score, 0);
    }

    #[test]
    fn test_score_matches_float_formula() {
        for correct in 0..=12 {
            for incorrect in 0..=12 {
                if correct + incorrect == 0 {
                    continue;
                }
                let expected =
                    (100.0 * correct as f64 / (correct + incorrect) as f64).round() as i16;
                assert_eq!(
                    finalize_session(&answers(correct, incorrect)).score,
                    expected,
                    "{}/{}",
                    correct,
                    correct + incorrect
                );
            }
        }
    }
}
