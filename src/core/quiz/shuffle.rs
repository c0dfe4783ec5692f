//! Random option order with correct-index remapping.

use rand::Rng;

use super::{OPTION_COUNT, QuizQuestion};

/// Permute the options of `question` uniformly at random.
///
/// The same Fisher-Yates swaps are applied to a parallel array of original positions, so the
/// new correct index is where the original correct position ended up.
pub fn shuffle_options<R: Rng>(question: QuizQuestion, rng: &mut R) -> QuizQuestion {
    let mut order: [usize; OPTION_COUNT] = std::array::from_fn(|i| i);
    for i in (1..OPTION_COUNT).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }

    let QuizQuestion {
        question,
        options,
        correct,
    } = question;
    let mut originals = options.map(Some);
    let options = order.map(|from| originals[from].take().unwrap_or_default());
    let correct = order
        .iter()
        .position(|&from| from == correct)
        .unwrap_or(correct);

    QuizQuestion {
        question,
        options,
        correct,
    }
}

/// Shuffle every question independently with a thread-local generator.
pub fn shuffle_quiz(questions: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
    let mut rng = rand::thread_rng();
    questions
        .into_iter()
        .map(|q| shuffle_options(q, &mut rng))
        .collect()
}
