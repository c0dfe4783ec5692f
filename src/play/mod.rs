//! Terminal quiz: setup prompts, question rendering, answer input, result summary.

pub mod session;

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

use crate::core::quiz::{Difficulty, QuizQuestion};

pub use session::{AnswerFeedback, QuizOutcome, QuizSession};

/// Wrap width for question text.
const WRAP_WIDTH: usize = 78;

/// Option label for a zero-based index: 0 -> 'A'.
pub fn option_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Parse "a"-"d" (any case) or "1"-"4" into a zero-based option index.
pub fn parse_answer(input: &str) -> Option<usize> {
    let s = input.trim();
    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c.to_ascii_uppercase() {
        'A'..='D' => Some(c.to_ascii_uppercase() as usize - 'A' as usize),
        '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Ask for a topic until a non-blank one is given.
pub fn prompt_topic<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    loop {
        write!(output, "Topic: ")?;
        output.flush()?;
        let topic = read_line(input)?;
        if !topic.is_empty() {
            return Ok(topic);
        }
        writeln!(output, "{}", "Please enter a topic".red())?;
    }
}

/// Ask for a difficulty; an empty answer keeps `default`.
pub fn prompt_difficulty<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: Difficulty,
) -> io::Result<Difficulty> {
    loop {
        write!(output, "Difficulty (beginner/intermediate/advanced) [{}]: ", default)?;
        output.flush()?;
        let answer = read_line(input)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse() {
            Ok(d) => return Ok(d),
            Err(e) => writeln!(output, "{}", e.to_string().red())?,
        }
    }
}

/// Yes/no question; empty input means yes.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{} [Y/n] ", question)?;
    output.flush()?;
    let answer = read_line(input)?;
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn render_question<W: Write>(
    output: &mut W,
    position: usize,
    total: usize,
    score: usize,
    question: &QuizQuestion,
) -> io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "{}",
        format!("Question {} of {}   Score: {}/{}", position + 1, total, score, total).dim()
    )?;
    writeln!(output, "{}", textwrap::fill(&question.question, WRAP_WIDTH).bold())?;
    for (i, option) in question.options.iter().enumerate() {
        let indent = "    ";
        let opts = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent("")
            .subsequent_indent(indent);
        writeln!(output, "  {}) {}", option_letter(i), textwrap::fill(option, opts))?;
    }
    Ok(())
}

fn render_feedback<W: Write>(
    output: &mut W,
    question: &QuizQuestion,
    feedback: AnswerFeedback,
) -> io::Result<()> {
    if feedback.is_correct {
        writeln!(output, "{}", "✓ Correct!".green())
    } else {
        let answer = format!(
            "✗ Wrong. Answer: {}) {}",
            option_letter(feedback.correct),
            question.correct_option()
        );
        writeln!(output, "{}", answer.red())
    }
}

/// Drive an in-progress session to completion, one line of input per answer.
pub fn run_quiz<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    while let Some((position, total, question)) = session.current_question() {
        let question = question.clone();
        render_question(output, position, total, session.score(), &question)?;

        let choice = loop {
            write!(output, "Your answer (A-D): ")?;
            output.flush()?;
            match parse_answer(&read_line(input)?) {
                Some(choice) => break choice,
                None => writeln!(output, "{}", "Enter A, B, C or D.".yellow())?,
            }
        };

        let feedback = session
            .select(choice)
            .and_then(|_| session.next())
            .map_err(|e| io::Error::other(e.to_string()))?;
        render_feedback(output, &question, feedback)?;
    }
    Ok(())
}

/// Final score line, with a cheer for excellent results.
pub fn render_summary<W: Write>(output: &mut W, outcome: &QuizOutcome) -> io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "{}",
        format!(
            "{} ({}): {}/{} correct, {}%",
            outcome.topic,
            outcome.difficulty,
            outcome.score,
            outcome.total,
            outcome.percentage()
        )
        .bold()
    )?;
    if outcome.is_excellent() {
        writeln!(output, "{}", "Excellent score!".green().bold())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quiz::{GenerationRequest, QuizResponse};
    use std::io::Cursor;

    fn session_with(correct: [usize; 2]) -> QuizSession {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                QuizQuestion::new(
                    format!("Question number {}", i + 1),
                    ["Alpha", "Beta", "Gamma", "Delta"].map(String::from),
                    c,
                )
                .unwrap()
            })
            .collect();
        let mut session = QuizSession::new();
        session
            .start(
                GenerationRequest::new("Greek letters", Difficulty::Beginner).unwrap(),
                QuizResponse { questions },
            )
            .unwrap();
        session
    }

    #[test]
    fn parse_answer_accepts_letters_and_digits() {
        assert_eq!(parse_answer("a"), Some(0));
        assert_eq!(parse_answer(" D "), Some(3));
        assert_eq!(parse_answer("2"), Some(1));
        assert_eq!(parse_answer("e"), None);
        assert_eq!(parse_answer("5"), None);
        assert_eq!(parse_answer("ab"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[test]
    fn option_letters() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }

    #[test]
    fn run_quiz_scores_answers() {
        let mut session = session_with([1, 2]);
        let mut input = Cursor::new("x\nb\nA\n");
        let mut output = Vec::new();

        run_quiz(&mut session, &mut input, &mut output).unwrap();

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total, 2);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Question number 1"));
        assert!(text.contains("Enter A, B, C or D."));
        assert!(text.contains("Correct!"));
        assert!(text.contains("Answer: C) Gamma"));
    }

    #[test]
    fn run_quiz_fails_on_closed_input() {
        let mut session = session_with([0, 0]);
        let mut input = Cursor::new("a\n");
        let mut output = Vec::new();
        let err = run_quiz(&mut session, &mut input, &mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn prompts_repeat_until_valid() {
        let mut input = Cursor::new("\n  Rust  \nexpert\nADVANCED\n");
        let mut output = Vec::new();
        let topic = prompt_topic(&mut input, &mut output).unwrap();
        let difficulty =
            prompt_difficulty(&mut input, &mut output, Difficulty::Intermediate).unwrap();
        assert_eq!(topic, "Rust");
        assert_eq!(difficulty, Difficulty::Advanced);
        assert!(String::from_utf8(output).unwrap().contains("Please enter a topic"));
    }

    #[test]
    fn empty_difficulty_keeps_default() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert_eq!(
            prompt_difficulty(&mut input, &mut output, Difficulty::Beginner).unwrap(),
            Difficulty::Beginner
        );
    }

    #[test]
    fn confirm_defaults_to_yes() {
        let mut output = Vec::new();
        assert!(confirm(&mut Cursor::new("\n"), &mut output, "Again?").unwrap());
        assert!(confirm(&mut Cursor::new("Yes\n"), &mut output, "Again?").unwrap());
        assert!(!confirm(&mut Cursor::new("n\n"), &mut output, "Again?").unwrap());
    }

    #[test]
    fn summary_cheers_excellent_scores() {
        let outcome = QuizOutcome {
            topic: "Greek letters".to_string(),
            difficulty: Difficulty::Beginner,
            score: 10,
            total: 10,
        };
        let mut output = Vec::new();
        render_summary(&mut output, &outcome).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("10/10 correct, 100%"));
        assert!(text.contains("Excellent score!"));
    }
}
