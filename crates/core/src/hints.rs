//! Operand-driven hint selection.
//!
//! Each operator has an ordered list of strategies; the first one whose
//! condition matches the operands wins, the last is unconditional.

use crate::model::{Hint, HintStrategy, Operator, Problem};

#[must_use]
pub fn generate_hint(problem: &Problem) -> Hint {
    let a = problem.operand1();
    let b = problem.operand2();
    let answer = problem.answer_text();

    match problem.operator() {
        Operator::Add => addition_hint(a, b, &answer),
        Operator::Subtract => subtraction_hint(a, b, &answer),
        Operator::Multiply => multiplication_hint(a, b, &answer),
        Operator::Divide => division_hint(a, b, &answer),
    }
}

fn tens(n: i64) -> i64 {
    n.div_euclid(10) * 10
}

fn ones(n: i64) -> i64 {
    n % 10
}

fn join(values: impl Iterator<Item = i64>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn addition_hint(a: i64, b: i64, answer: &str) -> Hint {
    let larger = a.max(b);
    let smaller = a.min(b);
    let (ones1, ones2) = (ones(a), ones(b));
    let (tens1, tens2) = (tens(a), tens(b));

    if ones1 + ones2 == 10 || ones1 == 0 || ones2 == 0 {
        return Hint::new(
            HintStrategy::MakingTens,
            format!(
                "Make a 10! Add the ones: {ones1} + {ones2} = {}. Add the tens: {tens1} + {tens2} = {}. Now combine them!",
                ones1 + ones2,
                tens1 + tens2
            ),
        );
    }

    if (a - b).abs() <= 1 {
        let message = if a == b {
            format!("This is a double! {a} + {a} = {a} × 2 = {answer}")
        } else {
            format!(
                "Almost a double! Think: {smaller} + {smaller} = {}, then add 1 more = {answer}",
                smaller * 2
            )
        };
        return Hint::new(HintStrategy::Doubles, message);
    }

    if larger >= 10 {
        return Hint::new(
            HintStrategy::PlaceValue,
            format!(
                "Break it down! Tens: {tens1} + {tens2} = {}. Ones: {ones1} + {ones2} = {}. Add together: {answer}",
                tens1 + tens2,
                ones1 + ones2
            ),
        );
    }

    Hint::new(
        HintStrategy::CountingOn,
        format!(
            "Start at {larger} and count up {smaller} more: {}",
            join((1..=smaller).map(|step| larger + step))
        ),
    )
}

fn subtraction_hint(a: i64, b: i64, answer: &str) -> Hint {
    if a <= 20 && b <= 10 {
        return Hint::new(
            HintStrategy::NumberBonds,
            format!("Think: what + {b} = {a}? The answer is {answer}!"),
        );
    }

    let (ones1, ones2) = (ones(a), ones(b));
    if a >= 20 && ones1 >= ones2 {
        let (tens1, tens2) = (tens(a), tens(b));
        return Hint::new(
            HintStrategy::PlaceValue,
            format!(
                "Break it down! Tens: {tens1} - {tens2} = {}. Ones: {ones1} - {ones2} = {}. Combine: {answer}",
                tens1 - tens2,
                ones1 - ones2
            ),
        );
    }

    if b <= 20 {
        return Hint::new(
            HintStrategy::CountingUp,
            format!("Count up from {b} to {a}. How many jumps? That's your answer: {answer}!"),
        );
    }

    Hint::new(
        HintStrategy::CountingBack,
        format!("Start at {a} and count back {b}. Try counting back by 10s first, then the rest."),
    )
}

fn multiplication_hint(a: i64, b: i64, answer: &str) -> Hint {
    let larger = a.max(b);
    let smaller = a.min(b);

    if smaller == 2 {
        return Hint::new(
            HintStrategy::Doubling,
            format!("×2 means double! Double {larger} = {answer}"),
        );
    }

    if (5..=9).contains(&smaller) {
        let known_multiplier = smaller - 1;
        let known_product = larger * known_multiplier;
        return Hint::new(
            HintStrategy::KnownFacts,
            format!(
                "Use a fact you know! {larger} × {known_multiplier} = {known_product}. Now add one more {larger}: {known_product} + {larger} = {answer}"
            ),
        );
    }

    if smaller <= 5 {
        return Hint::new(
            HintStrategy::SkipCounting,
            format!(
                "Count by {larger}s, {smaller} times: {}",
                join((1..=smaller).map(|step| larger * step))
            ),
        );
    }

    Hint::new(
        HintStrategy::RepeatedAddition,
        format!("{a} × {b} means adding {a} a total of {b} times. Try adding in groups!"),
    )
}

fn division_hint(a: i64, b: i64, answer: &str) -> Hint {
    if a <= 50 && b <= 10 {
        return Hint::new(
            HintStrategy::FairSharing,
            format!(
                "Imagine sharing {a} cookies among {b} friends equally. Each friend gets {answer} cookies!"
            ),
        );
    }

    if b <= 12 {
        return Hint::new(
            HintStrategy::InverseMultiplication,
            format!(
                "Think backwards! What times {b} equals {a}? __ × {b} = {a}. The answer is {answer}!"
            ),
        );
    }

    if b <= 20 {
        return Hint::new(
            HintStrategy::Grouping,
            format!(
                "How many groups of {b} can you make from {a}? Count by {b}s until you reach {a}."
            ),
        );
    }

    Hint::new(
        HintStrategy::RepeatedSubtraction,
        format!(
            "How many times can you subtract {b} from {a}? Keep subtracting until you can't anymore!"
        ),
    )
}
