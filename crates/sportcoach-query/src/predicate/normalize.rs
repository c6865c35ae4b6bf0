use crate::predicate::Predicate;

///
/// Normalize a predicate into a canonical form.
///
/// Normalization guarantees:
/// - Evaluation is preserved for every row
/// - Nested AND / OR nodes are flattened
/// - Neutral nodes are removed (an all-neutral tree stays `Neutral`)
/// - Boolean identities are removed and absorbing constants short-circuit
/// - Double negation is eliminated
///
/// Child order is kept, so rendered SQL stays in the order the caller built it.
///
#[must_use]
pub fn normalize(predicate: &Predicate) -> Predicate {
    match predicate {
        Predicate::And(children) => normalize_and(children),
        Predicate::Or(children) => normalize_or(children),
        Predicate::Not(inner) => normalize_not(inner),
        other => other.clone(),
    }
}

///
/// Normalize an AND expression.
///
/// Rules:
/// - AND(Neutral, x)    → x
/// - AND(True, x)       → x
/// - AND(False, x)      → False
/// - AND(AND(a, b), c)  → AND(a, b, c)
/// - AND()              → True
///
fn normalize_and(children: &[Predicate]) -> Predicate {
    if children.is_empty() {
        return Predicate::True;
    }

    let mut out = Vec::new();
    let mut saw_operand = false;

    for child in children {
        match normalize(child) {
            Predicate::Neutral => {}
            Predicate::True => saw_operand = true,
            Predicate::False => return Predicate::False,
            Predicate::And(grandchildren) => {
                saw_operand = true;
                out.extend(grandchildren);
            }
            other => {
                saw_operand = true;
                out.push(other);
            }
        }
    }

    collapse(out, saw_operand, Predicate::True, Predicate::And)
}

///
/// Normalize an OR expression.
///
/// Rules:
/// - OR(Neutral, x)     → x
/// - OR(False, x)       → x
/// - OR(True, x)        → True
/// - OR(OR(a, b), c)    → OR(a, b, c)
/// - OR()               → False
///
fn normalize_or(children: &[Predicate]) -> Predicate {
    if children.is_empty() {
        return Predicate::False;
    }

    let mut out = Vec::new();
    let mut saw_operand = false;

    for child in children {
        match normalize(child) {
            Predicate::Neutral => {}
            Predicate::False => saw_operand = true,
            Predicate::True => return Predicate::True,
            Predicate::Or(grandchildren) => {
                saw_operand = true;
                out.extend(grandchildren);
            }
            other => {
                saw_operand = true;
                out.push(other);
            }
        }
    }

    collapse(out, saw_operand, Predicate::False, Predicate::Or)
}

// Only identity constants were dropped when `out` is empty but operands were seen.
fn collapse(
    mut out: Vec<Predicate>,
    saw_operand: bool,
    identity: Predicate,
    wrap: fn(Vec<Predicate>) -> Predicate,
) -> Predicate {
    match out.len() {
        0 if saw_operand => identity,
        0 => Predicate::Neutral,
        1 => out.pop().unwrap_or(identity),
        _ => wrap(out),
    }
}

fn normalize_not(inner: &Predicate) -> Predicate {
    match normalize(inner) {
        Predicate::Neutral => Predicate::Neutral,
        Predicate::True => Predicate::False,
        Predicate::False => Predicate::True,
        Predicate::Not(double) => *double,
        other => Predicate::Not(Box::new(other)),
    }
}
