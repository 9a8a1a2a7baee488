use crate::model::{Agent, Opinion};

/// Compute the opinions of a pair after they interact.
///
/// Zealots keep their opinion. If exactly one agent is a zealot the other
/// adopts its opinion; if neither is, `agt_b` adopts the opinion of `agt_a`.
pub fn apply_interaction(agt_a: &Agent, agt_b: &Agent) -> (Opinion, Opinion) {
    let (opinion_a, opinion_b) = (agt_a.opinion(), agt_b.opinion());
    match (agt_a.is_zealot(), agt_b.is_zealot()) {
        (true, true) => (opinion_a, opinion_b),
        (false, true) => (opinion_b, opinion_b),
        (true, false) | (false, false) => (opinion_a, opinion_a),
    }
}
