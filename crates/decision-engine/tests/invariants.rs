//! Randomized invariant checks for the registry and selection algorithm.
//!
//! Matches the fuzz-loop style used elsewhere in this workspace for
//! property-style tests: a seeded linear congruential generator driving many
//! trials, rather than an external property-testing crate.

use decision_engine::{Consideration, Decision, DecisionEngine, Tier, Transform};

fn lcg_next(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *state
}

fn random_unit(state: &mut u64) -> f64 {
    ((lcg_next(state) >> 11) as f64) / ((1u64 << 53) as f64)
}

const TIERS: [Tier; 5] = [
    Tier::Ignore,
    Tier::SlightlyUseful,
    Tier::Useful,
    Tier::VeryUseful,
    Tier::MostUseful,
];

fn random_tier(state: &mut u64) -> Tier {
    TIERS[(lcg_next(state) % TIERS.len() as u64) as usize]
}

fn build_random_engine(state: &mut u64, count: usize) -> (DecisionEngine<'static, usize>, Vec<(Tier, f64)>) {
    let mut engine = DecisionEngine::new();
    let mut fixtures = Vec::with_capacity(count);
    for i in 0..count {
        let tier = random_tier(state);
        let score = random_unit(state);
        fixtures.push((tier, score));
        let decision = Decision::builder(i.to_string(), tier)
            .consideration(Consideration::new("fixed", 0.0, 1.0, Transform::Identity, move || score))
            .action(|_| {})
            .unwrap();
        engine.add(decision, [0usize]).unwrap();
    }
    engine.raise(0);
    (engine, fixtures)
}

/// The naive O(n) scan the selection algorithm's pruning must stay
/// equivalent to: score every candidate, no shortcuts.
fn naive_best(fixtures: &[(Tier, f64)]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (tier, score)) in fixtures.iter().enumerate() {
        let composite = tier.value() * score;
        if composite > 0.0 {
            if let Some((_, best_score)) = best {
                if composite > best_score {
                    best = Some((i, composite));
                }
            } else {
                best = Some((i, composite));
            }
        }
    }
    best
}

#[test]
fn active_rules_always_sorted_by_tier_descending() {
    let mut state = 0xABCD_1234_u64;
    for trial in 0..256 {
        let count = (lcg_next(&mut state) % 20 + 1) as usize;
        let (engine, _) = build_random_engine(&mut state, count);
        let tiers: Vec<Tier> = engine
            .active_decisions()
            .iter()
            .map(|rule| engine.decision(rule).tier())
            .collect();
        for pair in tiers.windows(2) {
            assert!(pair[0] >= pair[1], "trial {trial}: not sorted descending: {tiers:?}");
        }
    }
}

#[test]
fn pruned_selection_matches_naive_scan() {
    let mut state = 0x5EED_u64;
    for trial in 0..512 {
        let count = (lcg_next(&mut state) % 15 + 1) as usize;
        let (mut engine, fixtures) = build_random_engine(&mut state, count);

        let pruned = engine.best_decision().ok().map(|d| d.name().parse::<usize>().unwrap());
        let naive = naive_best(&fixtures).map(|(i, _)| i);

        assert_eq!(pruned, naive, "trial {trial}: pruned selection diverged from naive scan, fixtures={fixtures:?}");
    }
}

#[test]
fn raise_never_duplicates_active_entries() {
    let mut state = 0x1111_u64;
    for _ in 0..100 {
        let count = (lcg_next(&mut state) % 10 + 1) as usize;
        let (mut engine, _) = build_random_engine(&mut state, count);
        let before = engine.active_decisions().len();
        engine.raise(0);
        engine.raise(0);
        engine.raise(0);
        assert_eq!(engine.active_decisions().len(), before);
    }
}

#[test]
fn clear_event_repeated_is_idempotent() {
    let mut state = 0x2222_u64;
    for _ in 0..100 {
        let count = (lcg_next(&mut state) % 10 + 1) as usize;
        let (mut engine, _) = build_random_engine(&mut state, count);
        engine.clear_event(&0);
        let after_first = engine.active_decisions().len();
        engine.clear_event(&0);
        engine.clear_event(&0);
        assert_eq!(engine.active_decisions().len(), after_first);
        assert_eq!(after_first, 0);
    }
}

#[test]
fn clear_then_rebuild_identical_fixtures_reproduces_the_winner() {
    let mut state = 0x3333_u64;
    for _ in 0..100 {
        let seed_snapshot = state;
        let count = (lcg_next(&mut state) % 10 + 1) as usize;

        let mut state_a = seed_snapshot;
        let (mut engine_a, _) = build_random_engine(&mut state_a, count);
        let first = engine_a.best_decision().ok().map(|d| d.name().to_string());

        engine_a.clear();
        let mut state_b = seed_snapshot;
        let (mut engine_b, _) = build_random_engine(&mut state_b, count);
        let second = engine_b.best_decision().ok().map(|d| d.name().to_string());

        assert_eq!(first, second);
        state = state_a.max(state_b);
    }
}
