//! A named candidate behavior: tier, considerations, and the action it runs.

use std::time::Instant;

use crate::consideration::Consideration;
use crate::error::EngineError;

/// Coarse discrete priority, serving as a hard upper bound on a
/// [`Decision`]'s composite score (since `adjusted(c) <= 1` for every
/// consideration, the product of adjusted scores never exceeds `1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Tier {
    Ignore = 0,
    SlightlyUseful = 1,
    Useful = 2,
    VeryUseful = 3,
    MostUseful = 4,
}

impl Tier {
    /// The tier's numeric value, used both as the scoring multiplier and as
    /// the upper bound the selection algorithm prunes against.
    #[must_use]
    pub fn value(self) -> f64 {
        self as u8 as f64
    }
}

type Action<'a> = Box<dyn FnMut(&Decision<'a>) + 'a>;

/// A candidate behavior: a base tier, an ordered list of considerations, and
/// the action to run if selected.
///
/// Mutable in exactly one field after construction: `last_executed_at`. The
/// name, tier, and consideration list are fixed once built.
pub struct Decision<'a> {
    name: String,
    description: String,
    tier: Tier,
    considerations: Vec<Consideration<'a>>,
    action: Action<'a>,
    last_executed_at: Option<Instant>,
}

impl<'a> Decision<'a> {
    /// Starts building a decision with the given name and base tier.
    #[must_use]
    pub fn builder(name: impl Into<String>, tier: Tier) -> DecisionBuilder<'a> {
        DecisionBuilder::new(name, tier)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn considerations(&self) -> &[Consideration<'a>] {
        &self.considerations
    }

    #[must_use]
    pub fn last_executed_at(&self) -> Option<Instant> {
        self.last_executed_at
    }

    /// The decision's composite score this tick:
    /// `tier * product(adjusted(consideration_score))`, using the
    /// modification-factor compensation (`adjusted(c) = c + (1-c)*f*c`,
    /// `f = 1 - 1/k`) so that a single weak consideration doesn't drag the
    /// product to near-zero when many others are strong.
    ///
    /// Short-circuits (returning `0.0` without evaluating the remaining
    /// considerations) as soon as the running product drops below `1e-6`.
    #[must_use]
    pub fn compute_score(&self) -> f64 {
        let k = self.considerations.len();
        if k == 0 {
            return 0.0;
        }
        let compensation = 1.0 - 1.0 / (k as f64);
        let mut product = 1.0;
        for consideration in &self.considerations {
            let score = consideration.compute_score();
            let adjusted = (score + (1.0 - score) * compensation * score).clamp(0.0, 1.0);
            product *= adjusted;
            if product < 1e-6 {
                return 0.0;
            }
        }
        self.tier.value() * product
    }

    /// Records the current time as `last_executed_at`, then runs the
    /// action with a reference to this decision (so the action can
    /// introspect its own name/tier for logging).
    pub fn execute(&mut self) {
        self.last_executed_at = Some(Instant::now());
        log::debug!("executing decision {:?}", self.name);
        // The action lives in `self.action` but must be called with `&self`;
        // temporarily swap it out so the call below doesn't need to borrow
        // `self` both mutably (to hold `action`) and immutably (as its
        // argument) at once.
        let mut action = std::mem::replace(&mut self.action, Box::new(|_| {}));
        action(self);
        self.action = action;
    }
}

impl std::fmt::Debug for Decision<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decision")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .field("considerations", &self.considerations.len())
            .field("last_executed_at", &self.last_executed_at)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Decision`] field by field, replacing the rule-definition
/// macros (`addDecision(...)`) of the system this engine's host exposes
/// upstream with plain method chaining.
pub struct DecisionBuilder<'a> {
    name: String,
    description: String,
    tier: Tier,
    considerations: Vec<Consideration<'a>>,
}

impl<'a> DecisionBuilder<'a> {
    fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tier,
            considerations: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn consideration(mut self, consideration: Consideration<'a>) -> Self {
        self.considerations.push(consideration);
        self
    }

    /// Finishes the decision with its action, validating that at least one
    /// consideration was added (the modification-factor formula divides by
    /// the consideration count and has no sound `k = 0` case).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRegistration`] if no considerations
    /// were added.
    pub fn action(
        self,
        action: impl FnMut(&Decision<'a>) + 'a,
    ) -> Result<Decision<'a>, EngineError> {
        if self.considerations.is_empty() {
            return Err(EngineError::InvalidRegistration { name: self.name });
        }
        Ok(Decision {
            name: self.name,
            description: self.description,
            tier: self.tier,
            considerations: self.considerations,
            action: Box::new(action),
            last_executed_at: None,
        })
    }
}
