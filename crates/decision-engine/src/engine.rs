//! Registry, event-gated activation, and lazy best-decision selection.

use std::collections::{BTreeMap, BTreeSet};

use crate::decision::Decision;
use crate::error::EngineError;

/// Bound required of a host's event symbol. A blanket impl covers any type
/// that is cheap to clone and totally ordered (used for stable, deterministic
/// sorting of rule buckets) — the event type is a generic parameter rather
/// than a fixed enum so the engine is reusable across host domains.
pub trait EventKey: Clone + Eq + Ord + std::fmt::Debug {}
impl<T: Clone + Eq + Ord + std::fmt::Debug> EventKey for T {}

/// One entry in the tier-sorted candidate window: which event admitted this
/// decision, and its id in the engine's decision arena.
#[derive(Debug, Clone)]
pub struct ActiveRule<E: EventKey> {
    pub event: E,
    decision_id: usize,
}

/// A snapshot row written during selection: the candidate's name and its
/// composite score this tick, or `-1.0` if pruning skipped it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationRecord {
    pub name: String,
    pub score: f64,
}

const NOT_EVALUATED: f64 = -1.0;

/// A pluggable sink the host may implement to observe the activation graph
/// after each tick (for a visual debug view, a log exporter, and so on).
/// The engine writes through it and stays oblivious to what the host does
/// with the data.
pub trait ActivationSink {
    fn record(&mut self, graph: &[ActivationRecord]);
}

/// The default sink: discards everything. Used when a host has no need to
/// observe the activation graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ActivationSink for NoopSink {
    fn record(&mut self, _graph: &[ActivationRecord]) {}
}

/// The utility-based behavior engine: owns a registry of [`Decision`]s bound
/// to events, tracks which events are currently raised, and selects the
/// best-scoring active decision on demand.
///
/// Decisions live in an internal arena; `rules` and `active_rules` reference
/// them by index rather than by value or pointer, so one decision can be
/// bound under multiple events without being cloned, and `clear`/`clear_active`
/// can never leave a dangling reference (the active set is always drained
/// before the arena is touched).
pub struct DecisionEngine<'a, E: EventKey, S: ActivationSink = NoopSink> {
    arena: Vec<Decision<'a>>,
    rules: BTreeMap<E, Vec<usize>>,
    active_events: BTreeSet<E>,
    active_rules: Vec<ActiveRule<E>>,
    updated_events: BTreeSet<E>,
    activation_graph: Vec<ActivationRecord>,
    sink: S,
}

impl<'a, E: EventKey> DecisionEngine<'a, E, NoopSink> {
    /// Creates an engine with no rules and no active candidates (the `Empty`
    /// state).
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(NoopSink)
    }
}

impl<'a, E: EventKey> Default for DecisionEngine<'a, E, NoopSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E: EventKey, S: ActivationSink> DecisionEngine<'a, E, S> {
    /// Creates an engine that writes its activation graph through `sink`
    /// after every `best_decision` call.
    pub fn with_sink(sink: S) -> Self {
        Self {
            arena: Vec::new(),
            rules: BTreeMap::new(),
            active_events: BTreeSet::new(),
            active_rules: Vec::new(),
            updated_events: BTreeSet::new(),
            activation_graph: Vec::new(),
            sink,
        }
    }

    /// Registers `decision` under each of `events`, marking those events as
    /// needing a re-sort. Does not touch `active_rules` — a currently-raised
    /// event only picks up the new decision the next time a query flushes
    /// pending sorts (see module docs on the pending-sort protocol).
    ///
    /// Either both the arena insertion and the event marks happen, or
    /// neither does: validation runs before any mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRegistration`] if `decision` has no
    /// considerations.
    pub fn add(
        &mut self,
        decision: Decision<'a>,
        events: impl IntoIterator<Item = E>,
    ) -> Result<(), EngineError> {
        if decision.considerations().is_empty() {
            return Err(EngineError::InvalidRegistration {
                name: decision.name().to_string(),
            });
        }
        let events: Vec<E> = events.into_iter().collect();
        log::debug!("registering decision {:?} under {} event(s)", decision.name(), events.len());
        let id = self.arena.len();
        self.arena.push(decision);
        for event in events {
            self.rules.entry(event.clone()).or_default().push(id);
            self.updated_events.insert(event);
        }
        Ok(())
    }

    /// Flushes any pending sorts: for every event marked dirty since the
    /// last flush, stably sorts its `rules` bucket by tier descending, and
    /// if that event is currently active, marks `active_rules` for a
    /// re-sort too. Run automatically before `raise` and `best_decision`.
    fn flush_pending_sorts(&mut self) {
        if self.updated_events.is_empty() {
            return;
        }
        let dirty: Vec<E> = self.updated_events.iter().cloned().collect();
        self.updated_events.clear();

        let arena = &self.arena;
        let mut touches_active = false;
        for event in &dirty {
            if let Some(bucket) = self.rules.get_mut(event) {
                bucket.sort_by(|&a, &b| arena[b].tier().cmp(&arena[a].tier()));
            }
            if self.active_events.contains(event) {
                touches_active = true;
            }
        }
        if touches_active {
            self.resort_active_rules();
        }
    }

    fn resort_active_rules(&mut self) {
        let arena = &self.arena;
        self.active_rules
            .sort_by(|a, b| arena[b.decision_id].tier().cmp(&arena[a.decision_id].tier()));
        self.sync_activation_graph();
    }

    fn sync_activation_graph(&mut self) {
        self.activation_graph = self
            .active_rules
            .iter()
            .map(|rule| ActivationRecord {
                name: self.arena[rule.decision_id].name().to_string(),
                score: NOT_EVALUATED,
            })
            .collect();
    }

    /// Flushes pending sorts, then if `event` is not already active, appends
    /// every decision bound to it into `active_rules` and re-sorts by tier
    /// descending. Raising an event with no registered decisions (or an
    /// event the engine has never seen) still marks it active; it simply
    /// contributes no candidates.
    pub fn raise(&mut self, event: E) {
        self.flush_pending_sorts();
        if self.active_events.insert(event.clone()) {
            if let Some(bucket) = self.rules.get(&event) {
                for &decision_id in bucket {
                    self.active_rules.push(ActiveRule {
                        event: event.clone(),
                        decision_id,
                    });
                }
            }
            log::debug!("raised {event:?}, active_rules now has {} candidate(s)", self.active_rules.len());
            self.resort_active_rules();
        }
    }

    /// Removes every active-rule entry bound to `event` and removes it from
    /// `active_events`. The `rules` bucket is untouched, so the event can be
    /// raised again later. Idempotent: clearing an already-cleared event is
    /// a no-op.
    pub fn clear_event(&mut self, event: &E) {
        self.active_rules.retain(|rule| &rule.event != event);
        self.active_events.remove(event);
        self.sync_activation_graph();
    }

    /// Empties `active_rules` and `active_events`; `rules` is untouched.
    pub fn clear_active(&mut self) {
        self.active_rules.clear();
        self.active_events.clear();
        self.activation_graph.clear();
    }

    /// `clear_active`, then empties the rule registry and decision arena.
    pub fn clear(&mut self) {
        self.clear_active();
        self.rules.clear();
        self.updated_events.clear();
        self.arena.clear();
    }

    /// Runs the lazy best-decision selection algorithm and returns the
    /// winning decision's arena id.
    ///
    /// Precondition: `active_rules` is sorted by tier descending (guaranteed
    /// by `flush_pending_sorts` at the top of this call). The algorithm
    /// exploits the fact that `tier` is a compile-time-known upper bound on
    /// a decision's composite score:
    ///
    /// - A candidate at `Ignore` tier (upper bound `0`) can never win, and
    ///   neither can anything sorted after it — stop.
    /// - Once a later candidate's upper bound falls below the current best
    ///   score, no candidate from here on can beat it — stop.
    /// - A candidate whose actual score hits its own upper bound is
    ///   saturated; nothing later (tier `<=` this one) can beat it — stop.
    fn select_best_id(&mut self) -> Result<usize, EngineError> {
        self.flush_pending_sorts();
        if self.active_rules.is_empty() {
            return Err(EngineError::EmptyActiveSet);
        }

        for record in &mut self.activation_graph {
            record.score = NOT_EVALUATED;
        }

        let mut best_score = 0.0_f64;
        let mut best_id: Option<usize> = None;

        for (i, rule) in self.active_rules.iter().enumerate() {
            let decision = &self.arena[rule.decision_id];
            let upper_bound = decision.tier().value();

            if upper_bound == 0.0 {
                log::trace!("pruning from {:?}: Ignore tier", decision.name());
                break;
            }
            if upper_bound < best_score {
                log::trace!(
                    "pruning from {:?}: upper bound {upper_bound} below best {best_score}",
                    decision.name()
                );
                break;
            }

            let score = decision.compute_score();
            if let Some(record) = self.activation_graph.get_mut(i) {
                record.score = score;
            }

            if score > best_score {
                best_score = score;
                best_id = Some(rule.decision_id);
            }

            if (score - upper_bound).abs() < 1e-9 && score > 0.0 {
                log::trace!("{:?} saturated at upper bound {upper_bound}", decision.name());
                break;
            }
        }

        self.sink.record(&self.activation_graph);

        match best_id {
            Some(id) if best_score > 0.0 => {
                log::debug!("selected {:?} with score {best_score}", self.arena[id].name());
                Ok(id)
            }
            _ => {
                log::debug!("no rule was activated this tick");
                Err(EngineError::NoDecisionActivated)
            }
        }
    }

    /// Returns the best-scoring active decision, or an error if there are
    /// no candidates ([`EngineError::EmptyActiveSet`]) or every candidate
    /// scored zero ([`EngineError::NoDecisionActivated`]).
    pub fn best_decision(&mut self) -> Result<&Decision<'a>, EngineError> {
        let id = self.select_best_id()?;
        Ok(&self.arena[id])
    }

    /// Selects the best-scoring active decision and executes it.
    pub fn execute_best_decision(&mut self) -> Result<(), EngineError> {
        let id = self.select_best_id()?;
        self.arena[id].execute();
        Ok(())
    }

    /// An immutable snapshot of the current candidate window, sorted by
    /// tier descending.
    #[must_use]
    pub fn active_decisions(&self) -> &[ActiveRule<E>] {
        &self.active_rules
    }

    /// The set of currently-raised events.
    #[must_use]
    pub fn active_events(&self) -> &BTreeSet<E> {
        &self.active_events
    }

    /// The activation graph as of the last `best_decision`/`execute_best_decision`
    /// call: one row per active candidate, in priority order, with
    /// unevaluated (pruned) candidates showing a score of `-1.0`.
    #[must_use]
    pub fn activation_graph(&self) -> &[ActivationRecord] {
        &self.activation_graph
    }

    /// Looks up a decision by its arena id, as found in an [`ActiveRule`].
    #[must_use]
    pub fn decision(&self, rule: &ActiveRule<E>) -> &Decision<'a> {
        &self.arena[rule.decision_id]
    }
}
