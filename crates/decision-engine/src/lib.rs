//! # Decision Engine
//!
//! An "Infinite Axis Utility System": a utility-based behavior engine that,
//! on each decision tick, selects a single best action for an autonomous
//! agent from a dynamically managed set of candidate behaviors.
//!
//! Every candidate ([`Decision`]) scores itself on the current world state
//! by combining several normalized `[0,1]` sub-scores ([`Consideration`]s);
//! the decision with the highest composite score wins. Considerations shape
//! raw sensor readings into `[0,1]` through response-curve primitives
//! ([`Transform`], [`Spline`]). A [`DecisionEngine`] gates which decisions
//! are candidates via host-raised events, and lazily selects the best one,
//! pruning by each candidate's tier upper bound.
//!
//! ## Example
//!
//! ```rust
//! use decision_engine::{Consideration, Decision, DecisionEngine, Tier, Transform};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
//! enum Event {
//!     EnemyVisible,
//! }
//!
//! let mut engine: DecisionEngine<Event> = DecisionEngine::new();
//!
//! let health = 0.3_f64;
//! let attack = Decision::builder("attack", Tier::Useful)
//!     .consideration(Consideration::new(
//!         "enough health",
//!         0.0,
//!         1.0,
//!         Transform::Identity,
//!         move || health,
//!     ))
//!     .action(|d| println!("executing {}", d.name()))
//!     .unwrap();
//!
//! engine.add(attack, [Event::EnemyVisible]).unwrap();
//! engine.raise(Event::EnemyVisible);
//!
//! match engine.best_decision() {
//!     Ok(decision) => println!("best: {}", decision.name()),
//!     Err(err) => println!("no action selected: {err}"),
//! }
//! ```
//!
//! ## Scope
//!
//! This crate is the decision engine itself: the scoring algebra,
//! event-gated activation, selection algorithm, and curve-shaping
//! primitives. It does not parse rule-definition files and does not provide
//! a graphical curve editor — those are external collaborators that consume
//! this crate's API. It does not plan over future states, learn, or
//! coordinate multiple agents, and it keeps no state across ticks beyond
//! each decision's last-executed timestamp.

pub mod consideration;
pub mod decision;
pub mod engine;
pub mod error;
pub mod spline;
pub mod transform;

pub use consideration::{Consideration, Curve};
pub use decision::{Decision, DecisionBuilder, Tier};
pub use engine::{ActivationRecord, ActivationSink, ActiveRule, DecisionEngine, EventKey, NoopSink};
pub use error::EngineError;
pub use spline::{ControlPoint, MonotoneCubic, Spline};
pub use transform::Transform;
