//! Shared signal scoring framework
//!
//! A classifier is a rule table plus an unknown threshold. Each rule awards
//! fixed points to one category when its signal fires; the highest-scoring
//! category wins and ties go to the category declared first.

use pagesense_signals::SignalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

/// Points that map to full confidence.
///
/// Calibration constant shared by every classifier. Changing it shifts every
/// downstream confidence and verdict.
pub const CONFIDENCE_DENOMINATOR: f64 = 100.0;

/// Maximum number of reasons kept on a result
pub const MAX_REASONS: usize = 5;

/// A runner-up needs strictly more than this many points
pub const SECONDARY_MIN_SCORE: u32 = 30;

/// A runner-up needs strictly more than this share of the winner's points
pub const SECONDARY_MIN_RATIO: f64 = 0.5;

/// A label a classifier can produce
pub trait Category: Copy + Eq + Ord + Debug + 'static {
    /// Every category in declaration order. Earlier entries win ties.
    const ALL: &'static [Self];

    /// Reported when no category clears the unknown threshold
    const FALLBACK: Self;

    fn as_str(&self) -> &'static str;
}

/// One row of a scoring table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringRule<C> {
    pub signal: &'static str,
    pub category: C,
    pub points: u32,
    pub reason: &'static str,
    /// Minimum signal magnitude for the rule to fire
    pub min: u64,
}

impl<C> ScoringRule<C> {
    /// Rule that fires whenever the signal is truthy
    pub fn new(signal: &'static str, category: C, points: u32, reason: &'static str) -> Self {
        Self {
            signal,
            category,
            points,
            reason,
            min: 1,
        }
    }

    /// Require the signal's count to reach `min`
    pub fn at_least(mut self, min: u64) -> Self {
        self.min = min.max(1);
        self
    }

    pub fn fires(&self, signals: &SignalRecord) -> bool {
        signals.meets(self.signal, self.min)
    }
}

/// Outcome of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult<C: Ord> {
    pub category: C,
    /// `min(top score / 100, 1)`
    pub confidence: f64,
    /// Reasons of fired rules in table order, at most [`MAX_REASONS`]
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<C>,
    /// Points per category that scored at all
    pub scores: BTreeMap<C, u32>,
}

impl<C: Category> ClassificationResult<C> {
    pub fn score_of(&self, category: C) -> u32 {
        self.scores.get(&category).copied().unwrap_or(0)
    }

    pub fn is_fallback(&self) -> bool {
        self.category == C::FALLBACK
    }
}

/// Classifier built from an explicit rule table
#[derive(Debug, Clone)]
pub struct Scorer<C> {
    rules: Vec<ScoringRule<C>>,
    unknown_threshold: u32,
}

impl<C: Category> Scorer<C> {
    /// A top score at or below `unknown_threshold` yields [`Category::FALLBACK`]
    pub fn new(rules: Vec<ScoringRule<C>>, unknown_threshold: u32) -> Self {
        Self {
            rules,
            unknown_threshold,
        }
    }

    pub fn rules(&self) -> &[ScoringRule<C>] {
        &self.rules
    }

    pub fn unknown_threshold(&self) -> u32 {
        self.unknown_threshold
    }

    pub fn score(&self, signals: &SignalRecord) -> ClassificationResult<C> {
        score(signals, &self.rules, self.unknown_threshold)
    }
}

/// Score a signal record against a rule table
pub fn score<C: Category>(
    signals: &SignalRecord,
    rules: &[ScoringRule<C>],
    unknown_threshold: u32,
) -> ClassificationResult<C> {
    let mut scores: BTreeMap<C, u32> = BTreeMap::new();
    let mut reasons = Vec::new();

    for rule in rules.iter().filter(|r| r.fires(signals)) {
        *scores.entry(rule.category).or_insert(0) += rule.points;
        if reasons.len() < MAX_REASONS {
            reasons.push(rule.reason.to_string());
        }
    }

    let (top, top_score) = ranked(&scores, None).unwrap_or((C::FALLBACK, 0));
    let confidence = (f64::from(top_score) / CONFIDENCE_DENOMINATOR).min(1.0);

    let category = if top_score <= unknown_threshold {
        C::FALLBACK
    } else {
        top
    };

    let secondary = if category == C::FALLBACK {
        None
    } else {
        ranked(&scores, Some(top))
            .filter(|(_, s)| {
                *s > SECONDARY_MIN_SCORE && f64::from(*s) > SECONDARY_MIN_RATIO * f64::from(top_score)
            })
            .map(|(c, _)| c)
    };

    debug!(
        "Scored {:?} at {} points (confidence {:.2}, secondary {:?})",
        category, top_score, confidence, secondary
    );

    ClassificationResult {
        category,
        confidence,
        reasons,
        secondary,
        scores,
    }
}

/// Highest-scoring category in declaration order, optionally skipping one
fn ranked<C: Category>(scores: &BTreeMap<C, u32>, skip: Option<C>) -> Option<(C, u32)> {
    let mut best: Option<(C, u32)> = None;
    for &category in C::ALL {
        if Some(category) == skip {
            continue;
        }
        let points = scores.get(&category).copied().unwrap_or(0);
        if points == 0 {
            continue;
        }
        match best {
            Some((_, best_points)) if points <= best_points => {}
            _ => best = Some((category, points)),
        }
    }
    best
}
