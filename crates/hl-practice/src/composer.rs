//! Question composition.
//!
//! One base scenario can yield several kinds of question. The composer picks a
//! kind by weight, applies at most one change to a copy of the layout, and
//! computes the expected answer from unrounded hydraulics.

use crate::adjust::choose_adjustment;
use crate::answer::{Expected, Unit};
use crate::bank::Bank;
use crate::bank_eval::BankEvaluator;
use crate::config::PracticeConfig;
use crate::error::{PracticeError, PracticeResult};
use crate::question::{QKind, Question, QuestionKind, ReverseTarget};
use hl_core::{RandomSource, Weighted, fmt_value, pick_uniform, weighted_pick};
use hl_hydraulics::{Calculator, Scenario};

pub const QUESTION_WEIGHTS: [Weighted<QKind>; 4] = [
    Weighted::new(QKind::Pp, 35.0),
    Weighted::new(QKind::Adjust, 25.0),
    Weighted::new(QKind::Reverse, 20.0),
    Weighted::new(QKind::Check, 20.0),
];

pub struct QuestionComposer<'a> {
    calc: Calculator<'a>,
    config: &'a PracticeConfig,
}

impl<'a> QuestionComposer<'a> {
    pub fn new(calc: Calculator<'a>, config: &'a PracticeConfig) -> Self {
        Self { calc, config }
    }

    /// Pick one of the four scenario kinds and compose it.
    pub fn compose(&self, scenario: Scenario, rng: &mut dyn RandomSource) -> PracticeResult<Question> {
        let kind = *weighted_pick(rng, &QUESTION_WEIGHTS)?;
        tracing::debug!(q_kind = kind.label(), "picked question kind");
        self.compose_kind(kind, scenario, rng)
    }

    /// Like `compose`, but hands off to the bank with probability `multi_share`.
    /// A bank with nothing usable for this topology falls back to `compose`.
    pub fn compose_any(
        &self,
        scenario: Scenario,
        bank: &Bank,
        rng: &mut dyn RandomSource,
    ) -> PracticeResult<Question> {
        if rng.next_unit() < self.config.multi_share {
            match self.evaluator(bank).compose(scenario.clone(), rng) {
                Err(PracticeError::NoApplicableTemplate { kind }) => {
                    tracing::debug!(kind, "no bank template for layout; composing directly");
                }
                other => return other,
            }
        }
        self.compose(scenario, rng)
    }

    fn evaluator<'b>(&self, bank: &'b Bank) -> BankEvaluator<'b>
    where
        'a: 'b,
    {
        BankEvaluator::new(self.calc, bank).with_tolerance(self.config.tolerance_psi)
    }

    /// Compose a specific kind. `Multi` uses the built-in bank.
    pub fn compose_kind(
        &self,
        kind: QKind,
        scenario: Scenario,
        rng: &mut dyn RandomSource,
    ) -> PracticeResult<Question> {
        let tol = self.config.tolerance_psi;
        match kind {
            QKind::Pp => {
                let expected = Expected::number(self.calc.pdp(&scenario), Unit::Psi, tol);
                let prompt = format!("{scenario} What pump discharge pressure is required?");
                Ok(Question {
                    scenario,
                    prompt,
                    kind: QuestionKind::Pp { expected },
                })
            }
            QKind::Adjust => {
                let adjustment = choose_adjustment(&scenario, self.calc.catalog(), rng)?;
                let adjusted = adjustment.apply(&scenario);
                let expected = Expected::number(self.calc.pdp(&adjusted), Unit::Psi, tol);
                let prompt = format!(
                    "{scenario} {}. What is the new pump discharge pressure?",
                    adjustment.describe(&scenario)
                );
                Ok(Question {
                    scenario,
                    prompt,
                    kind: QuestionKind::Adjust {
                        adjustment,
                        adjusted,
                        expected,
                    },
                })
            }
            QKind::Reverse => {
                let target = *pick_uniform(rng, ReverseTarget::candidates(scenario.kind()))?;
                let derived = self.calc.derive(&scenario);
                let expected = Expected::number(target.value(&derived), target.unit(), tol);
                let prompt = format!("{scenario} {}", target.ask());
                Ok(Question {
                    scenario,
                    prompt,
                    kind: QuestionKind::Reverse { target, expected },
                })
            }
            QKind::Check => {
                let limit_psi = self.config.check_limit_psi;
                let pdp = self.calc.derive(&scenario).pdp_rounded();
                let prompt = format!(
                    "{scenario} Your pump is limited to {} psi on this line. Can you supply it? (Y/N)",
                    fmt_value(limit_psi)
                );
                Ok(Question {
                    scenario,
                    prompt,
                    kind: QuestionKind::Check {
                        limit_psi,
                        expected: Expected::yes_no(pdp <= limit_psi),
                    },
                })
            }
            QKind::Multi => {
                let bank = Bank::builtin();
                self.evaluator(&bank).compose(scenario, rng)
            }
        }
    }
}
