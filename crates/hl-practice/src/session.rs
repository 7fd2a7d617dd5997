//! A practice session: question flow, grading feedback and score.

use crate::bank::Bank;
use crate::composer::QuestionComposer;
use crate::config::PracticeConfig;
use crate::diagnostics::{Hint, diagnose};
use crate::error::{PracticeError, PracticeResult};
use crate::generator::ScenarioGenerator;
use crate::grading::{GradeReport, grade};
use crate::question::Question;
use crate::reveal::{Reveal, build_reveal};
use hl_core::SeededRng;
use hl_hydraulics::{Calculator, Catalog};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub attempted: u32,
    pub correct: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl Scoreboard {
    pub fn record(&mut self, correct: bool) {
        self.attempted += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
    }

    /// Share of attempts answered correctly, 0 before any attempt.
    pub fn accuracy(&self) -> f64 {
        hl_core::safe_div(self.correct as f64, self.attempted as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub report: GradeReport,
    /// Present only for a wrong single numeric answer that a known mistake explains.
    pub hint: Option<Hint>,
    /// Attached to wrong answers.
    pub reveal: Option<Reveal>,
}

pub struct PracticeSession {
    config: PracticeConfig,
    catalog: Catalog,
    bank: Bank,
    rng: SeededRng,
    current: Option<Question>,
    score: Scoreboard,
}

impl PracticeSession {
    /// Seeds from `config.seed` when set, otherwise from entropy. Pass
    /// `Bank::builtin()` (or `load_bank`, which falls back to it) when no pack
    /// is configured.
    pub fn new(config: PracticeConfig, catalog: Catalog, bank: Bank) -> PracticeResult<Self> {
        config.validate()?;
        catalog.validate()?;
        let rng = match config.seed {
            Some(seed) => SeededRng::from_seed_u64(seed),
            None => SeededRng::from_entropy(),
        };
        tracing::info!(
            seed = ?config.seed,
            bank = bank.pack_id.as_deref().unwrap_or("unnamed"),
            "practice session started"
        );
        Ok(Self {
            config,
            catalog,
            bank,
            rng,
            current: None,
            score: Scoreboard::default(),
        })
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn calculator(&self) -> Calculator<'_> {
        Calculator::new(&self.catalog, self.config.elevation)
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Generate a fresh layout and compose a question on it.
    pub fn next_question(&mut self) -> PracticeResult<&Question> {
        let calc = Calculator::new(&self.catalog, self.config.elevation);
        let scenario = ScenarioGenerator::new(calc, &self.config).generate(&mut self.rng)?;
        let question =
            QuestionComposer::new(calc, &self.config).compose_any(scenario, &self.bank, &mut self.rng)?;
        tracing::debug!(q_kind = question.q_kind().label(), "new question");
        let question: &Question = self.current.insert(question);
        Ok(question)
    }

    /// Grade the current question. Invalid input is reported but not scored,
    /// and the question stays open.
    pub fn submit<S: AsRef<str>>(&mut self, answers: &[S]) -> PracticeResult<Feedback> {
        let question = self.current.as_ref().ok_or(PracticeError::NoActiveQuestion)?;
        let calc = Calculator::new(&self.catalog, self.config.elevation);
        let report = grade(question, answers);
        if report.has_invalid() {
            return Ok(Feedback {
                report,
                hint: None,
                reveal: None,
            });
        }
        let correct = report.all_correct();
        self.score.record(correct);
        if correct {
            return Ok(Feedback {
                report,
                hint: None,
                reveal: None,
            });
        }
        let hint = match report.parts.as_slice() {
            [only] => only.given.and_then(|guess| diagnose(&calc, question, guess)),
            _ => None,
        };
        Ok(Feedback {
            report,
            hint,
            reveal: Some(build_reveal(&calc, question)),
        })
    }

    /// "Show the math" for the current question.
    pub fn reveal_current(&self) -> PracticeResult<Reveal> {
        let question = self.current.as_ref().ok_or(PracticeError::NoActiveQuestion)?;
        Ok(build_reveal(&self.calculator(), question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Expected;
    use crate::question::QKind;

    fn seeded(seed: u64) -> PracticeSession {
        let config = PracticeConfig {
            seed: Some(seed),
            ..PracticeConfig::default()
        };
        PracticeSession::new(config, Catalog::standard(), Bank::builtin()).unwrap()
    }

    fn right_answers(q: &Question) -> Vec<String> {
        q.expected_parts().iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn same_seed_same_questions() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..10 {
            assert_eq!(a.next_question().unwrap(), b.next_question().unwrap());
        }
    }

    #[test]
    fn submit_without_question_errors() {
        let mut s = seeded(1);
        assert!(matches!(s.submit(&["1"]), Err(PracticeError::NoActiveQuestion)));
        assert!(s.reveal_current().is_err());
    }

    #[test]
    fn correct_answers_build_streak() {
        let mut s = seeded(3);
        for _ in 0..5 {
            let answers = right_answers(s.next_question().unwrap());
            let feedback = s.submit(&answers).unwrap();
            assert!(feedback.report.all_correct(), "{:?}", feedback.report);
            assert!(feedback.reveal.is_none());
        }
        assert_eq!(
            *s.score(),
            Scoreboard {
                attempted: 5,
                correct: 5,
                streak: 5,
                best_streak: 5
            }
        );
        assert_eq!(s.score().accuracy(), 1.0);
    }

    #[test]
    fn invalid_input_is_not_scored() {
        let mut s = seeded(4);
        s.next_question().unwrap();
        let answers = vec!["???"; s.current().unwrap().part_count()];
        let feedback = s.submit(&answers).unwrap();
        assert!(feedback.report.has_invalid());
        assert_eq!(s.score().attempted, 0);
        assert!(s.current().is_some());
    }

    #[test]
    fn wrong_answer_gets_reveal_and_resets_streak() {
        let mut s = seeded(5);
        let answers = right_answers(s.next_question().unwrap());
        s.submit(&answers).unwrap();

        let q = s.next_question().unwrap().clone();
        let wrong: Vec<String> = q
            .expected_parts()
            .iter()
            .map(|e| match e {
                Expected::Number { value, .. } => (value + 1000.0).to_string(),
                Expected::YesNo { answer } => match answer.letter() {
                    'Y' => "N".to_string(),
                    _ => "Y".to_string(),
                },
            })
            .collect();
        let feedback = s.submit(&wrong).unwrap();
        assert!(!feedback.report.all_correct());
        assert!(feedback.reveal.is_some());
        assert_eq!(s.score().streak, 0);
        assert_eq!(s.score().best_streak, 1);
        assert_eq!(s.score().attempted, 2);
    }

    #[test]
    fn builtin_bank_serves_multi_at_its_share() {
        let mut s = seeded(2);
        let total = 500;
        let multi = (0..total)
            .filter(|_| s.next_question().unwrap().q_kind() == QKind::Multi)
            .count();
        // multi_share is 0.2 and the built-in tender pack fits every topology
        assert!((60..=140).contains(&multi), "multi {multi}/{total}");
    }

    #[test]
    fn department_catalog_without_master_streams_still_generates() {
        let catalog = Catalog::from_yaml_str(
            r#"
coefficients:
  "1.75": 15.5
  "2.5": 2.0
nozzles:
  - id: fog-175
    label: Fog 175 @ 100
    gpm: 175
    np_psi: 100
    mount:
      type: handline
      diameter: "1.75"
"#,
        )
        .unwrap();
        let config = PracticeConfig {
            seed: Some(11),
            ..PracticeConfig::default()
        };
        let mut s = PracticeSession::new(config, catalog, Bank::builtin()).unwrap();
        for _ in 0..50 {
            let q = s.next_question().unwrap();
            assert_ne!(q.scenario.kind(), hl_hydraulics::ScenarioKind::Master);
            let answers = right_answers(q);
            assert!(s.submit(&answers).unwrap().report.all_correct());
        }
    }
}
