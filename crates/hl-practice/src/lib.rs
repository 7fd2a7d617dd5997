//! Practice mode for pump operators.
//!
//! Builds randomized hose layouts, turns them into questions (direct PDP,
//! adjusted layouts, intermediate values, pump-limit checks and bank-driven
//! multi-part questions), grades typed answers, and explains misses with
//! mistake hints and a step-by-step reveal.
//!
//! Randomness always comes through an injected [`hl_core::RandomSource`], so a
//! fixed seed reproduces a whole session.

pub mod adjust;
pub mod answer;
pub mod bank;
pub mod bank_eval;
pub mod composer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod grading;
pub mod question;
pub mod reveal;
pub mod session;

// Re-export key types for convenience
pub use adjust::{Adjustment, choose_adjustment};
pub use answer::{AnswerType, Expected, Unit, YesNo};
pub use bank::{
    Bank, BankDefaults, DEFAULT_BANK_PATH, PartTemplate, Template, Uses, load_bank, try_load_bank,
};
pub use bank_eval::{AnswerKey, BankEvaluator, Part};
pub use composer::{QUESTION_WEIGHTS, QuestionComposer};
pub use config::PracticeConfig;
pub use diagnostics::{Hint, MistakeKind, diagnose};
pub use error::{PracticeError, PracticeResult};
pub use generator::ScenarioGenerator;
pub use grading::{GradeReport, GradeStatus, PartGrade, grade, parse_number, parse_yes_no};
pub use question::{QKind, Question, QuestionKind, ReverseTarget};
pub use reveal::{Reveal, RevealStep, build_reveal, scenario_steps};
pub use session::{Feedback, PracticeSession, Scoreboard};
