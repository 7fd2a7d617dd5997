use clap::{Parser, Subcommand, ValueEnum};
use hl_core::{DEFAULT_SEED, SeededRng, fmt_value};
use hl_hydraulics::{
    Branch, Calculator, Catalog, DEFAULT_PSI_PER_FLOOR, DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI,
    ElevationRule, FoamProportioning, HoseSegment, HydraulicsError, MasterLayout, MasterNozzle,
    Nozzle, Scenario, SingleLine, StandpipeLayout, SupplyLine, TenderShuttle, WYE_LOSS_PSI,
    WyeLayout,
};
use hl_practice::{
    Bank, DEFAULT_BANK_PATH, Expected, GradeStatus, PracticeConfig, PracticeError, PracticeResult,
    PracticeSession, QuestionComposer, Reveal, ScenarioGenerator, Unit, load_bank, scenario_steps,
    try_load_bank,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hl-cli")]
#[command(about = "Hoseline CLI - pump pressure calculator and practice drills", long_about = None)]
struct Cli {
    /// Department hose/nozzle catalog (YAML or JSON); stock table when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Elevation pressure rule
    #[arg(long, value_enum, global = true)]
    rule: Option<RuleArg>,
    /// Custom elevation pressure per foot, overrides --rule
    #[arg(long, global = true)]
    psi_per_ft: Option<f64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleArg {
    /// 0.5 psi per foot
    LineEditor,
    /// 0.434 psi per foot
    Hydrostatic,
}

#[derive(Subcommand)]
enum Commands {
    /// Pump discharge pressure for a hose layout
    #[command(subcommand)]
    Calc(CalcCommands),
    /// Tender shuttle sustained flow
    Tender {
        /// Tender tank size in gallons
        #[arg(long)]
        tank: f64,
        /// Round trip time in minutes
        #[arg(long)]
        turnaround: f64,
        /// Flow the fireground needs
        #[arg(long)]
        required: Option<f64>,
    },
    /// Foam concentrate metering
    Foam {
        /// Foam solution flow in gpm
        #[arg(long)]
        solution_gpm: f64,
        /// Concentrate percentage (3 for 3%)
        #[arg(long)]
        percent: f64,
        /// Minutes of operation
        #[arg(long)]
        minutes: f64,
        /// Concentrate carried on the apparatus in gallons
        #[arg(long, default_value_t = 0.0)]
        onboard: f64,
    },
    /// Standpipe pump pressure
    Standpipe {
        /// Floors above the FDC
        #[arg(long)]
        floors: f64,
        /// Flow through the standpipe in gpm
        #[arg(long)]
        flow: f64,
        /// Hose length between pump and FDC in feet
        #[arg(long, default_value_t = 100.0)]
        hose_length: f64,
        /// Hose diameter between pump and FDC
        #[arg(long, default_value = "2.5")]
        hose_diameter: String,
        /// Pressure wanted at the outlet
        #[arg(long, default_value_t = 100.0)]
        outlet: f64,
        #[arg(long, default_value_t = DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI)]
        appliance: f64,
        #[arg(long, default_value_t = DEFAULT_PSI_PER_FLOOR)]
        psi_per_floor: f64,
        /// Pump limit to check the result against
        #[arg(long)]
        limit: Option<f64>,
    },
    /// Interactive practice quiz on stdin
    Practice {
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Question bank (YAML or JSON); banks/practice_bank.json when omitted
        #[arg(long)]
        bank: Option<PathBuf>,
        /// Practice config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop after this many questions
        #[arg(long)]
        count: Option<usize>,
    },
    /// Print seeded questions as JSON lines
    Generate {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Question bank (YAML or JSON); banks/practice_bank.json when omitted
        #[arg(long)]
        bank: Option<PathBuf>,
        /// Practice config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a question bank file
    BankCheck {
        /// Path to the bank file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum CalcCommands {
    /// One attack line
    Single {
        #[arg(long, default_value = "1.75")]
        diameter: String,
        #[arg(long, default_value_t = 200.0)]
        length: f64,
        #[command(flatten)]
        nozzle: NozzleArgs,
        /// Nozzle height above the pump in feet
        #[arg(long, default_value_t = 0.0)]
        elevation: f64,
        /// Print the derived values as JSON
        #[arg(long)]
        json: bool,
    },
    /// Main line to a gated wye with two 1.75" branches
    Wye {
        #[arg(long, default_value = "2.5")]
        main_diameter: String,
        #[arg(long, default_value_t = 200.0)]
        main_length: f64,
        #[arg(long, default_value_t = 150.0)]
        a_length: f64,
        /// Catalog nozzle id on branch A
        #[arg(long)]
        a_nozzle: Option<String>,
        #[arg(long)]
        a_gpm: Option<f64>,
        #[arg(long)]
        a_np: Option<f64>,
        #[arg(long, default_value_t = 150.0)]
        b_length: f64,
        /// Catalog nozzle id on branch B
        #[arg(long)]
        b_nozzle: Option<String>,
        #[arg(long)]
        b_gpm: Option<f64>,
        #[arg(long)]
        b_np: Option<f64>,
        #[arg(long, default_value_t = WYE_LOSS_PSI)]
        wye_loss: f64,
        #[arg(long, default_value_t = 0.0)]
        elevation: f64,
        #[arg(long)]
        json: bool,
    },
    /// Master stream fed by two 2.5" lines
    Master {
        #[command(flatten)]
        nozzle: NozzleArgs,
        /// Appliance loss when the nozzle is given by --gpm/--np
        #[arg(long, default_value_t = 25.0)]
        appliance: f64,
        #[arg(long, default_value_t = 200.0)]
        line1: f64,
        #[arg(long, default_value_t = 200.0)]
        line2: f64,
        #[arg(long, default_value_t = 0.0)]
        elevation: f64,
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct NozzleArgs {
    /// Catalog nozzle id
    #[arg(long)]
    nozzle: Option<String>,
    /// Nozzle flow in gpm
    #[arg(long)]
    gpm: Option<f64>,
    /// Nozzle pressure in psi
    #[arg(long)]
    np: Option<f64>,
}

fn main() -> PracticeResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let rule = elevation_rule(cli.rule, cli.psi_per_ft);

    match cli.command {
        Commands::Calc(calc_cmd) => cmd_calc(&catalog, rule.unwrap_or_default(), calc_cmd),
        Commands::Tender {
            tank,
            turnaround,
            required,
        } => cmd_tender(tank, turnaround, required),
        Commands::Foam {
            solution_gpm,
            percent,
            minutes,
            onboard,
        } => cmd_foam(FoamProportioning {
            solution_gpm,
            percent,
            minutes,
            onboard_gallons: onboard,
        }),
        Commands::Standpipe {
            floors,
            flow,
            hose_length,
            hose_diameter,
            outlet,
            appliance,
            psi_per_floor,
            limit,
        } => cmd_standpipe(
            &catalog,
            &StandpipeLayout {
                outlet_psi: outlet,
                appliance_loss_psi: appliance,
                floors_up: floors,
                psi_per_floor,
                flow_gpm: flow,
                hose: HoseSegment::new(hose_diameter, hose_length),
            },
            limit,
        ),
        Commands::Practice {
            seed,
            bank,
            config,
            count,
        } => {
            let mut config = load_config(config.as_deref(), rule)?;
            if seed.is_some() {
                config.seed = seed;
            }
            cmd_practice(config, catalog, bank.as_deref(), count)
        }
        Commands::Generate {
            seed,
            count,
            bank,
            config,
        } => {
            let config = load_config(config.as_deref(), rule)?;
            cmd_generate(&config, &catalog, bank.as_deref(), seed, count)
        }
        Commands::BankCheck { path } => cmd_bank_check(&path),
    }
}

fn load_catalog(path: Option<&Path>) -> PracticeResult<Catalog> {
    match path {
        Some(path) => Ok(Catalog::load(path)?),
        None => Ok(Catalog::standard()),
    }
}

fn load_config(path: Option<&Path>, rule: Option<ElevationRule>) -> PracticeResult<PracticeConfig> {
    let mut config = match path {
        Some(path) => PracticeConfig::load(path)?,
        None => PracticeConfig::default(),
    };
    if let Some(rule) = rule {
        config.elevation = rule;
    }
    Ok(config)
}

fn elevation_rule(rule: Option<RuleArg>, psi_per_ft: Option<f64>) -> Option<ElevationRule> {
    match (psi_per_ft, rule) {
        (Some(psi_per_ft), _) => Some(ElevationRule::Custom { psi_per_ft }),
        (None, Some(RuleArg::LineEditor)) => Some(ElevationRule::LineEditor),
        (None, Some(RuleArg::Hydrostatic)) => Some(ElevationRule::Hydrostatic),
        (None, None) => None,
    }
}

fn catalog_nozzle<'c>(catalog: &'c Catalog, id: &str) -> PracticeResult<&'c hl_hydraulics::NozzleDef> {
    catalog.nozzle(id).ok_or_else(|| {
        HydraulicsError::Missing {
            what: format!("nozzle '{id}'"),
        }
        .into()
    })
}

fn manual_nozzle(flag: &str, gpm: Option<f64>, np: Option<f64>) -> PracticeResult<(f64, f64)> {
    match (gpm, np) {
        (Some(gpm), Some(np)) => Ok((gpm, np)),
        _ => Err(PracticeError::Config {
            what: format!("give {flag} or both the flow and nozzle pressure"),
        }),
    }
}

fn handline_nozzle(
    catalog: &Catalog,
    id: Option<&str>,
    gpm: Option<f64>,
    np: Option<f64>,
) -> PracticeResult<Nozzle> {
    match id {
        Some(id) => Ok(catalog_nozzle(catalog, id)?.nozzle()),
        None => {
            let (gpm, np) = manual_nozzle("--nozzle", gpm, np)?;
            Ok(Nozzle::new(format!("{} gpm nozzle", fmt_value(gpm)), gpm, np))
        }
    }
}

fn cmd_calc(catalog: &Catalog, rule: ElevationRule, calc_cmd: CalcCommands) -> PracticeResult<()> {
    let (scenario, json) = match calc_cmd {
        CalcCommands::Single {
            diameter,
            length,
            nozzle,
            elevation,
            json,
        } => {
            let nozzle = handline_nozzle(catalog, nozzle.nozzle.as_deref(), nozzle.gpm, nozzle.np)?;
            let scenario = Scenario::Single(SingleLine {
                main_diameter: diameter,
                main_length_ft: length,
                elevation_ft: elevation,
                nozzle,
            });
            (scenario, json)
        }
        CalcCommands::Wye {
            main_diameter,
            main_length,
            a_length,
            a_nozzle,
            a_gpm,
            a_np,
            b_length,
            b_nozzle,
            b_gpm,
            b_np,
            wye_loss,
            elevation,
            json,
        } => {
            let nozzle_a = handline_nozzle(catalog, a_nozzle.as_deref(), a_gpm, a_np)?;
            let nozzle_b = handline_nozzle(catalog, b_nozzle.as_deref(), b_gpm, b_np)?;
            let scenario = Scenario::Wye2(WyeLayout {
                main_diameter,
                main_length_ft: main_length,
                elevation_ft: elevation,
                wye_loss_psi: wye_loss,
                branch_a: Branch::new(a_length, nozzle_a),
                branch_b: Branch::new(b_length, nozzle_b),
            });
            (scenario, json)
        }
        CalcCommands::Master {
            nozzle,
            appliance,
            line1,
            line2,
            elevation,
            json,
        } => {
            let master_nozzle = match nozzle.nozzle.as_deref() {
                Some(id) => catalog_nozzle(catalog, id)?.master_nozzle().ok_or_else(|| {
                    PracticeError::Config {
                        what: format!("nozzle '{id}' is not a master stream device"),
                    }
                })?,
                None => {
                    let (gpm, np) = manual_nozzle("--nozzle", nozzle.gpm, nozzle.np)?;
                    MasterNozzle {
                        label: format!("Master stream {}", fmt_value(gpm)),
                        gpm,
                        required_pressure: np,
                        appliance_loss_psi: appliance,
                    }
                }
            };
            let scenario = Scenario::Master(MasterLayout {
                elevation_ft: elevation,
                master_nozzle,
                line1: SupplyLine { length_ft: line1 },
                line2: SupplyLine { length_ft: line2 },
            });
            (scenario, json)
        }
    };

    let calc = Calculator::new(catalog, rule);
    let derived = calc.derive(&scenario);
    tracing::debug!(kind = scenario.kind().label(), pdp = derived.pdp_psi, "calculated");

    if json {
        println!("{}", serde_json::to_string_pretty(&derived)?);
        return Ok(());
    }

    let reveal = Reveal {
        lead: scenario.to_string(),
        steps: scenario_steps(&calc, &scenario),
        total_psi: derived.pdp_psi,
        answers: vec![Expected::number(derived.pdp_psi, Unit::Psi, 0.0)],
    };
    println!("{}", reveal);
    Ok(())
}

fn cmd_tender(tank: f64, turnaround: f64, required: Option<f64>) -> PracticeResult<()> {
    let shuttle = TenderShuttle::new(tank, turnaround);
    println!(
        "Sustained flow: {} gal / {} min = {} gpm",
        fmt_value(tank),
        fmt_value(turnaround),
        fmt_value(shuttle.sustained_gpm())
    );
    if let Some(required) = required {
        let verdict = if shuttle.can_supply(required) { "✓" } else { "✗" };
        println!("{} Required flow: {} gpm", verdict, fmt_value(required));
        println!("  Tenders needed: {}", fmt_value(shuttle.tenders_needed(required)));
        println!(
            "  Longest turnaround for one tender: {} min",
            fmt_value(shuttle.max_turnaround_minutes(required))
        );
    }
    Ok(())
}

fn cmd_foam(foam: FoamProportioning) -> PracticeResult<()> {
    println!(
        "Concentrate flow: {} gpm × {}% = {} gpm",
        fmt_value(foam.solution_gpm),
        fmt_value(foam.percent),
        fmt_value(foam.concentrate_gpm())
    );
    println!(
        "Concentrate used: {} gpm × {} min = {} gal",
        fmt_value(foam.concentrate_gpm()),
        fmt_value(foam.minutes),
        fmt_value(foam.concentrate_gallons())
    );
    if foam.onboard_gallons > 0.0 {
        let verdict = if foam.enough_onboard() { "✓" } else { "✗" };
        println!("{} Onboard: {} gal", verdict, fmt_value(foam.onboard_gallons));
    }
    Ok(())
}

fn cmd_standpipe(catalog: &Catalog, layout: &StandpipeLayout, limit: Option<f64>) -> PracticeResult<()> {
    let breakdown = layout.breakdown(catalog);
    println!("Standpipe operation:");
    println!("  Outlet:         {} psi", fmt_value(layout.outlet_psi));
    println!("  Appliance loss: {} psi", fmt_value(layout.appliance_loss_psi));
    println!(
        "  Elevation:      {} floors × {} psi = {} psi",
        fmt_value(layout.floors_up),
        fmt_value(layout.psi_per_floor),
        fmt_value(breakdown.elevation_psi)
    );
    println!(
        "  Supply hose FL: {}' of {}\" at {} gpm = {} psi",
        fmt_value(layout.hose.length_ft),
        layout.hose.diameter,
        fmt_value(layout.flow_gpm),
        fmt_value(breakdown.hose_fl_psi)
    );
    println!("  PDP:            {} psi", fmt_value(breakdown.pdp_psi));
    if let Some(limit) = limit {
        if layout.acceptable(catalog, limit) {
            println!("✓ Within the {} psi limit", fmt_value(limit));
        } else {
            println!("✗ Exceeds the {} psi limit", fmt_value(limit));
        }
    }
    Ok(())
}

enum Reply {
    Answers(Vec<String>),
    Reveal,
    Quit,
}

fn read_reply(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
    prompts: &[String],
) -> PracticeResult<Reply> {
    let mut answers = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        write!(out, "{} > ", prompt)?;
        out.flush()?;
        let Some(line) = lines.next() else {
            return Ok(Reply::Quit);
        };
        let line = line?;
        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" => return Ok(Reply::Quit),
            "reveal" | "?" => return Ok(Reply::Reveal),
            _ => answers.push(line),
        }
    }
    Ok(Reply::Answers(answers))
}

/// The pack at `path`, or at the default location; the built-in pack when neither loads.
fn practice_bank(path: Option<&Path>) -> Bank {
    load_bank(path.unwrap_or(Path::new(DEFAULT_BANK_PATH)))
}

fn cmd_practice(
    config: PracticeConfig,
    catalog: Catalog,
    bank_path: Option<&Path>,
    count: Option<usize>,
) -> PracticeResult<()> {
    let mut session = PracticeSession::new(config, catalog, practice_bank(bank_path))?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    run_quiz(&mut session, &mut lines, &mut io::stdout(), count)
}

/// Ask questions until `count` is reached or the input ends. A reveal keeps
/// the current question open.
fn run_quiz(
    session: &mut PracticeSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    out: &mut impl Write,
    count: Option<usize>,
) -> PracticeResult<()> {
    writeln!(out, "Answer each prompt; 'reveal' shows the math, 'quit' ends the drill.")?;
    let mut asked = 0usize;
    'questions: while count.is_none_or(|limit| asked < limit) {
        let question = session.next_question()?;
        asked += 1;
        writeln!(out, "\n[{}] {}", question.q_kind(), question.prompt)?;
        let prompts: Vec<String> = match question.part_prompts() {
            parts if parts.is_empty() => vec!["Answer".to_string()],
            parts => parts.into_iter().map(str::to_string).collect(),
        };

        loop {
            match read_reply(lines, out, &prompts)? {
                Reply::Quit => break 'questions,
                Reply::Reveal => {
                    writeln!(out, "{}", session.reveal_current()?)?;
                    writeln!(out, "The question is still open; answer it or 'quit'.")?;
                }
                Reply::Answers(answers) => {
                    let feedback = session.submit(&answers)?;
                    if feedback.report.has_invalid() {
                        writeln!(out, "Enter a number, or Y/N for yes/no parts.")?;
                        continue;
                    }
                    for (i, part) in feedback.report.parts.iter().enumerate() {
                        let mark = match part.status {
                            GradeStatus::Correct => "✓",
                            GradeStatus::Incorrect | GradeStatus::Invalid => "✗",
                        };
                        writeln!(out, "{} Part {}: expected {}", mark, i + 1, part.expected)?;
                    }
                    if let Some(hint) = &feedback.hint {
                        writeln!(out, "Hint: {}", hint.message)?;
                    }
                    if let Some(reveal) = &feedback.reveal {
                        writeln!(out, "{}", reveal)?;
                    }
                    break;
                }
            }
        }
    }

    let score = session.score();
    writeln!(
        out,
        "\nScore: {}/{} ({:.0}%), best streak {}",
        score.correct,
        score.attempted,
        score.accuracy() * 100.0,
        score.best_streak
    )?;
    Ok(())
}

fn cmd_generate(
    config: &PracticeConfig,
    catalog: &Catalog,
    bank_path: Option<&Path>,
    seed: u64,
    count: usize,
) -> PracticeResult<()> {
    config.validate()?;
    catalog.validate()?;
    let bank = practice_bank(bank_path);
    let calc = Calculator::new(catalog, config.elevation);
    let generator = ScenarioGenerator::new(calc, config);
    let composer = QuestionComposer::new(calc, config);
    let mut rng = SeededRng::from_seed_u64(seed);

    for _ in 0..count {
        let scenario = generator.generate(&mut rng)?;
        let question = composer.compose_any(scenario, &bank, &mut rng)?;
        println!("{}", serde_json::to_string(&question)?);
    }
    Ok(())
}

fn cmd_bank_check(path: &Path) -> PracticeResult<()> {
    match try_load_bank(path) {
        Ok(bank) => {
            println!(
                "✓ Bank is valid: {} ({} templates)",
                bank.pack_id.as_deref().unwrap_or("unnamed"),
                bank.templates.len()
            );
            for template in &bank.templates {
                println!(
                    "  - {} (weight {}, {} parts)",
                    template.id,
                    fmt_value(template.weight),
                    template.parts.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Bank is invalid: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_session(seed: u64) -> PracticeSession {
        let config = PracticeConfig {
            seed: Some(seed),
            ..PracticeConfig::default()
        };
        PracticeSession::new(config, Catalog::standard(), Bank::builtin()).unwrap()
    }

    fn input(lines: Vec<String>) -> impl Iterator<Item = io::Result<String>> {
        lines.into_iter().map(Ok)
    }

    #[test]
    fn question_stays_open_after_reveal() {
        // same seed, same first question
        let mut twin = seeded_session(21);
        let answers: Vec<String> = twin
            .next_question()
            .unwrap()
            .expected_parts()
            .iter()
            .map(|e| e.to_string())
            .collect();

        let mut script = vec!["reveal".to_string()];
        script.extend(answers);
        let mut session = seeded_session(21);
        let mut out = Vec::new();
        run_quiz(&mut session, &mut input(script), &mut out, Some(1)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("still open"), "{text}");
        assert_eq!(session.score().attempted, 1);
        assert_eq!(session.score().correct, 1);
        assert!(text.contains("Score: 1/1"), "{text}");
    }

    #[test]
    fn quit_ends_without_scoring() {
        let mut session = seeded_session(4);
        let mut out = Vec::new();
        run_quiz(&mut session, &mut input(vec!["quit".to_string()]), &mut out, None).unwrap();
        assert_eq!(session.score().attempted, 0);
        assert!(String::from_utf8(out).unwrap().contains("Score: 0/0"));
    }
}
