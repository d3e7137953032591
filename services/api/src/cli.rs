use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecole_grades::error::AppError;
use ecole_grades::grading::{
    available_evaluation_types, average_for_level, classify_mention, coefficient_required,
    match_level_label, mention_scale, resolve_education_level, EducationLevel,
};

#[derive(Parser, Debug)]
#[command(
    name = "Ecole Grades",
    about = "Compute averages and report cards for the Beninese school system",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Average a list of marks the way a level prescribes
    Average(AverageArgs),
    /// Classify an average into its mention
    Mention(MentionArgs),
    /// Resolve a class label to its education level
    Level(LevelArgs),
    /// Generate and print a sample class report
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AverageArgs {
    /// Comma separated marks; `-` marks an absent score (e.g. `12,14.5,-,16`)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) scores: Vec<String>,
    /// Education level code (MATERNELLE, PRIMAIRE, SECONDAIRE_1ER_CYCLE, SECONDAIRE_2ND_CYCLE)
    #[arg(long, conflicts_with = "class_label")]
    pub(crate) level: Option<EducationLevel>,
    /// Class label to resolve the level from (e.g. `CM2`, `Terminale D`)
    #[arg(long)]
    pub(crate) class_label: Option<String>,
    /// Comma separated coefficients, one per score
    #[arg(long, value_delimiter = ',')]
    pub(crate) coefficients: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct MentionArgs {
    /// Average on the 0-20 scale
    #[arg(allow_negative_numbers = true)]
    pub(crate) average: Option<f64>,
    /// Print every mention tier instead
    #[arg(long)]
    pub(crate) scale: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LevelArgs {
    /// Class label such as `CM2`, `6ème B` or `Terminale D`
    pub(crate) label: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Average(args) => run_average(args),
        Command::Mention(args) => run_mention(args),
        Command::Level(args) => {
            run_level(args);
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}

fn run_average(args: AverageArgs) -> Result<(), AppError> {
    let level = match (args.level, args.class_label.as_deref()) {
        (Some(level), _) => level,
        (None, Some(label)) => resolve_education_level(label),
        (None, None) => {
            return Err(AppError::InvalidInput(
                "pass either --level or --class-label".to_string(),
            ))
        }
    };

    let scores = parse_marks(&args.scores)?;
    let coefficients = parse_marks(&args.coefficients)?;
    let coefficients = (!coefficients.is_empty()).then_some(coefficients.as_slice());

    match average_for_level(&scores, None, level, coefficients) {
        Some(average) => {
            let mention = classify_mention(average);
            println!("Level:   {} ({})", level.label(), level);
            println!("Average: {average:.2}/20");
            println!("Mention: {} {}", mention.emoji, mention.label);
            println!("         {}", mention.observation);
        }
        None => {
            println!("Level:   {} ({})", level.label(), level);
            println!("Average: en attente (no usable marks for this level)");
        }
    }

    Ok(())
}

fn run_mention(args: MentionArgs) -> Result<(), AppError> {
    if args.scale {
        println!("{:<8} {:<18} Observation", "From", "Mention");
        for (lower_bound, mention) in mention_scale() {
            let from = lower_bound.map_or_else(|| "-".to_string(), |bound| format!("{bound:.0}"));
            println!(
                "{:<8} {:<18} {}",
                from,
                format!("{} {}", mention.emoji, mention.label),
                mention.observation
            );
        }
        return Ok(());
    }

    let average = args.average.ok_or_else(|| {
        AppError::InvalidInput("pass an average or --scale".to_string())
    })?;
    if !average.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "'{average}' is not a usable average"
        )));
    }

    let mention = classify_mention(average);
    println!("{} {}", mention.emoji, mention.label);
    println!("Observation:    {}", mention.observation);
    println!("Recommendation: {}", mention.recommendation);
    Ok(())
}

fn run_level(args: LevelArgs) {
    let matched = match_level_label(&args.label);
    let level = resolve_education_level(&args.label);

    println!("Class label: {}", args.label);
    match matched {
        Some(_) => println!("Level:       {} ({})", level.label(), level),
        None => println!("Level:       {} ({}, default)", level.label(), level),
    }
    let evaluations: Vec<&str> = available_evaluation_types(level)
        .iter()
        .map(|evaluation| evaluation.code())
        .collect();
    println!("Evaluations: {}", evaluations.join(", "));
    println!(
        "Coefficients: {}",
        if coefficient_required(level) {
            "required"
        } else {
            "not used"
        }
    );
}

/// Parses CLI marks. `-` and empty entries are absent marks.
pub(crate) fn parse_marks(raw: &[String]) -> Result<Vec<Option<f64>>, AppError> {
    raw.iter()
        .map(|value| match value.trim() {
            "" | "-" => Ok(None),
            trimmed => trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::InvalidInput(format!("'{trimmed}' is not a mark"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_marks_treats_dashes_as_absent() {
        let raw = vec!["12".to_string(), " - ".to_string(), "14.5".to_string()];
        let marks = parse_marks(&raw).expect("marks parse");
        assert_eq!(marks, vec![Some(12.0), None, Some(14.5)]);
    }

    #[test]
    fn parse_marks_rejects_words() {
        let raw = vec!["douze".to_string()];
        assert!(matches!(
            parse_marks(&raw),
            Err(AppError::InvalidInput(message)) if message.contains("douze")
        ));
    }

    #[test]
    fn cli_parses_average_arguments() {
        let cli = Cli::try_parse_from([
            "ecole-grades-api",
            "average",
            "--scores",
            "10,16,-",
            "--level",
            "SECONDAIRE_2ND_CYCLE",
            "--coefficients",
            "1,3,2",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Average(args)) => {
                assert_eq!(args.scores, ["10", "16", "-"]);
                assert_eq!(args.level, Some(EducationLevel::Secondaire2ndCycle));
                assert_eq!(args.coefficients.len(), 3);
            }
            other => panic!("expected average command, got {other:?}"),
        }
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["ecole-grades-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
