use crate::infra::{InMemoryBulletinPublisher, InMemoryBulletinRepository};
use clap::Args;
use ecole_grades::config::AppConfig;
use ecole_grades::error::AppError;
use ecole_grades::grading::bulletin::{
    BulletinRequest, BulletinService, ClassReport, Mark, StudentRef, SubjectMarks,
};
use ecole_grades::grading::{
    available_evaluation_types, resolve_education_level, EducationLevel, EvaluationType,
};
use std::sync::Arc;

const ROSTER: [&str; 8] = [
    "Afi Dossou",
    "Koffi Agbessi",
    "Mariam Sanni",
    "Rodrigue Houngbo",
    "Nafissatou Bio",
    "Sèna Ahouandjinou",
    "Ibrahim Chabi",
    "Grâce Akplogan",
];

const PRESCHOOL_SUBJECTS: [&str; 4] = [
    "Langage",
    "Éveil mathématique",
    "Motricité",
    "Activités artistiques",
];

const PRIMARY_SUBJECTS: [&str; 5] = [
    "Français",
    "Mathématiques",
    "Éducation scientifique",
    "Histoire-Géographie",
    "EPS",
];

const SECONDARY_SUBJECTS: [(&str, f64); 7] = [
    ("Français", 2.0),
    ("Mathématiques", 4.0),
    ("PCT", 3.0),
    ("SVT", 2.0),
    ("Histoire-Géographie", 2.0),
    ("Anglais", 2.0),
    ("EPS", 1.0),
];

const PRESCHOOL_CODES: [&str; 3] = ["TS", "S", "PS"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Class label of the sample class (e.g. `GS`, `CM2`, `3ème A`, `Terminale D`)
    #[arg(long, default_value = "CM2")]
    pub(crate) class_label: String,
    /// Term to generate report cards for
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub(crate) term: u8,
    /// Number of students in the sample class
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub(crate) students: u8,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        class_label,
        term,
        students,
    } = args;

    let config = AppConfig::load()?;
    let level = resolve_education_level(&class_label);
    let requests = sample_class(&class_label, level, term, usize::from(students));

    let publisher = Arc::new(InMemoryBulletinPublisher::default());
    let service = BulletinService::new(
        Arc::new(InMemoryBulletinRepository::default()),
        publisher.clone(),
        config.school,
    );
    let report = service.generate_class(requests)?;

    println!(
        "Bulletins {} ({})",
        service.school().name,
        service.school().academic_year
    );
    println!(
        "Classe {} | {} | trimestre {}",
        class_label,
        level.label(),
        term
    );
    render_class_report(&report);

    let sent = publisher.sent();
    println!("\nNotices queued: {}", sent.len());
    if let Some(last) = sent.last() {
        println!(
            "  last: {} for {} at {}",
            last.notice.template,
            last.notice.student_id,
            last.sent_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

fn render_class_report(report: &ClassReport) {
    println!(
        "\n{:<5} {:<22} {:<12} {:<18} Statut",
        "Rang", "Élève", "Moyenne", "Mention"
    );
    for card in &report.report_cards {
        let rank = card
            .rank
            .map_or_else(|| "-".to_string(), |rank| rank.to_string());
        let mention = card
            .mention
            .map_or_else(String::new, |mention| {
                format!("{} {}", mention.emoji, mention.label)
            });
        println!(
            "{:<5} {:<22} {:<12} {:<18} {}",
            rank,
            card.student.full_name,
            card.average_display(),
            mention,
            card.status.label()
        );

        if card.level == EducationLevel::Maternelle {
            for line in &card.subjects {
                if let Some(evaluation) = line.qualitative {
                    println!("      {:<26} {} {}", line.name, evaluation.emoji, evaluation.label);
                }
            }
        }
    }

    let summary = &report.summary;
    println!("\nEffectif: {} ({} classés)", summary.size, summary.ranked);
    if let (Some(average), Some(highest), Some(lowest)) =
        (summary.class_average, summary.highest, summary.lowest)
    {
        println!("Moyenne de la classe: {average:.2}/20");
        println!("Plus forte: {highest:.2} | Plus faible: {lowest:.2}");
        println!("Admis (>= 10): {}/{}", summary.passing, summary.ranked);
    }
}

/// Deterministic marks so repeated demos print the same class.
fn sample_mark(student: usize, subject: usize, evaluation: usize) -> f64 {
    let spread = (student * 7 + subject * 5 + evaluation * 3) % 11;
    let half = if (student + evaluation) % 2 == 0 { 0.0 } else { 0.5 };
    (7.0 + spread as f64 + half).min(20.0)
}

pub(crate) fn sample_class(
    class_label: &str,
    level: EducationLevel,
    term: u8,
    students: usize,
) -> Vec<BulletinRequest> {
    ROSTER
        .iter()
        .take(students)
        .enumerate()
        .map(|(index, full_name)| BulletinRequest {
            student: StudentRef {
                id: format!("eleve-{:03}", index + 1),
                full_name: full_name.to_string(),
            },
            class_label: class_label.to_string(),
            term,
            subjects: sample_subjects(level, index, index + 1 == students && students > 1),
        })
        .collect()
}

/// The last student of a class has an unmarked first subject, which shows
/// partial report cards in the demo.
fn sample_subjects(level: EducationLevel, student: usize, incomplete: bool) -> Vec<SubjectMarks> {
    let evaluations = available_evaluation_types(level);

    match level {
        EducationLevel::Maternelle => PRESCHOOL_SUBJECTS
            .iter()
            .enumerate()
            .map(|(subject, name)| SubjectMarks {
                name: name.to_string(),
                coefficient: None,
                marks: Vec::new(),
                qualitative: (!(incomplete && subject == 0))
                    .then(|| PRESCHOOL_CODES[(student + subject) % 3].to_string()),
            })
            .collect(),
        EducationLevel::Primaire => PRIMARY_SUBJECTS
            .iter()
            .enumerate()
            .map(|(subject, name)| SubjectMarks {
                name: name.to_string(),
                coefficient: None,
                marks: sample_marks(evaluations, student, subject, incomplete && subject == 0),
                qualitative: None,
            })
            .collect(),
        EducationLevel::Secondaire1erCycle | EducationLevel::Secondaire2ndCycle => {
            SECONDARY_SUBJECTS
                .iter()
                .enumerate()
                .map(|(subject, (name, coefficient))| SubjectMarks {
                    name: name.to_string(),
                    coefficient: Some(*coefficient),
                    marks: sample_marks(evaluations, student, subject, incomplete && subject == 0),
                    qualitative: None,
                })
                .collect()
        }
    }
}

fn sample_marks(
    evaluations: &[EvaluationType],
    student: usize,
    subject: usize,
    missing_last: bool,
) -> Vec<Mark> {
    evaluations
        .iter()
        .enumerate()
        .map(|(position, evaluation)| Mark {
            evaluation: *evaluation,
            value: (!(missing_last && position + 1 == evaluations.len()))
                .then(|| sample_mark(student, subject, position)),
        })
        .collect()
}
