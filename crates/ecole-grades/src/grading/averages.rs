//! Averaging rules per pathway.
//!
//! Every function returns `None` rather than a number when its inputs do not
//! leave enough valid data, and every `Some` is rounded to two decimals.
//! Intermediate results are never rounded.

use super::scores::{is_valid_coefficient, is_valid_score, round2, ValidScores};

/// Mean of the valid marks of one evaluation (e.g. all EM1 marks of a subject).
pub fn numeric_average(scores: &[Option<f64>]) -> Option<f64> {
    ValidScores::scores(scores.iter().copied()).map(|valid| round2(valid.mean()))
}

/// Primary term: `((EM1 + EM2) / 2 + EC) / 2`. All three are required.
pub fn term_average_primary(
    em1_average: Option<f64>,
    em2_average: Option<f64>,
    ec_average: Option<f64>,
) -> Option<f64> {
    let [em1, em2, ec] = all_present([em1_average, em2_average, ec_average])?;
    Some(round2(((em1 + em2) / 2.0 + ec) / 2.0))
}

/// Primary year: mean of the monthly averages and mean of the certifying
/// averages, then the mean of both. Either side empty gives `None`.
pub fn annual_average_primary(
    monthly_averages: &[Option<f64>],
    certifying_averages: &[Option<f64>],
) -> Option<f64> {
    let monthly = ValidScores::finite(monthly_averages.iter().copied())?;
    let certifying = ValidScores::finite(certifying_averages.iter().copied())?;
    Some(round2((monthly.mean() + certifying.mean()) / 2.0))
}

/// Lower-secondary subject: `((IE1 + IE2) / 2 + DS1 + DS2) / 3`.
pub fn subject_average_lower_secondary(
    ie1: Option<f64>,
    ie2: Option<f64>,
    ds1: Option<f64>,
    ds2: Option<f64>,
) -> Option<f64> {
    secondary_base(ie1, ie2, ds1, ds2).map(round2)
}

/// Lower-secondary term: plain mean of the subject averages.
pub fn term_average_lower_secondary(subject_averages: &[Option<f64>]) -> Option<f64> {
    ValidScores::finite(subject_averages.iter().copied()).map(|valid| round2(valid.mean()))
}

/// Upper-secondary subject: the lower-secondary formula times the subject
/// coefficient. A missing or non-positive coefficient gives `None`.
pub fn subject_average_upper_secondary(
    ie1: Option<f64>,
    ie2: Option<f64>,
    ds1: Option<f64>,
    ds2: Option<f64>,
    coefficient: Option<f64>,
) -> Option<f64> {
    let coefficient = coefficient.filter(|value| is_valid_coefficient(*value))?;
    secondary_base(ie1, ie2, ds1, ds2).map(|base| round2(base * coefficient))
}

/// Upper-secondary term: `sum(weighted) / sum(coefficients)` over the
/// index-aligned pairs where both sides are valid. Entries beyond the
/// shorter list have no partner and are skipped.
pub fn term_average_upper_secondary(
    weighted_subject_averages: &[Option<f64>],
    coefficients: &[Option<f64>],
) -> Option<f64> {
    let (weighted_sum, coefficient_sum) = weighted_subject_averages
        .iter()
        .zip(coefficients)
        .filter_map(|(average, coefficient)| valid_pair(*average, *coefficient))
        .fold((0.0, 0.0), |(total, weights), (average, coefficient)| {
            (total + average, weights + coefficient)
        });

    if coefficient_sum > 0.0 {
        Some(round2(weighted_sum / coefficient_sum))
    } else {
        None
    }
}

/// Secondary year, both cycles: plain mean of the available term averages.
pub fn annual_average_secondary(
    t1: Option<f64>,
    t2: Option<f64>,
    t3: Option<f64>,
) -> Option<f64> {
    ValidScores::finite([t1, t2, t3]).map(|valid| round2(valid.mean()))
}

/// Coefficient-weighted mean of raw marks: `sum(score * c) / sum(c)`.
pub(crate) fn weighted_mean(scores: &[Option<f64>], coefficients: &[Option<f64>]) -> Option<f64> {
    let (weighted_sum, coefficient_sum) = scores
        .iter()
        .zip(coefficients)
        .filter_map(|(score, coefficient)| {
            let score = score.filter(|value| is_valid_score(*value))?;
            let coefficient = coefficient.filter(|value| is_valid_coefficient(*value))?;
            Some((score * coefficient, coefficient))
        })
        .fold((0.0, 0.0), |(total, weights), (weighted, coefficient)| {
            (total + weighted, weights + coefficient)
        });

    if coefficient_sum > 0.0 {
        Some(round2(weighted_sum / coefficient_sum))
    } else {
        None
    }
}

fn secondary_base(
    ie1: Option<f64>,
    ie2: Option<f64>,
    ds1: Option<f64>,
    ds2: Option<f64>,
) -> Option<f64> {
    let [ie1, ie2, ds1, ds2] = all_present([ie1, ie2, ds1, ds2])?;
    Some(((ie1 + ie2) / 2.0 + ds1 + ds2) / 3.0)
}

fn valid_pair(average: Option<f64>, coefficient: Option<f64>) -> Option<(f64, f64)> {
    let average = average.filter(|value| value.is_finite())?;
    let coefficient = coefficient.filter(|value| is_valid_coefficient(*value))?;
    Some((average, coefficient))
}

/// Strict gate: every input present and finite, otherwise `None`.
fn all_present<const N: usize>(values: [Option<f64>; N]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.filter(|value| value.is_finite())?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_average_skips_missing_marks() {
        assert_eq!(
            numeric_average(&[Some(15.0), Some(16.0), None, Some(14.0)]),
            Some(15.0)
        );
        assert_eq!(numeric_average(&[Some(12.0), Some(13.0), Some(13.0)]), Some(12.67));
    }

    #[test]
    fn numeric_average_is_none_without_valid_marks() {
        assert_eq!(numeric_average(&[]), None);
        assert_eq!(numeric_average(&[None, None]), None);
        assert_eq!(numeric_average(&[Some(f64::NAN)]), None);
    }

    #[test]
    fn numeric_average_drops_out_of_range_marks() {
        assert_eq!(numeric_average(&[Some(10.0), Some(35.0), Some(-1.0)]), Some(10.0));
    }

    #[test]
    fn primary_term_requires_every_component() {
        assert_eq!(
            term_average_primary(Some(14.0), Some(16.0), Some(15.0)),
            Some(15.0)
        );
        assert_eq!(term_average_primary(Some(14.0), None, Some(15.0)), None);
        assert_eq!(term_average_primary(Some(f64::NAN), Some(12.0), Some(15.0)), None);
    }

    #[test]
    fn primary_term_rounds_only_at_the_end() {
        // ((10 + 11) / 2 + 13.333) / 2 = 11.9165
        assert_eq!(
            term_average_primary(Some(10.0), Some(11.0), Some(13.333)),
            Some(11.92)
        );
    }

    #[test]
    fn primary_year_combines_monthly_and_certifying() {
        let monthly = [Some(12.0), Some(14.0), None, Some(10.0), Some(16.0), Some(8.0)];
        let certifying = [Some(15.0), Some(13.0), None];
        // monthly mean 12, certifying mean 14
        assert_eq!(annual_average_primary(&monthly, &certifying), Some(13.0));
        assert_eq!(annual_average_primary(&monthly, &[None, None]), None);
        assert_eq!(annual_average_primary(&[], &certifying), None);
    }

    #[test]
    fn lower_secondary_subject_formula() {
        // ((12 + 14) / 2 + 10 + 16) / 3 = 13
        assert_eq!(
            subject_average_lower_secondary(Some(12.0), Some(14.0), Some(10.0), Some(16.0)),
            Some(13.0)
        );
        // ((15 + 16) / 2 + 12 + 14) / 3 = 13.8333
        assert_eq!(
            subject_average_lower_secondary(Some(15.0), Some(16.0), Some(12.0), Some(14.0)),
            Some(13.83)
        );
        assert_eq!(
            subject_average_lower_secondary(Some(12.0), Some(14.0), None, Some(16.0)),
            None
        );
    }

    #[test]
    fn lower_secondary_term_is_plain_mean() {
        assert_eq!(
            term_average_lower_secondary(&[Some(12.0), None, Some(15.0), Some(10.5)]),
            Some(12.5)
        );
        assert_eq!(term_average_lower_secondary(&[None]), None);
    }

    #[test]
    fn upper_secondary_subject_is_weighted() {
        assert_eq!(
            subject_average_upper_secondary(
                Some(12.0),
                Some(14.0),
                Some(10.0),
                Some(16.0),
                Some(3.0)
            ),
            Some(39.0)
        );
        assert_eq!(
            subject_average_upper_secondary(
                Some(15.0),
                Some(16.0),
                Some(12.0),
                Some(14.0),
                Some(2.0)
            ),
            Some(27.67)
        );
    }

    #[test]
    fn upper_secondary_subject_rejects_bad_coefficients() {
        let marks = (Some(12.0), Some(14.0), Some(10.0), Some(16.0));
        for coefficient in [None, Some(0.0), Some(-1.0), Some(f64::NAN)] {
            assert_eq!(
                subject_average_upper_secondary(marks.0, marks.1, marks.2, marks.3, coefficient),
                None
            );
        }
        assert_eq!(
            subject_average_upper_secondary(None, marks.1, marks.2, marks.3, Some(2.0)),
            None
        );
    }

    #[test]
    fn upper_secondary_term_divides_by_coefficient_sum() {
        // maths 13 x 4 = 52, french 12 x 2 = 24, sport 16 x 1 = 16
        let weighted = [Some(52.0), Some(24.0), Some(16.0)];
        let coefficients = [Some(4.0), Some(2.0), Some(1.0)];
        // 92 / 7 = 13.142857
        assert_eq!(
            term_average_upper_secondary(&weighted, &coefficients),
            Some(13.14)
        );
    }

    #[test]
    fn upper_secondary_term_skips_incomplete_pairs() {
        let weighted = [Some(52.0), None, Some(16.0), Some(30.0)];
        let coefficients = [Some(4.0), Some(2.0), Some(0.0)];
        assert_eq!(
            term_average_upper_secondary(&weighted, &coefficients),
            Some(13.0)
        );
        assert_eq!(term_average_upper_secondary(&[None], &[Some(2.0)]), None);
        assert_eq!(term_average_upper_secondary(&[], &[]), None);
    }

    #[test]
    fn secondary_year_averages_available_terms() {
        assert_eq!(
            annual_average_secondary(Some(12.0), Some(13.0), Some(14.5)),
            Some(13.17)
        );
        assert_eq!(annual_average_secondary(Some(12.0), None, Some(14.0)), Some(13.0));
        assert_eq!(annual_average_secondary(None, None, None), None);
    }

    #[test]
    fn weighted_mean_pairs_marks_with_coefficients() {
        assert_eq!(
            weighted_mean(&[Some(10.0), Some(16.0)], &[Some(1.0), Some(3.0)]),
            Some(14.5)
        );
        assert_eq!(weighted_mean(&[Some(30.0)], &[Some(2.0)]), None);
    }

    #[test]
    fn aggregations_are_repeatable() {
        let marks = [Some(11.5), Some(17.25), None, Some(9.0)];
        let first = numeric_average(&marks);
        let second = numeric_average(&marks);
        assert_eq!(first, second);
        assert_eq!(
            term_average_upper_secondary(&[Some(40.0)], &[Some(3.0)]),
            term_average_upper_secondary(&[Some(40.0)], &[Some(3.0)])
        );
    }
}
