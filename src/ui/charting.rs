use typerank::analytics::PatternPoint;

/// Chart series of (seconds, wpm).
pub fn wpm_series(points: &[PatternPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.time as f64, p.wpm as f64)).collect()
}

/// X (seconds) and Y (WPM) bounds for the results chart.
pub fn compute_chart_params(series: &[(f64, f64)], fallback_duration: Option<f64>) -> (f64, f64) {
    let highest_wpm = series.iter().map(|&(_, wpm)| wpm).fold(0.0, f64::max);

    let overall_duration = match series.last() {
        Some(&(t, _)) => t,
        None => fallback_duration.unwrap_or(1.0),
    }
    .max(1.0);

    (overall_duration, highest_wpm.round())
}

pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
