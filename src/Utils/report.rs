use crate::numerical::root_result::{RootResult, RootValue};
use crate::numerical::roots_api::{Equation, MethodParams};
use tabled::{builder::Builder, settings::Style};

/// Column headers and rows of the iteration trace. A pair trace gets a `y` column and,
/// when any iteration ran a step size search, the search columns.
pub fn trace_rows(result: &RootResult) -> (Vec<String>, Vec<Vec<String>>) {
    let pair = matches!(result.value, RootValue::Pair { .. });
    let line_search = result.trace.iter().any(|r| r.line_search.is_some());
    let mut headers = vec!["iteration".to_string(), "x".to_string()];
    if pair {
        headers.push("y".to_string());
    }
    headers.push("step".to_string());
    headers.push("residual".to_string());
    if line_search {
        headers.push("step_size".to_string());
        headers.push("halvings".to_string());
        headers.push("trial_residual".to_string());
    }

    let rows = result
        .trace
        .iter()
        .map(|record| {
            let mut row = vec![record.iteration.to_string()];
            match record.point {
                RootValue::Scalar(x) => row.push(x.to_string()),
                RootValue::Pair { x, y } => {
                    row.push(x.to_string());
                    row.push(y.to_string());
                }
            }
            row.push(format!("{:e}", record.step));
            row.push(format!("{:e}", record.residual));
            if line_search {
                match record.line_search {
                    Some(search) => {
                        row.push(search.step_size.to_string());
                        row.push(search.halvings.to_string());
                        row.push(format!("{:e}", search.trial_residual));
                    }
                    None => row.extend(std::iter::repeat_n(String::new(), 3)),
                }
            }
            row
        })
        .collect();
    (headers, rows)
}

/// Summary of one solve as a two-column table
pub fn summary_table(equation: &Equation, params: &MethodParams, result: &RootResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(["method".to_string(), result.method.title().to_string()]);
    match equation {
        Equation::Single(e) => builder.push_record(["equation".to_string(), e.clone()]),
        Equation::Pair(first, second) => {
            builder.push_record(["equation 1".to_string(), first.clone()]);
            builder.push_record(["equation 2".to_string(), second.clone()]);
        }
    }
    builder.push_record(["parameters".to_string(), params.to_string()]);
    match result.value {
        RootValue::Scalar(x) => builder.push_record(["x".to_string(), x.to_string()]),
        RootValue::Pair { x, y } => {
            builder.push_record(["x".to_string(), x.to_string()]);
            builder.push_record(["y".to_string(), y.to_string()]);
        }
    }
    builder.push_record(["iterations".to_string(), result.iterations.to_string()]);
    builder.push_record([
        "final residual".to_string(),
        format!("{:e}", result.final_residual),
    ]);
    builder.push_record(["status".to_string(), result.status.to_string()]);
    if let Some(bracket) = result.bracket {
        builder.push_record([
            "sign changes in [a, b]".to_string(),
            bracket.sign_changes.to_string(),
        ]);
        if bracket.endpoints_same_sign {
            builder.push_record([
                "warning".to_string(),
                "f(a) and f(b) have the same sign".to_string(),
            ]);
        }
        if bracket.may_hold_several_roots() {
            builder.push_record([
                "warning".to_string(),
                "more than one root may lie in [a, b]".to_string(),
            ]);
        }
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn trace_table(result: &RootResult) -> String {
    let (headers, rows) = trace_rows(result);
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// Text printed to the user after a solve
pub fn render_report(
    equation: &Equation,
    params: &MethodParams,
    result: &RootResult,
    show_trace: bool,
) -> String {
    let mut report = summary_table(equation, params, result);
    if show_trace && !result.trace.is_empty() {
        report.push_str("\n\n ITERATIONS \n");
        report.push_str(&trace_table(result));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::roots_api::solve;

    fn chord_run(a: f64, b: f64) -> (Equation, MethodParams, RootResult) {
        let equation = Equation::single("x^2 - 5 = 0");
        let params = MethodParams::Chord {
            a,
            b,
            eps: 1e-8,
            max_iter: 100,
        };
        let result = solve(&equation, &params).unwrap();
        (equation, params, result)
    }

    #[test]
    fn test_scalar_trace_rows() {
        let (_, _, result) = chord_run(2.0, 3.0);
        let (headers, rows) = trace_rows(&result);
        assert_eq!(headers, vec!["iteration", "x", "step", "residual"]);
        assert_eq!(rows.len(), result.iterations);
        assert!(rows.iter().all(|row| row.len() == headers.len()));
        assert_eq!(rows[0][0], "1");
    }

    #[test]
    fn test_pair_trace_rows() {
        let equation = Equation::pair("x^2 + y^2 -1 = 0", "x^3 - y = 0");
        let params = MethodParams::SystemFixedPoint {
            alpha: -2.0,
            x0: -1.0,
            y0: -1.0,
            eps: 1e-6,
            max_iter: 200,
        };
        let result = solve(&equation, &params).unwrap();
        let (headers, rows) = trace_rows(&result);
        assert_eq!(
            headers,
            vec![
                "iteration",
                "x",
                "y",
                "step",
                "residual",
                "step_size",
                "halvings",
                "trial_residual"
            ]
        );
        assert!(rows.iter().all(|row| row.len() == 8));
    }

    #[test]
    fn test_report_contents() {
        let (equation, params, result) = chord_run(2.0, 3.0);
        let report = render_report(&equation, &params, &result, true);
        assert!(report.contains("Chord method"));
        assert!(report.contains("x^2 - 5 = 0"));
        assert!(report.contains("converged"));
        assert!(report.contains("ITERATIONS"));
        let short = render_report(&equation, &params, &result, false);
        assert!(!short.contains("ITERATIONS"));
    }

    #[test]
    fn test_report_bracket_warning() {
        let (equation, params, result) = chord_run(3.0, 4.0);
        let report = summary_table(&equation, &params, &result);
        assert!(report.contains("same sign"));
        assert!(!report.contains("more than one root"));
        let (equation, params, result) = chord_run(-3.0, 2.9);
        let report = summary_table(&equation, &params, &result);
        assert_eq!(result.bracket.map(|b| b.sign_changes), Some(2));
        assert!(report.contains("more than one root may lie in [a, b]"));
    }
}
