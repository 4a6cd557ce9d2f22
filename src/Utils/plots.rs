use crate::numerical::nonlinear_functions::{NonlinearFunction, SymbolicSystem};
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Sampling domains and picture size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSettings {
    pub x_range: (f64, f64),
    pub samples: usize,
    /// square domain of the zero-contour picture
    pub xy_range: (f64, f64),
    pub grid: usize,
    pub size: (u32, u32),
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            x_range: (-10.0, 10.0),
            samples: 400,
            xy_range: (-3.0, 3.0),
            grid: 200,
            size: (800, 600),
        }
    }
}

fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let h = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| if i + 1 == n { end } else { start + h * i as f64 })
}

/// Samples of `f` on `[x_range.0, x_range.1]`, split into segments at points where `f`
/// cannot be evaluated so the curve is not drawn across gaps.
pub fn sample_curve<F: NonlinearFunction + ?Sized>(
    function: &F,
    x_range: (f64, f64),
    samples: usize,
) -> Vec<Vec<(f64, f64)>> {
    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for x in linspace(x_range.0, x_range.1, samples) {
        match function.evaluate(x) {
            Ok(y) => current.push((x, y)),
            Err(_) => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Centers of the grid cells where `g` changes sign, i.e. cells crossed by the curve
/// `g(x, y) = 0`. Corners where `g` is undefined are ignored.
pub fn zero_contour_cells<G>(g: G, xy_range: (f64, f64), grid: usize) -> Vec<(f64, f64)>
where
    G: Fn(f64, f64) -> Option<f64>,
{
    if grid == 0 {
        return Vec::new();
    }
    let nodes: Vec<f64> = linspace(xy_range.0, xy_range.1, grid + 1).collect();
    // values[j][i] = g(nodes[i], nodes[j])
    let values: Vec<Vec<Option<f64>>> = nodes
        .iter()
        .map(|&y| nodes.iter().map(|&x| g(x, y)).collect())
        .collect();
    let mut cells = Vec::new();
    for j in 0..grid {
        for i in 0..grid {
            let corners = [
                values[j][i],
                values[j][i + 1],
                values[j + 1][i],
                values[j + 1][i + 1],
            ];
            let positive = corners.iter().flatten().any(|&v| v > 0.0);
            let negative = corners.iter().flatten().any(|&v| v < 0.0);
            let zero = corners.iter().flatten().any(|&v| v == 0.0);
            if (positive && negative) || zero {
                cells.push((
                    0.5 * (nodes[i] + nodes[i + 1]),
                    0.5 * (nodes[j] + nodes[j + 1]),
                ));
            }
        }
    }
    cells
}

fn value_bounds(segments: &[Vec<(f64, f64)>]) -> (f64, f64) {
    let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
    for &(_, y) in segments.iter().flatten() {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if y_max - y_min <= f64::EPSILON {
        (y_min - 1.0, y_max + 1.0)
    } else {
        let margin = 0.05 * (y_max - y_min);
        (y_min - margin, y_max + margin)
    }
}

/// Graph of one equation with the zero line and the found root
pub fn plot_equation<F: NonlinearFunction + ?Sized>(
    function: &F,
    root: Option<f64>,
    filename: &Path,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let segments = sample_curve(function, settings.x_range, settings.samples);
    if segments.is_empty() {
        return Err(format!("{} has no finite values to plot", function.name()).into());
    }
    let (x_min, x_max) = settings.x_range;
    let (y_min, y_max) = value_bounds(&segments);

    let root_area = BitMapBackend::new(filename, settings.size).into_drawing_area();
    root_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption(function.name(), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().x_desc("x").y_desc("f(x)").draw()?;

    chart.draw_series(LineSeries::new(vec![(x_min, 0.0), (x_max, 0.0)], &BLACK))?;
    for (i, segment) in segments.into_iter().enumerate() {
        let series = chart.draw_series(LineSeries::new(segment, &BLUE))?;
        if i == 0 {
            series
                .label("f(x)")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
        }
    }
    if let Some(x) = root.filter(|x| x.is_finite() && *x >= x_min && *x <= x_max) {
        chart
            .draw_series(std::iter::once(Circle::new((x, 0.0), 5, RED.filled())))?
            .label(format!("root x = {:.6}", x))
            .legend(|(x, y)| Circle::new((x, y), 4, RED.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}

/// Zero contours of both equations of a system with the found root
pub fn plot_system(
    system: &SymbolicSystem,
    root: Option<(f64, f64)>,
    filename: &Path,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let (lo, hi) = settings.xy_range;
    let colors = [BLUE, GREEN];

    let root_area = BitMapBackend::new(filename, settings.size).into_drawing_area();
    root_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption("zero contours", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(lo..hi, lo..hi)?;
    chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

    for (index, (expr, color)) in system.expressions().iter().zip(colors).enumerate() {
        let cells = zero_contour_cells(
            |x, y| system.evaluate_component(index, x, y),
            settings.xy_range,
            settings.grid,
        );
        chart
            .draw_series(cells.into_iter().map(|p| Circle::new(p, 1, color.filled())))?
            .label(format!("{} = 0", expr))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    if let Some((x, y)) = root.filter(|(x, y)| x.is_finite() && y.is_finite()) {
        chart
            .draw_series(std::iter::once(Circle::new((x, y), 5, RED.filled())))?
            .label(format!("root ({:.6}, {:.6})", x, y))
            .legend(|(x, y)| Circle::new((x, y), 4, RED.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::nonlinear_functions::SymbolicFunction;

    #[test]
    fn test_sample_curve() {
        let f = SymbolicFunction::from_equation("x^2 - 5 = 0").unwrap();
        let segments = sample_curve(&f, (-10.0, 10.0), 400);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 400);
        assert_eq!(segments[0][0], (-10.0, 95.0));
        assert_eq!(segments[0][399].0, 10.0);
    }

    #[test]
    fn test_sample_curve_skips_undefined_points() {
        let f = SymbolicFunction::from_equation("ln(x) = 0").unwrap();
        let segments = sample_curve(&f, (-10.0, 10.0), 400);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].iter().all(|&(x, _)| x > 0.0));
        assert_eq!(segments[0].len(), 200);
    }

    #[test]
    fn test_zero_contour_of_circle() {
        let cells = zero_contour_cells(|x, y| Some(x * x + y * y - 1.0), (-3.0, 3.0), 200);
        assert!(!cells.is_empty());
        let half_diagonal = 6.0 / 200.0;
        for (x, y) in cells {
            assert!(((x * x + y * y).sqrt() - 1.0).abs() < half_diagonal);
        }
    }

    #[test]
    fn test_zero_contour_of_system() {
        let system = SymbolicSystem::from_equations("x^2 + y^2 -1 = 0", "x^3 - y = 0").unwrap();
        let cells = zero_contour_cells(|x, y| system.evaluate_component(1, x, y), (-3.0, 3.0), 60);
        assert!(!cells.is_empty());
        for (x, y) in cells {
            assert!((x.powi(3) - y).abs() < 3.0);
        }
        assert!(zero_contour_cells(|_, _| None, (-1.0, 1.0), 10).is_empty());
    }

    #[test]
    fn test_value_bounds_include_zero() {
        let (lo, hi) = value_bounds(&[vec![(0.0, 3.0), (1.0, 5.0)]]);
        assert!(lo < 0.0 && hi > 5.0);
        let (lo, hi) = value_bounds(&[vec![(0.0, 0.0)]]);
        assert_eq!((lo, hi), (-1.0, 1.0));
    }
}
