// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::report::render_report;
use crate::numerical::nonlinear_functions::{ClosureFunction, ClosureSystem};
use crate::numerical::roots_api::{Equation, MethodParams, solve};
use crate::numerical::scalar_roots::{RootFindingConfig, ScalarRootFinder};
use crate::numerical::system_roots::SystemRootFinder;
use nalgebra::Vector2;

pub fn roots_examples(example: usize) {
    match example {
        0 => {
            // one equation, every scalar method through the api
            let equation = Equation::single("x^2 - 5 = 0");
            let all_params = [
                MethodParams::Chord {
                    a: 2.0,
                    b: 3.0,
                    eps: 1e-8,
                    max_iter: 100,
                },
                MethodParams::Newton {
                    x0: 2.0,
                    eps: 1e-10,
                    max_iter: 50,
                },
                MethodParams::ScalarFixedPoint {
                    alpha: 0.1,
                    x0: 2.0,
                    eps: 1e-8,
                    max_iter: 100,
                },
            ];
            for params in all_params {
                match solve(&equation, &params) {
                    Ok(result) => println!("{}\n", render_report(&equation, &params, &result, false)),
                    Err(e) => println!("{}", e),
                }
            }
        }
        1 => {
            // closure with a hand-written derivative, no parsing involved
            let f = ClosureFunction::new(|x: f64| x.cos() - x, "cos(x) - x")
                .with_derivative(|x: f64| -x.sin() - 1.0);
            let solver = ScalarRootFinder::with_config(RootFindingConfig {
                tolerance: 1e-12,
                max_iterations: 50,
            });
            match solver.newton(&f, 1.0) {
                Ok(result) => println!("{}", result),
                Err(e) => println!("{}", e),
            }
        }
        2 => {
            // pair of equations with the trace printed
            let system = Equation::pair("x^2 + y^2 -1 = 0", "x^3 - y = 0");
            let params = MethodParams::SystemFixedPoint {
                alpha: -2.0,
                x0: -1.0,
                y0: -1.0,
                eps: 1e-6,
                max_iter: 200,
            };
            match solve(&system, &params) {
                Ok(result) => println!("{}", render_report(&system, &params, &result, true)),
                Err(e) => println!("{}", e),
            }
        }
        3 => {
            let system = ClosureSystem::new(
                |x: f64, y: f64| (x - 0.25 * y - 1.0, y - 0.25 * x - 1.0),
                "x - y/4 = 1, y - x/4 = 1",
            );
            let solver = SystemRootFinder::with_config(RootFindingConfig {
                tolerance: 1e-10,
                max_iterations: 500,
            });
            match solver.damped_fixed_point(&system, 0.5, Vector2::new(0.0, 0.0)) {
                Ok(result) => println!("{}", result),
                Err(e) => println!("{}", e),
            }
        }
        _ => println!("no example with number {}", example),
    }
}
