//! The precomputed example catalog.
//!
//! A [`Catalog`] is the "compute once, serve many" value of the crate: an
//! ordered, immutable collection of [`Example`] records produced at process
//! startup and handed by reference to whatever layer serves them. There is
//! no hidden global — callers own the catalog and share it read-only.
//!
//! Two precomputation policies are provided, since which one applies is a
//! caller decision: [`Catalog::precompute`] fails fast on the first broken
//! example, while [`Catalog::precompute_lenient`] skips broken examples
//! with a console warning.
//!
//! Examples are independent of each other, so precomputation runs them in
//! parallel with rayon, one task per example, collecting in catalog order.

use colored::Colorize;
use itertools::Itertools;
use rayon::prelude::*;

use crate::errors::PipelineError;
use crate::mesh::{Domain, MeshSpec};
use crate::pipeline::{calculate_derivatives, Example, ExampleSpec};

/// The built-in example catalog: four functions with known analytical
/// derivatives, each over a 100×100 mesh.
pub fn builtin_examples() -> Vec<ExampleSpec> {
    vec![
        ExampleSpec {
            id: 1,
            name: "Sine waves".to_string(),
            description: "Product of trigonometric functions forming a 2-D wave pattern."
                .to_string(),
            function: "sin(x)*cos(y)".to_string(),
            analytical_dx: "cos(x)*cos(y)".to_string(),
            analytical_dy: "-sin(x)*sin(y)".to_string(),
            domain: Domain {
                x_min: -2.0,
                x_max: 2.0,
                y_min: -2.0,
                y_max: 2.0,
            },
            mesh: MeshSpec { nx: 100, ny: 100 },
        },
        ExampleSpec {
            id: 2,
            name: "Paraboloid".to_string(),
            description: "Upward-opening parabolic surface, common in optimization problems."
                .to_string(),
            function: "x^2 + y^2".to_string(),
            analytical_dx: "2*x".to_string(),
            analytical_dy: "2*y".to_string(),
            domain: Domain {
                x_min: -3.0,
                x_max: 3.0,
                y_min: -3.0,
                y_max: 3.0,
            },
            mesh: MeshSpec { nx: 100, ny: 100 },
        },
        ExampleSpec {
            id: 3,
            name: "Saddle".to_string(),
            description: "Saddle point with positive curvature in one direction and negative in the other."
                .to_string(),
            function: "x^2 - y^2".to_string(),
            analytical_dx: "2*x".to_string(),
            analytical_dy: "-2*y".to_string(),
            domain: Domain {
                x_min: -2.0,
                x_max: 2.0,
                y_min: -2.0,
                y_max: 2.0,
            },
            mesh: MeshSpec { nx: 100, ny: 100 },
        },
        ExampleSpec {
            id: 4,
            name: "Gaussian".to_string(),
            description: "Bell-shaped surface multiplied by x, typical in statistics and physics."
                .to_string(),
            function: "x*exp(-x^2 - y^2)".to_string(),
            analytical_dx: "(1 - 2*x^2)*exp(-x^2 - y^2)".to_string(),
            analytical_dy: "-2*x*y*exp(-x^2 - y^2)".to_string(),
            domain: Domain {
                x_min: -3.0,
                x_max: 3.0,
                y_min: -3.0,
                y_max: 3.0,
            },
            mesh: MeshSpec { nx: 100, ny: 100 },
        },
    ]
}

/// An immutable, ordered collection of computed examples.
#[derive(Debug)]
pub struct Catalog {
    examples: Vec<Example>,
}

impl Catalog {
    /// Computes every example, aborting on the first failure.
    ///
    /// Examples are computed in parallel (they share no state) and collected
    /// in catalog order.
    pub fn precompute(specs: &[ExampleSpec]) -> Result<Self, PipelineError> {
        let examples = specs
            .par_iter()
            .map(calculate_derivatives)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { examples })
    }

    /// Computes every example, skipping failures with a console warning.
    pub fn precompute_lenient(specs: &[ExampleSpec]) -> Self {
        let examples = specs
            .par_iter()
            .map(|spec| (spec, calculate_derivatives(spec)))
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|(spec, result)| match result {
                Ok(example) => Some(example),
                Err(err) => {
                    eprintln!(
                        "{} skipping example '{}': {}",
                        "warning:".yellow().bold(),
                        spec.name,
                        render_chain(&err),
                    );
                    None
                }
            })
            .collect();
        Self { examples }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Looks up an example by its catalog id.
    pub fn get(&self, id: u32) -> Option<&Example> {
        self.examples.iter().find(|e| e.spec.id == id)
    }

    /// Renders the per-example validation summary emitted at startup:
    /// name, max absolute error and RMSE for each derivative direction.
    pub fn summary(&self) -> String {
        self.examples
            .iter()
            .map(|example| {
                let dx = &example.validation_dx;
                let dy = &example.validation_dy;
                let flag = if dx.degenerate || dy.degenerate {
                    format!(" {}", "[degenerate validation]".yellow())
                } else {
                    String::new()
                };
                format!(
                    "{} {} ({}){}\n    {}  max_abs = {:.3e}, rmse = {:.3e}\n    {}  max_abs = {:.3e}, rmse = {:.3e}",
                    format!("[{}]", example.spec.id).cyan(),
                    example.spec.name.bold(),
                    example.spec.function,
                    flag,
                    "df/dx".green(),
                    dx.max_abs_error,
                    dx.rmse,
                    "df/dy".green(),
                    dy.max_abs_error,
                    dy.rmse,
                )
            })
            .join("\n")
    }

    /// Prints the validation summary to stdout.
    pub fn print_summary(&self) {
        println!("{}", self.summary());
    }
}

/// Renders an error with its source chain, so the failing stage is visible.
fn render_chain(err: &PipelineError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
