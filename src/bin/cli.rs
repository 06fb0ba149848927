use clap::Parser;
use meshgrad::catalog::{builtin_examples, Catalog};
use meshgrad::json::to_json_safe;
use meshgrad::mesh::{Domain, MeshSpec};
use meshgrad::pipeline::{calculate_derivatives, ExampleSpec};
use std::io::Write;
use std::process;

#[derive(Parser)]
#[command(name = "meshgrad")]
#[command(about = "Validate central-difference partial derivatives against analytical ones")]
#[command(version)]
struct Args {
    /// Function f(x, y) to differentiate; defaults to the built-in catalog
    expression: Option<String>,

    /// Analytical df/dx for validation
    #[arg(long, requires = "expression")]
    dx: Option<String>,

    /// Analytical df/dy for validation
    #[arg(long, requires = "expression")]
    dy: Option<String>,

    /// Domain bounds as x_min,x_max,y_min,y_max
    #[arg(long, default_value = "-2,2,-2,2", value_delimiter = ',')]
    domain: Vec<f64>,

    /// Mesh points as nx,ny
    #[arg(long, default_value = "100,100", value_delimiter = ',')]
    mesh: Vec<usize>,

    /// Dump the guarded JSON payload of the example with this catalog id
    /// (or of the one-off expression) instead of the summary
    #[arg(long)]
    json: Option<Option<u32>>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let specs = match &args.expression {
        Some(expression) => {
            if args.domain.len() != 4 {
                return Err("expected --domain x_min,x_max,y_min,y_max".into());
            }
            if args.mesh.len() != 2 {
                return Err("expected --mesh nx,ny".into());
            }
            vec![ExampleSpec {
                id: 1,
                name: expression.clone(),
                description: String::new(),
                function: expression.clone(),
                analytical_dx: args.dx.clone().ok_or("--dx is required")?,
                analytical_dy: args.dy.clone().ok_or("--dy is required")?,
                domain: Domain {
                    x_min: args.domain[0],
                    x_max: args.domain[1],
                    y_min: args.domain[2],
                    y_max: args.domain[3],
                },
                mesh: MeshSpec {
                    nx: args.mesh[0],
                    ny: args.mesh[1],
                },
            }]
        }
        None => builtin_examples(),
    };

    match args.json {
        Some(id) => {
            let spec = match id {
                Some(id) => specs
                    .iter()
                    .find(|s| s.id == id)
                    .ok_or_else(|| format!("no example with id {}", id))?,
                None => specs.first().ok_or("empty catalog")?,
            };
            let example = calculate_derivatives(spec)?;
            let bytes = to_json_safe(&example)?;
            std::io::stdout().write_all(&bytes)?;
            println!();
        }
        None => {
            let catalog = Catalog::precompute(&specs)?;
            catalog.print_summary();
        }
    }
    Ok(())
}
