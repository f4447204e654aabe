//! The witcalc CLI tool

mod util;

use clap::{CommandFactory, Parser, Subcommand};
use env_logger::fmt::Color;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString, EnumVariantNames};
use witcalc_graph::{format, Graph, Node};
use witcalc_number::{Bls12_381Field, Bn254Field, FieldElement, KnownField};
use witcalc_pipeline::{vectors, Pipeline};
use witcalc_poseidon::{hash_circuit, instance};

/// Number of hash inputs of the standard Poseidon2 circuit.
const DEFAULT_HASH_INPUTS: u32 = 3;

#[derive(Clone, EnumString, EnumVariantNames, Display)]
pub enum FieldArgument {
    #[strum(serialize = "bn254")]
    Bn254,
    #[strum(serialize = "bls12_381")]
    Bls12_381,
}

#[derive(Parser)]
#[command(name = "witcalc", author, version, about, long_about = None)]
struct Cli {
    #[arg(long, hide = true)]
    markdown_help: bool,

    /// Set log filter value [ off, error, warn, info, debug, trace ]
    #[arg(long)]
    #[arg(default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Computes the witness for a compiled circuit graph and writes it as a
    /// .wtns file to the output directory.
    Calc {
        /// Input .graph file
        graph: String,

        /// The field to use
        #[arg(long)]
        #[arg(default_value_t = FieldArgument::Bn254)]
        #[arg(value_parser = clap_enum_variants!(FieldArgument))]
        field: FieldArgument,

        /// JSON file with the circuit input signals.
        #[arg(short, long)]
        inputs: Option<String>,

        /// Output directory for the witness file.
        #[arg(short, long)]
        #[arg(default_value_t = String::from("."))]
        output_directory: String,

        /// Force overwriting of the witness output file.
        #[arg(short, long)]
        #[arg(default_value_t = false)]
        force: bool,
    },

    /// Runs a suite of test vectors against a compiled circuit graph.
    /// Without a graph file, the standard Poseidon2 circuit is checked
    /// against the built-in vectors.
    Check {
        /// Input .graph file. Defaults to the standard Poseidon2 circuit.
        graph: Option<String>,

        /// The field to use
        #[arg(long)]
        #[arg(default_value_t = FieldArgument::Bn254)]
        #[arg(value_parser = clap_enum_variants!(FieldArgument))]
        field: FieldArgument,

        /// JSON file with test vectors. Defaults to the built-in Poseidon2
        /// vectors.
        #[arg(short, long)]
        vectors: Option<String>,
    },

    /// Compiles the Poseidon2 hash to a circuit graph file.
    BuildPoseidon2 {
        /// Number of hash inputs the circuit takes.
        #[arg(short, long)]
        #[arg(default_value_t = DEFAULT_HASH_INPUTS)]
        inputs_count: u32,

        /// Output directory for the .graph file.
        #[arg(short, long)]
        #[arg(default_value_t = String::from("."))]
        output_directory: String,

        /// Force overwriting of the graph output file.
        #[arg(short, long)]
        #[arg(default_value_t = false)]
        force: bool,
    },

    /// Prints details of a compiled circuit graph file.
    Inspect {
        /// Input .graph file
        graph: String,
    },
}

fn main() -> Result<(), io::Error> {
    let args = Cli::parse();

    let mut builder = Builder::new();
    builder
        .filter_level(args.log_level)
        .parse_default_env()
        .target(Target::Stdout)
        .format(|buf, record| {
            let mut style = buf.style();

            // we allocate as there is no way to look into the message otherwise
            let msg = record.args().to_string();

            // add colors for the diffs
            match &msg {
                s if s.starts_with('+') => {
                    style.set_color(Color::Green);
                }
                s if s.starts_with('-') => {
                    style.set_color(Color::Red);
                }
                _ => {}
            }

            writeln!(buf, "{}", style.value(msg))
        })
        .init();

    if args.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        Ok(())
    } else if let Some(command) = args.command {
        run_command(command);
        Ok(())
    } else {
        Cli::command().print_help()
    }
}

#[allow(clippy::print_stderr)]
fn run_command(command: Commands) {
    let result = match command {
        Commands::Calc {
            graph,
            field,
            inputs,
            output_directory,
            force,
        } => {
            call_with_field!(run_calc::<field>(graph, inputs, output_directory, force))
        }
        Commands::Check {
            graph,
            field,
            vectors,
        } => match graph {
            Some(graph) => call_with_field!(run_check::<field>(graph, vectors)),
            None => match field {
                FieldArgument::Bn254 => run_default_check(vectors),
                _ => Err(vec![
                    "The built-in Poseidon2 circuit is only defined over bn254.".to_string(),
                ]),
            },
        },
        Commands::BuildPoseidon2 {
            inputs_count,
            output_directory,
            force,
        } => run_build_poseidon2(inputs_count, output_directory, force),
        Commands::Inspect { graph } => run_inspect(&graph),
    };
    if let Err(errors) = result {
        for error in errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }
}

fn run_calc<T: FieldElement>(
    graph_file: String,
    inputs_file: Option<String>,
    output_directory: String,
    force: bool,
) -> Result<(), Vec<String>> {
    let mut pipeline = Pipeline::<T>::default()
        .with_output(PathBuf::from(output_directory), force)
        .from_graph_file(PathBuf::from(graph_file));
    if let Some(inputs_file) = inputs_file {
        pipeline = pipeline.with_inputs_file(Path::new(&inputs_file))?;
    }
    let witness = pipeline.witness()?;
    log::info!("Computed witness with {} values.", witness.len());
    Ok(())
}

fn run_check<T: FieldElement>(
    graph_file: String,
    vectors_file: Option<String>,
) -> Result<(), Vec<String>> {
    let suite = load_suite(vectors_file)?;
    let graph = Pipeline::<T>::default()
        .from_graph_file(PathBuf::from(graph_file))
        .compute_graph()?;
    vectors::run_suite(&graph, &suite)?;
    Ok(())
}

fn run_default_check(vectors_file: Option<String>) -> Result<(), Vec<String>> {
    let suite = load_suite(vectors_file)?;
    let graph = hash_circuit::<Bn254Field>(&instance::bn254_t3(), DEFAULT_HASH_INPUTS)
        .map_err(|e| vec![e])?;
    vectors::run_suite(&graph, &suite)?;
    Ok(())
}

fn load_suite(vectors_file: Option<String>) -> Result<vectors::VectorSuite, Vec<String>> {
    match vectors_file {
        Some(path) => vectors::VectorSuite::from_file(Path::new(&path)).map_err(|e| vec![e]),
        None => Ok(vectors::poseidon2_default_suite()),
    }
}

fn run_build_poseidon2(
    inputs_count: u32,
    output_directory: String,
    force: bool,
) -> Result<(), Vec<String>> {
    let graph =
        hash_circuit::<Bn254Field>(&instance::bn254_t3(), inputs_count).map_err(|e| vec![e])?;
    let path = Path::new(&output_directory).join(format!("poseidon2_{inputs_count}.graph"));
    if path.exists() && !force {
        return Err(vec![format!(
            "{} already exists! Use --force to overwrite.",
            path.to_str().unwrap()
        )]);
    }
    format::write_graph_file(&path, &graph)
        .map_err(|e| vec![format!("Error writing {}: {e}", path.to_str().unwrap())])?;
    log::info!("Wrote {}.", path.to_str().unwrap());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_inspect(graph_file: &str) -> Result<(), Vec<String>> {
    let path = Path::new(graph_file);
    let serialized = format::SerializedGraph::deserialize_from(path)
        .map_err(|e| vec![format!("Error reading graph file {}:\n{e}", path.display())])?;
    println!("format version: {}", serialized.version());
    println!("field:          {}", serialized.field());
    match serialized.field() {
        KnownField::Bn254 => print_graph_stats::<Bn254Field>(serialized),
        KnownField::Bls12_381 => print_graph_stats::<Bls12_381Field>(serialized),
    }
}

#[allow(clippy::print_stdout)]
fn print_graph_stats<T: FieldElement>(
    serialized: format::SerializedGraph,
) -> Result<(), Vec<String>> {
    let graph = Graph::<T>::try_from(serialized).map_err(|e| vec![e.to_string()])?;
    let mut constants = 0;
    let mut inputs = 0;
    let mut operations = 0;
    for node in &graph.nodes {
        match node {
            Node::Constant(_) => constants += 1,
            Node::Input { .. } => inputs += 1,
            Node::Unary { .. } | Node::Binary { .. } => operations += 1,
        }
    }
    println!(
        "nodes:          {} ({constants} constants, {inputs} inputs, {operations} operations)",
        graph.nodes.len()
    );
    println!("witness length: {}", graph.witness.len());
    println!("inputs:");
    for (name, range) in &graph.inputs {
        println!("  {name}: {} component(s)", range.len);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{run_command, Commands, FieldArgument};

    use std::fs;

    #[test]
    fn build_calc_check_inspect() {
        let output_dir = tempfile::tempdir().unwrap();
        let output_dir_str = output_dir.path().to_string_lossy().to_string();

        run_command(Commands::BuildPoseidon2 {
            inputs_count: 3,
            output_directory: output_dir_str.clone(),
            force: false,
        });
        let graph_file = output_dir.path().join("poseidon2_3.graph");
        assert!(graph_file.exists());

        let inputs_file = output_dir.path().join("inputs.json");
        fs::write(&inputs_file, r#"{"in": [1, 2, 3]}"#).unwrap();

        run_command(Commands::Calc {
            graph: graph_file.to_string_lossy().to_string(),
            field: FieldArgument::Bn254,
            inputs: Some(inputs_file.to_string_lossy().to_string()),
            output_directory: output_dir_str.clone(),
            force: false,
        });
        assert!(output_dir.path().join("poseidon2_3.wtns").exists());

        run_command(Commands::Check {
            graph: Some(graph_file.to_string_lossy().to_string()),
            field: FieldArgument::Bn254,
            vectors: None,
        });

        run_command(Commands::Inspect {
            graph: graph_file.to_string_lossy().to_string(),
        });
    }

    #[test]
    fn default_check() {
        run_command(Commands::Check {
            graph: None,
            field: FieldArgument::Bn254,
            vectors: None,
        });
    }

    #[test]
    fn check_against_vectors_file() {
        let output_dir = tempfile::tempdir().unwrap();
        let vectors_file = output_dir.path().join("vectors.json");
        fs::write(
            &vectors_file,
            r#"{
                "cases": [
                    {
                        "inputs": {"in": [0]},
                        "expected": "0x1e21e979cc3fd844b88c2016fd18f4db07a698aa27deca67ca509f5b0a4480d0"
                    }
                ]
            }"#,
        )
        .unwrap();

        run_command(Commands::BuildPoseidon2 {
            inputs_count: 1,
            output_directory: output_dir.path().to_string_lossy().to_string(),
            force: false,
        });
        run_command(Commands::Check {
            graph: Some(
                output_dir
                    .path()
                    .join("poseidon2_1.graph")
                    .to_string_lossy()
                    .to_string(),
            ),
            field: FieldArgument::Bn254,
            vectors: Some(vectors_file.to_string_lossy().to_string()),
        });
    }
}
