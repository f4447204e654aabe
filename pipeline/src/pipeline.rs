use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    rc::Rc,
    time::Instant,
};

use log::Level;
use witcalc_executor::{
    witgen::{Witness, WitnessGenerator},
    wtns,
};
use witcalc_graph::{format, Graph};
use witcalc_number::{buffered_write_file, FieldElement};

use crate::inputs;

/// A generated witness and the graph it was computed from.
#[derive(Clone)]
pub struct GeneratedWitness<T: FieldElement> {
    pub graph: Rc<Graph<T>>,
    pub witness: Rc<Witness<T>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    GraphFilePath,
    Graph,
    GeneratedWitness,
}

#[derive(Clone)]
pub enum Artifact<T: FieldElement> {
    /// The path to a compiled .graph file.
    GraphFilePath(PathBuf),
    /// A loaded and validated circuit graph.
    Graph(Rc<Graph<T>>),
    /// The generated witness, together with the graph it belongs to.
    GeneratedWitness(GeneratedWitness<T>),
}

// These are implementations of specific artifacts we want to retrieve
// from Pipeline, in a way that allows us to get immutable references
// to the artifacts.
impl<T: FieldElement> Artifact<T> {
    pub fn to_graph(&self) -> Option<&Graph<T>> {
        match self {
            Artifact::Graph(graph) => Some(graph),
            Artifact::GeneratedWitness(generated_witness) => Some(&generated_witness.graph),
            _ => None,
        }
    }

    pub fn to_generated_witness(&self) -> Option<&GeneratedWitness<T>> {
        match self {
            Artifact::GeneratedWitness(generated_witness) => Some(generated_witness),
            _ => None,
        }
    }
}

/// Optional Arguments for various stages of the pipeline.
#[derive(Default, Clone)]
struct Arguments<T: FieldElement> {
    /// Input signal values for witness generation.
    inputs: BTreeMap<String, Vec<T>>,
}

#[derive(Clone)]
pub struct Pipeline<T: FieldElement> {
    /// The current artifact. It is never None in practice, making it an Option is
    /// only necessary so that we can take ownership of it in advance().
    artifact: Option<Artifact<T>>,
    /// Output directory for generated files. If None, no files are written.
    output_dir: Option<PathBuf>,
    /// The name of the pipeline. Used to name output files.
    name: Option<String>,
    /// Whether to overwrite existing files. If false, an error is returned if a file
    /// already exists.
    force_overwrite: bool,
    /// The log level to use for this pipeline.
    log_level: Level,
    /// Optional arguments for various stages of the pipeline.
    arguments: Arguments<T>,
}

impl<T> Default for Pipeline<T>
where
    T: FieldElement,
{
    fn default() -> Self {
        Pipeline {
            artifact: None,
            output_dir: None,
            log_level: Level::Debug,
            name: None,
            force_overwrite: false,
            arguments: Arguments::default(),
        }
    }
}

/// A witcalc pipeline, going from a compiled circuit graph to a witness.
///
/// The pipeline steps are:
/// ```mermaid
///  graph TD
///      GraphFilePath --> Graph
///      Graph --> GeneratedWitness
/// ```
///
/// # Example
/// ```rust
/// use witcalc_pipeline::{Pipeline, Stage};
/// use witcalc_number::Bn254Field;
///
/// let mut pipeline = Pipeline::<Bn254Field>::default()
///   .from_graph(witcalc_poseidon::hash_circuit(&witcalc_poseidon::instance::bn254_t3(), 2).unwrap())
///   .add_input("in", vec![Bn254Field::from(1), Bn254Field::from(2)]);
///
/// // Advance to some stage (which might have side effects)
/// pipeline.advance_to(Stage::GeneratedWitness).unwrap();
///
/// // Get the result
/// let witness = pipeline.witness().unwrap();
/// ```
impl<T: FieldElement> Pipeline<T> {
    /// Initializes the output directory to a temporary directory.
    /// Note that the user is responsible for keeping the temporary directory alive.
    pub fn with_tmp_output(self, tmp_dir: &mktemp::Temp) -> Self {
        Pipeline {
            output_dir: Some(tmp_dir.to_path_buf()),
            ..self
        }
    }

    pub fn with_output(self, output_dir: PathBuf, force_overwrite: bool) -> Self {
        Pipeline {
            output_dir: Some(output_dir),
            force_overwrite,
            ..self
        }
    }

    /// Sets the values of a single input signal for witness generation.
    pub fn add_input(mut self, name: &str, values: Vec<T>) -> Self {
        assert!(
            self.arguments
                .inputs
                .insert(name.to_string(), values)
                .is_none(),
            "Duplicate input signal name: {name}"
        );
        self
    }

    pub fn with_inputs(mut self, inputs: BTreeMap<String, Vec<T>>) -> Self {
        for (name, values) in inputs {
            self = self.add_input(&name, values);
        }
        self
    }

    /// Reads input signal values from a JSON file.
    pub fn with_inputs_file(self, inputs_file: &Path) -> Result<Self, Vec<String>> {
        let inputs = inputs::read_inputs_file(inputs_file).map_err(|e| vec![e])?;
        Ok(self.with_inputs(inputs))
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn from_graph_file(self, graph_file: PathBuf) -> Self {
        let name = self.name.or(Some(Self::name_from_path(&graph_file)));
        Pipeline {
            artifact: Some(Artifact::GraphFilePath(graph_file)),
            name,
            ..self
        }
    }

    pub fn from_graph(self, graph: Graph<T>) -> Self {
        let name = self.name.or(Some("circuit".to_string()));
        Pipeline {
            artifact: Some(Artifact::Graph(Rc::new(graph))),
            name,
            ..self
        }
    }

    fn name_from_path(path: &Path) -> String {
        path.file_stem().unwrap().to_str().unwrap().to_string()
    }

    fn log(&self, msg: &str) {
        log::log!(self.log_level, "{}", msg);
    }

    fn advance(&mut self) -> Result<(), Vec<String>> {
        let artifact = std::mem::take(&mut self.artifact).unwrap();
        self.artifact = Some(match artifact {
            Artifact::GraphFilePath(path) => {
                self.log(&format!("Reading graph file {}", path.display()));
                let graph = format::read_graph_file::<T>(&path).map_err(|e| {
                    vec![format!("Error reading graph file {}:\n{e}", path.display())]
                })?;
                Artifact::Graph(Rc::new(graph))
            }
            Artifact::Graph(graph) => {
                self.log("Computing witness...");
                let start = Instant::now();
                let inputs = std::mem::take(&mut self.arguments.inputs);
                let witness = WitnessGenerator::new(&graph)
                    .with_inputs(inputs)
                    .generate()
                    .map_err(|e| vec![format!("Error computing witness:\n{e}")])?;
                self.log(&format!("Took {}", start.elapsed().as_secs_f32()));

                let witness = Rc::new(witness);
                self.maybe_write_witness(&witness)?;
                Artifact::GeneratedWitness(GeneratedWitness { graph, witness })
            }
            Artifact::GeneratedWitness(_) => panic!("Last pipeline step!"),
        });
        Ok(())
    }

    /// Returns the path to the output file if the output directory is set.
    /// Fails if the file already exists and `force_overwrite` is false.
    fn path_if_should_write<F: FnOnce(&str) -> String>(
        &self,
        file_name_from_pipeline_name: F,
    ) -> Result<Option<PathBuf>, Vec<String>> {
        self.output_dir
            .as_ref()
            .map(|output_dir| {
                let name = self
                    .name
                    .as_ref()
                    .expect("name must be set if output_dir is set");
                let path = output_dir.join(file_name_from_pipeline_name(name));
                if path.exists() && !self.force_overwrite {
                    Err(vec![format!(
                        "{} already exists! Use --force to overwrite.",
                        path.to_str().unwrap()
                    )])?;
                }
                log::info!("Writing {}.", path.to_str().unwrap());
                Ok(path)
            })
            .transpose()
    }

    fn maybe_write_witness(&self, witness: &Witness<T>) -> Result<(), Vec<String>> {
        if let Some(path) = self.path_if_should_write(|name| format!("{name}.wtns"))? {
            buffered_write_file(&path, |writer| wtns::write_wtns(writer, witness.values()))
                .map_err(|e| vec![format!("Error writing {}: {e}", path.to_str().unwrap())])?
                .map_err(|e| vec![format!("Error writing {}: {e}", path.to_str().unwrap())])?;
        }
        Ok(())
    }

    fn stage(&self) -> Stage {
        match self.artifact.as_ref().unwrap() {
            Artifact::GraphFilePath(_) => Stage::GraphFilePath,
            Artifact::Graph(_) => Stage::Graph,
            Artifact::GeneratedWitness(_) => Stage::GeneratedWitness,
        }
    }

    pub fn advance_to(&mut self, target_stage: Stage) -> Result<(), Vec<String>> {
        while self.stage() != target_stage {
            self.advance()?;
        }
        Ok(())
    }

    pub fn compute_graph(mut self) -> Result<Rc<Graph<T>>, Vec<String>> {
        self.advance_to(Stage::Graph)?;
        let Some(Artifact::Graph(graph)) = self.artifact else {
            panic!()
        };
        Ok(graph)
    }

    pub fn compute_graph_ref(&mut self) -> Result<&Graph<T>, Vec<String>> {
        self.advance_to(Stage::Graph)?;
        match self.artifact.as_ref().unwrap() {
            Artifact::Graph(graph) => Ok(graph),
            _ => panic!(),
        }
    }

    pub fn generated_witness(mut self) -> Result<GeneratedWitness<T>, Vec<String>> {
        self.advance_to(Stage::GeneratedWitness)?;
        let Some(Artifact::GeneratedWitness(generated_witness)) = self.artifact else {
            panic!()
        };
        Ok(generated_witness)
    }

    pub fn witness(mut self) -> Result<Rc<Witness<T>>, Vec<String>> {
        self.advance_to(Stage::GeneratedWitness)?;
        let Some(Artifact::GeneratedWitness(generated_witness)) = self.artifact else {
            panic!()
        };
        Ok(generated_witness.witness)
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_ref().map(|p| p.as_ref())
    }

    pub fn name(&self) -> &str {
        self.name.as_ref().unwrap()
    }

    pub fn artifact(&self) -> Option<&Artifact<T>> {
        self.artifact.as_ref()
    }
}
