use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};

use treecount::activation::parse_activation;
use treecount::parser::read_tree_file;
use treecount::project::Project;
use treecount::structure::{parse_path, StructureQueryTool, TreeId, TreeStructure, PATH_SEPARATOR};
use treecount::tree::{
    adjacency_bounds, edge_bounds, label_occurrence_bounds, normalize_literals, Path as TreePath,
    Tree,
};

/// treecount - path-count aggregation and queries over parsed syntax trees
#[derive(Parser)]
#[command(name = "treecount")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical root-to-leaf paths of a tree dump
    Paths {
        /// Tree dump to read
        file: PathBuf,

        /// Print complete paths instead, without splitting repeated labels
        #[arg(long)]
        complete: bool,

        /// Replace quoted literal labels with ValueStr nodes first
        #[arg(long)]
        normalize: bool,
    },

    /// Print per-label min/max statistics over tree dumps
    Bounds {
        /// Tree dumps to read (default: every dump in the project data directory)
        files: Vec<PathBuf>,

        /// Statistic to print
        #[arg(short, long, value_enum, default_value_t = BoundsKind::Path)]
        kind: BoundsKind,
    },

    /// Aggregate the project's tree dumps into a structure dump
    Build {
        /// Structure dump to write
        #[arg(short, long, default_value = "structure.txt")]
        output: PathBuf,

        /// Re-root the aggregate at every subtree with this label
        #[arg(short, long, value_name = "LABEL")]
        restructure: Option<String>,

        /// Build per-tree structures on all cores and merge them
        #[arg(long)]
        parallel: bool,

        /// Data directory (overrides treecount.toml)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Maximum number of dumps to read (overrides treecount.toml)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print total counts per tree over a set of paths
    Matrix {
        /// Structure dump to query
        structure: PathBuf,

        /// Path such as Expr/Add/Expr; repeatable (default: every node)
        #[arg(short = 'p', long = "path")]
        paths: Vec<String>,

        /// Tree id to report; repeatable (default: every tree)
        #[arg(short = 't', long = "tree")]
        trees: Vec<TreeId>,
    },

    /// Count the trees whose path counts satisfy an activation predicate
    Query {
        /// Structure dump to query
        structure: PathBuf,

        /// Path such as Expr/Add/Expr; the i-th path is x<i> in the activation
        #[arg(short = 'p', long = "path", required = true)]
        paths: Vec<String>,

        /// Predicate such as "x0 > 0 && x1 == 0"
        #[arg(short, long)]
        activation: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundsKind {
    /// Occurrences of a label on a root-to-leaf path: `label min max`
    Path,
    /// Children of a node with the label: `label min max`
    Adjacency,
    /// Children labeled `child` under one `parent` node: `parent child min max`
    Edge,
}

impl Cli {
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        match self.command {
            Commands::Paths {
                file,
                complete,
                normalize,
            } => print_paths(&file, complete, normalize),
            Commands::Bounds { files, kind } => print_bounds(files, kind),
            Commands::Build {
                output,
                restructure,
                parallel,
                data,
                limit,
            } => build_structure(&output, restructure.as_deref(), parallel, data, limit),
            Commands::Matrix {
                structure,
                paths,
                trees,
            } => print_matrix(&structure, &paths, &trees),
            Commands::Query {
                structure,
                paths,
                activation,
            } => run_query(&structure, &paths, &activation),
        }
    }
}

fn load_tree(path: &Path, normalize: bool) -> Result<Tree, Box<dyn Error>> {
    let mut tree = read_tree_file(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if normalize {
        normalize_literals(&mut tree);
    }
    Ok(tree)
}

fn print_paths(file: &Path, complete: bool, normalize: bool) -> Result<(), Box<dyn Error>> {
    let tree = load_tree(file, normalize)?;

    let paths: Box<dyn Iterator<Item = TreePath<'_, Option<String>>>> = if complete {
        Box::new(tree.complete_paths())
    } else {
        Box::new(tree.paths())
    };

    for path in paths {
        let labels: Vec<&str> = path.iter().map(|node| node.id.as_str()).collect();
        println!("{}", labels.join(PATH_SEPARATOR));
    }

    Ok(())
}

fn print_bounds(files: Vec<PathBuf>, kind: BoundsKind) -> Result<(), Box<dyn Error>> {
    let (files, normalize) = if files.is_empty() {
        let project = Project::discover()?;
        (project.find_dumps()?, project.normalize)
    } else {
        (files, false)
    };

    let trees = files
        .iter()
        .map(|file| load_tree(file, normalize))
        .collect::<Result<Vec<_>, _>>()?;

    match kind {
        BoundsKind::Path | BoundsKind::Adjacency => {
            let bounds = if matches!(kind, BoundsKind::Path) {
                label_occurrence_bounds(&trees)
            } else {
                adjacency_bounds(&trees)
            };
            for (label, (min, max)) in bounds {
                println!("{} {} {}", label, min, max);
            }
        }
        BoundsKind::Edge => {
            for (parent, edges) in edge_bounds(&trees) {
                for (child, (min, max)) in edges {
                    println!("{} {} {} {}", parent, child, min, max);
                }
            }
        }
    }

    Ok(())
}

fn build_structure(
    output: &Path,
    restructure: Option<&str>,
    parallel: bool,
    data: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let mut project = Project::discover()?;
    if let Some(data) = data {
        project.data_dir = data;
    }
    if limit.is_some() {
        project.limit = limit;
    }

    println!("Reading tree dumps from: {:?}", project.data_dir);

    let dumps = project.find_dumps()?;
    if dumps.is_empty() {
        println!("No .{} files found", project.extension);
        return Ok(());
    }

    println!("Found {} tree dumps", dumps.len());

    let mut structure = if parallel {
        let trees = dumps
            .iter()
            .map(|file| load_tree(file, project.normalize))
            .collect::<Result<Vec<_>, _>>()?;
        TreeStructure::from_trees_parallel(&trees)
    } else {
        let mut structure = TreeStructure::new();
        for file in &dumps {
            let tree = load_tree(file, project.normalize)?;
            let tree_id = structure.add_tree(&tree);
            info!("{} -> tree {}", file.display(), tree_id);
        }
        structure
    };

    if let Some(label) = restructure {
        structure = structure.restructure(label);
        println!("Restructured at {:?}", label);
    }

    structure.write_file(output)?;
    println!(
        "Aggregated {} trees into {:?}",
        structure.n_trees(),
        output
    );

    Ok(())
}

fn print_matrix(structure: &Path, paths: &[String], trees: &[TreeId]) -> Result<(), Box<dyn Error>> {
    let structure = TreeStructure::read_file(structure)?;
    let tool = StructureQueryTool::new(&structure);

    let paths: Vec<Vec<String>> = paths.iter().map(|path| parse_path(path)).collect();
    let matrix = tool.matrix(
        (!paths.is_empty()).then_some(paths.as_slice()),
        (!trees.is_empty()).then_some(trees),
    )?;

    for (tree, total) in matrix {
        println!("{} {}", tree, total);
    }

    Ok(())
}

fn run_query(structure: &Path, paths: &[String], activation: &str) -> Result<(), Box<dyn Error>> {
    let activation = parse_activation(activation)?;
    activation.validate(paths.len())?;

    let structure = TreeStructure::read_file(structure)?;
    let tool = StructureQueryTool::new(&structure);

    let paths: Vec<Vec<String>> = paths.iter().map(|path| parse_path(path)).collect();
    let n_activations = tool.query(&paths, |counts| activation.eval(counts));

    println!("{}", n_activations);

    Ok(())
}
