//! Command-line interface for esri-metadata

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use esri_metadata::config::Options;
#[cfg(feature = "cli")]
use esri_metadata::exports::to_json_string;
#[cfg(feature = "cli")]
use esri_metadata::{Handle, Metadata, Wrapper};

#[cfg(feature = "cli")]
type CliResult = Result<(), Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "esri-metadata")]
#[command(author, version, about = "Read and edit ArcGIS metadata documents", long_about = None)]
struct Cli {
    /// JSON options file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value at a path, or the subtree as JSON
    Get {
        /// Metadata file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted path, e.g. dataIdInfo.idCitation.resTitle
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Set the value at a path, creating missing elements
    Set {
        /// Metadata file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted path of a value
        #[arg(value_name = "PATH")]
        path: String,

        /// New value, in the document format of the field's type
        #[arg(value_name = "VALUE")]
        value: String,

        /// Write to this file instead of FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the element, attribute or list item at a path
    Delete {
        /// Metadata file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted path; end with [i] to delete one list item
        #[arg(value_name = "PATH")]
        path: String,

        /// Write to this file instead of FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append an empty item to the list at a path
    Append {
        /// Metadata file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted path of a list
        #[arg(value_name = "PATH")]
        path: String,

        /// Write to this file instead of FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the document, or the subtree at a path, as JSON
    Json {
        /// Metadata file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted path of the subtree to export
        #[arg(value_name = "PATH")]
        path: Option<String>,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_options(cli.config.as_deref()).and_then(|options| match cli.command {
        Commands::Get { file, path } => cmd_get(&file, &path, options),
        Commands::Set {
            file,
            path,
            value,
            output,
        } => cmd_set(&file, &path, &value, output.as_deref(), options),
        Commands::Delete { file, path, output } => {
            cmd_delete(&file, &path, output.as_deref(), options)
        }
        Commands::Append { file, path, output } => {
            cmd_append(&file, &path, output.as_deref(), options)
        }
        Commands::Json { file, path, pretty } => cmd_json(&file, path.as_deref(), pretty, options),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_options(path: Option<&Path>) -> Result<Options, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Options::from_json_file(path)?),
        None => Ok(Options::default()),
    }
}

#[cfg(feature = "cli")]
fn cmd_get(file: &Path, path: &str, options: Options) -> CliResult {
    let metadata = Metadata::open_with(file, options)?;
    match metadata.at(path)? {
        Handle::Value(value) => {
            if let Some(scalar) = value.value()? {
                println!("{}", scalar);
            }
        }
        other => println!("{}", to_json_string(&other, true)?),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_set(file: &Path, path: &str, value: &str, output: Option<&Path>, options: Options) -> CliResult {
    let metadata = Metadata::open_with(file, options)?;
    metadata.at(path)?.into_value()?.set_value(value)?;
    metadata.save(output)?;
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_delete(file: &Path, path: &str, output: Option<&Path>, options: Options) -> CliResult {
    let metadata = Metadata::open_with(file, options)?;
    metadata.at(path)?.delete()?;
    metadata.save(output)?;
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_append(file: &Path, path: &str, output: Option<&Path>, options: Options) -> CliResult {
    let metadata = Metadata::open_with(file, options)?;
    let mut list = metadata.at(path)?.into_list()?;
    list.append(None)?;
    metadata.save(output)?;
    println!("{}[{}]", path, list.len() - 1);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_json(file: &Path, path: Option<&str>, pretty: bool, options: Options) -> CliResult {
    let metadata = Metadata::open_with(file, options)?;
    let handle = match path {
        Some(path) => metadata.at(path)?,
        None => Handle::Container(metadata.root()),
    };
    println!("{}", to_json_string(&handle, pretty)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
