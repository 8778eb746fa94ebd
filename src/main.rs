use clap::{Args, Parser, Subcommand};
use codescout::{
    render, FunctionQuery, MethodQuery, Mode, NamedType, OutputFormat, Part, Query, ScoutError,
    SourceFile, StructQuery,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codescout")]
#[command(about = "Find Go declarations by their shape using Tree-sitter", long_about = None, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a function
    Func {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        callable: CallableArgs,
    },
    /// Find a method
    Method {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        callable: CallableArgs,

        /// Receiver type name, e.g. Person or pkg.Person
        #[arg(long)]
        receiver: Option<String>,

        /// Whether the receiver is a pointer
        #[arg(long, value_name = "BOOL")]
        pointer: Option<bool>,

        /// Receiver field the body reads (repeatable)
        #[arg(short = 'f', long = "field", value_name = "FIELD")]
        fields: Vec<String>,

        /// Receiver method the body calls (repeatable)
        #[arg(short = 'm', long = "method", value_name = "METHOD")]
        methods: Vec<String>,

        /// Whether the body reads no receiver fields
        #[arg(long, value_name = "BOOL")]
        no_fields: Option<bool>,

        /// Whether the body calls no receiver methods
        #[arg(long, value_name = "BOOL")]
        no_methods: Option<bool>,
    },
    /// Find a struct
    Struct {
        #[command(flatten)]
        common: CommonArgs,

        /// Struct name
        #[arg(short, long)]
        name: Option<String>,

        /// Field as name:type, name: or :type (repeatable)
        #[arg(short = 'p', long = "field", value_name = "NAME:TYPE")]
        fields: Vec<NamedType>,

        /// Whether the struct has no fields
        #[arg(long, value_name = "BOOL")]
        no_fields: Option<bool>,

        /// Require the field list to match exactly
        #[arg(long)]
        exact: bool,
    },
    /// Run a query read from a TOML file
    Query {
        #[command(flatten)]
        common: CommonArgs,

        /// TOML query file
        #[arg(long, value_name = "FILE")]
        query_file: PathBuf,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Go source file to scout
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Return every match instead of the first
    #[arg(long)]
    all: bool,

    /// JSON output instead of plain text
    #[arg(long)]
    json: bool,

    /// Part of each match to print
    #[arg(short, long, default_value = "definition")]
    output: Part,
}

#[derive(Args)]
struct CallableArgs {
    /// Declaration name
    #[arg(short, long)]
    name: Option<String>,

    /// Parameter as name:type, name: or :type (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME:TYPE")]
    params: Vec<NamedType>,

    /// Return type (repeatable)
    #[arg(short = 'r', long = "return", value_name = "TYPE")]
    returns: Vec<String>,

    /// Whether the declaration takes no parameters
    #[arg(long, value_name = "BOOL")]
    no_params: Option<bool>,

    /// Whether the declaration returns nothing
    #[arg(long = "no-return", value_name = "BOOL")]
    no_returns: Option<bool>,

    /// Require parameter and return lists to match exactly
    #[arg(long)]
    exact: bool,
}

impl CallableArgs {
    fn into_function_query(self) -> FunctionQuery {
        FunctionQuery {
            name: self.name,
            params: self.params,
            returns: self.returns,
            no_params: self.no_params,
            no_returns: self.no_returns,
            exact: self.exact,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME")))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", env!("CARGO_PKG_NAME"))))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<String, ScoutError> {
    match command {
        Commands::Func { common, callable } => {
            let query = callable.into_function_query();
            if query.is_empty() {
                return Err(no_filter_error());
            }
            scout_and_render(&common, Query::Function(query))
        }
        Commands::Method {
            common,
            callable,
            receiver,
            pointer,
            fields,
            methods,
            no_fields,
            no_methods,
        } => {
            let query = MethodQuery {
                name: callable.name,
                params: callable.params,
                returns: callable.returns,
                no_params: callable.no_params,
                no_returns: callable.no_returns,
                receiver,
                pointer_receiver: pointer,
                fields,
                methods,
                no_fields,
                no_methods,
                exact: callable.exact,
            };
            if query.is_empty() {
                return Err(no_filter_error());
            }
            scout_and_render(&common, Query::Method(query))
        }
        Commands::Struct {
            common,
            name,
            fields,
            no_fields,
            exact,
        } => {
            let query = StructQuery {
                name,
                fields,
                no_fields,
                exact,
            };
            scout_and_render(&common, Query::Struct(query))
        }
        Commands::Query { common, query_file } => {
            let query = Query::from_toml_file(&query_file)?;
            scout_and_render(&common, query)
        }
    }
}

fn no_filter_error() -> ScoutError {
    ScoutError::InvalidQuery("at least one filter flag must be set".to_string())
}

/// Validate, parse, traverse, render. Everything that can be rejected up
/// front is rejected before the file is read.
fn scout_and_render(common: &CommonArgs, query: Query) -> Result<String, ScoutError> {
    query.validate()?;
    common.output.check(query.kind())?;
    let format = if common.json {
        OutputFormat::Json
    } else {
        OutputFormat::Plain
    };
    let mode = if common.all { Mode::All } else { Mode::First };

    let file = SourceFile::open(&common.file)?;
    let decls = codescout::scout(&file, &query, mode)?;
    render(&decls, common.output, format)
}
