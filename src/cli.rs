use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use contrailkit::{Request, ResourceIdentity, State};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contrail")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative resource management for the Contrail controller", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub controller: ControllerArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the controller lives and how to authenticate
#[derive(Args, Debug, Default)]
pub struct ControllerArgs {
    /// Config file (default: ~/.config/contrail/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Controller API URL
    #[arg(long, global = true, env = "CONTRAIL_URL")]
    pub url: Option<String>,

    /// Auth token sent as X-Auth-Token
    #[arg(long, global = true, env = "CONTRAIL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CONTRAIL_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current definition of a resource
    Query(TargetArgs),

    /// Create or update a resource
    Present(PresentArgs),

    /// Delete a resource if it exists
    Absent(AbsentArgs),

    /// Reconcile every task in a task file, in order
    Run(RunArgs),

    /// List supported resource types
    Types,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which resource to act on
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Resource type (see `contrail types`)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: String,

    /// Resource name
    #[arg(short, long)]
    pub name: String,

    /// Owning project
    #[arg(short, long)]
    pub project: String,

    /// Owning domain
    #[arg(short, long, default_value = "default-domain")]
    pub domain: String,
}

impl TargetArgs {
    pub fn into_request(self, state: State) -> Request {
        Request::new(
            self.kind,
            ResourceIdentity::new(self.name, self.project, self.domain),
            state,
        )
    }
}

#[derive(Args, Debug)]
pub struct PresentArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Desired attributes as a JSON object
    #[arg(long, value_name = "JSON", conflicts_with = "definition_file")]
    pub definition: Option<String>,

    /// Read the desired attributes from a JSON file
    #[arg(long, value_name = "PATH")]
    pub definition_file: Option<PathBuf>,

    /// Report what would change without changing it
    #[arg(long)]
    pub check: bool,

    /// Show a diff of the request body against the current definition
    #[arg(long)]
    pub diff: bool,
}

#[derive(Args, Debug)]
pub struct AbsentArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Report what would change without changing it
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task file (TOML, or JSON by extension)
    pub file: PathBuf,

    /// Report what would change without changing it
    #[arg(long)]
    pub check: bool,

    /// Show a diff for every task that would send a body
    #[arg(long)]
    pub diff: bool,
}
