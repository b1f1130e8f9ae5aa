//! Command-line argument definitions for kubrun.

use camino::Utf8PathBuf;
use clap::Parser;

const AFTER_HELP: &str = "\
Examples:

  # Run the perl image and print pi with 100 places
  kubrun --image perl -- perl -Mbignum=bpi -wle \"print bpi(100)\"

  # Same, but in a fixed namespace and keeping all created resources
  # around afterwards (useful for debugging)
  kubrun --namespace myproject --cleanup false --image perl -- \\
      perl -Mbignum=bpi -wle \"print bpi(100)\"
";

/// Command-line interface for kubrun.
///
/// Runs a container image on a Kubernetes cluster and prints its output.
/// Every option except `--config` and the trailing command can also be set
/// through `KUBRUN_*` environment variables or the configuration file.
#[derive(Debug, Parser)]
#[command(name = "kubrun")]
#[command(
    author,
    version,
    about = "Run a container image on a Kubernetes cluster and print its output",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Path to the kubeconfig file holding cluster credentials.
    #[arg(long)]
    pub kubeconfig: Option<Utf8PathBuf>,

    /// Kubernetes API server URL, bypassing kubeconfig discovery.
    #[arg(long)]
    pub api_server: Option<String>,

    /// Namespace to run in. A new one is created (and later removed) when
    /// not provided; note that namespace creation is restricted to cluster
    /// administrators on most clusters.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Container image to run on the cluster.
    #[arg(long)]
    pub image: Option<String>,

    /// Seconds to wait for the job to complete (0 to wait indefinitely).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delete all created resources (including the namespace, if kubrun
    /// created it) after the job finishes.
    #[arg(long)]
    pub cleanup: Option<bool>,

    /// Allow insecure TLS communication with the Kubernetes API server.
    #[arg(long)]
    pub insecure: Option<bool>,

    /// Command to run in the container, after `--`.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}
