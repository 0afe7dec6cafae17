use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use vela_state::{
    BackendConfig, LocalBackendConfig, OssBackendConfig, RemoteBackendConfig, S3BackendConfig,
    StateError, StateOutput, StateReference,
};

#[derive(Parser)]
#[command(name = "vela")]
#[command(about = "Read outputs from Terraform state", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a single output value
    Output {
        /// Name of the output to read
        name: String,

        /// Print sensitive values instead of redacting them
        #[arg(long)]
        show_sensitive: bool,

        /// Abort the fetch after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[command(subcommand)]
        backend: Backend,
    },
    /// List every output in the state
    Outputs {
        /// Print sensitive values instead of redacting them
        #[arg(long)]
        show_sensitive: bool,

        /// Abort the fetch after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[command(subcommand)]
        backend: Backend,
    },
}

#[derive(Subcommand)]
enum Backend {
    /// Read state from a local file
    Local {
        /// Path to the state file
        #[arg(default_value = LocalBackendConfig::DEFAULT_STATE_FILE)]
        path: PathBuf,
    },
    /// Read state from an S3 bucket
    S3 {
        /// Bucket holding the state object
        #[arg(long)]
        bucket: String,

        /// Object key of the state file
        #[arg(long)]
        key: String,

        /// Bucket region (falls back to the AWS credentials pipeline)
        #[arg(long)]
        region: Option<String>,

        /// Custom S3 API endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Profile from the shared credentials file
        #[arg(long)]
        profile: Option<String>,

        /// IAM role to assume before reading
        #[arg(long)]
        role_arn: Option<String>,
    },
    /// Read state from an Alibaba OSS bucket
    Oss {
        /// Bucket holding the state object
        #[arg(long)]
        bucket: String,

        /// Bucket region
        #[arg(long)]
        region: String,

        /// State object name
        #[arg(long, default_value = OssBackendConfig::DEFAULT_KEY)]
        key: String,

        /// Path directory the state object is stored under
        #[arg(long)]
        prefix: Option<String>,

        /// Custom OSS API endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Read state from a Terraform Cloud/Enterprise workspace
    Remote {
        /// Organization containing the workspace
        #[arg(long)]
        organization: String,

        /// Workspace name
        #[arg(long)]
        workspace: String,

        /// API token used to authenticate
        #[arg(long, env = "TFE_TOKEN", hide_env_values = true)]
        token: String,

        /// Backend hostname
        #[arg(long)]
        hostname: Option<String>,
    },
}

impl Backend {
    fn into_config(self) -> Result<BackendConfig, StateError> {
        match self {
            Backend::Local { path } => Ok(BackendConfig::Local(LocalBackendConfig::with_path(
                path,
            )?)),
            Backend::S3 {
                bucket,
                key,
                region,
                endpoint,
                profile,
                role_arn,
            } => {
                let mut config = S3BackendConfig::new(bucket, key)?;
                if let Some(region) = region {
                    config = config.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    config = config.with_endpoint(endpoint);
                }
                if let Some(profile) = profile {
                    config = config.with_profile(profile);
                }
                if let Some(role_arn) = role_arn {
                    config = config.with_role_arn(role_arn);
                }
                Ok(BackendConfig::S3(config))
            }
            Backend::Oss {
                bucket,
                region,
                key,
                prefix,
                endpoint,
            } => {
                let mut config = OssBackendConfig::new(bucket, region)?.with_key(key);
                if let Some(prefix) = prefix {
                    config = config.with_prefix(prefix);
                }
                if let Some(endpoint) = endpoint {
                    config = config.with_endpoint(endpoint);
                }
                Ok(BackendConfig::Oss(config))
            }
            Backend::Remote {
                organization,
                workspace,
                token,
                hostname,
            } => {
                let mut config = RemoteBackendConfig::new(organization, workspace, token)?;
                if let Some(hostname) = hostname {
                    config = config.with_hostname(hostname);
                }
                Ok(BackendConfig::Remote(config))
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Output {
            name,
            show_sensitive,
            timeout,
            backend,
        } => run_output(&name, show_sensitive, timeout, backend).await,
        Commands::Outputs {
            show_sensitive,
            timeout,
            backend,
        } => run_outputs(show_sensitive, timeout, backend).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn open_reference(
    backend: Backend,
    timeout: Option<u64>,
) -> Result<StateReference, StateError> {
    let config = backend.into_config()?;
    let mut reference = StateReference::new(config);
    if let Some(secs) = timeout {
        reference = reference.with_timeout(Duration::from_secs(secs));
    }
    reference.load().await?;
    Ok(reference)
}

async fn run_output(
    name: &str,
    show_sensitive: bool,
    timeout: Option<u64>,
    backend: Backend,
) -> Result<(), StateError> {
    let reference = open_reference(backend, timeout).await?;
    let output = reference.get_output(name).await?;

    println!("{}", render_output(&output, show_sensitive));
    Ok(())
}

async fn run_outputs(
    show_sensitive: bool,
    timeout: Option<u64>,
    backend: Backend,
) -> Result<(), StateError> {
    let reference = open_reference(backend, timeout).await?;
    let outputs = reference.outputs().await?;

    tracing::debug!(count = outputs.len(), "state outputs resolved");

    if outputs.is_empty() {
        println!("{}", "State has no outputs".yellow());
        return Ok(());
    }

    for (name, output) in &outputs {
        println!("{} = {}", name.bold(), render_output(output, show_sensitive));
    }
    Ok(())
}

/// Render one output for the terminal
///
/// Sensitive values are redacted unless explicitly revealed. Strings print
/// bare; everything else prints as JSON.
fn render_output(output: &StateOutput, show_sensitive: bool) -> String {
    if output.sensitive && !show_sensitive {
        return "[REDACTED]".red().to_string();
    }

    match output.value.as_str() {
        Some(s) => s.to_string(),
        None => serde_json::to_string_pretty(&output.value)
            .unwrap_or_else(|_| "null".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_state::OutputValue;

    #[test]
    fn test_local_backend_default_path() {
        let backend = Backend::Local {
            path: PathBuf::from(LocalBackendConfig::DEFAULT_STATE_FILE),
        };

        let config = backend.into_config().unwrap();
        assert_eq!(config.kind(), "local");
        assert_eq!(config.origin(), "terraform.tfstate");
    }

    #[test]
    fn test_s3_backend_flags_map_to_config() {
        let backend = Backend::S3 {
            bucket: "my-bucket".to_string(),
            key: "prod/terraform.tfstate".to_string(),
            region: Some("ap-northeast-1".to_string()),
            endpoint: None,
            profile: None,
            role_arn: None,
        };

        let config = backend.into_config().unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "my-bucket");
                assert_eq!(s3.region.as_deref(), Some("ap-northeast-1"));
            }
            other => panic!("Expected S3 config, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bucket_is_rejected() {
        let backend = Backend::S3 {
            bucket: String::new(),
            key: "terraform.tfstate".to_string(),
            region: None,
            endpoint: None,
            profile: None,
            role_arn: None,
        };

        assert!(matches!(
            backend.into_config(),
            Err(StateError::Config(_))
        ));
    }

    #[test]
    fn test_render_redacts_sensitive_output() {
        let output = StateOutput::new(OutputValue::String("hunter2".to_string()), true);

        let rendered = render_output(&output, false);
        assert!(!rendered.contains("hunter2"));

        let rendered = render_output(&output, true);
        assert_eq!(rendered, "hunter2");
    }

    #[test]
    fn test_render_strings_print_bare() {
        let output = StateOutput::new(OutputValue::String("vpc-123".to_string()), false);
        assert_eq!(render_output(&output, false), "vpc-123");
    }
}
