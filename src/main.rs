use clap::Parser;
use tracing::error;

use prediction_client::{log, run, Config};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sends concurrent prediction requests with random iris instances",
    long_about = None,
    allow_negative_numbers = true
)]
struct Args {
    /// Your project ID.
    #[arg(long)]
    project: String,
    /// Your endpoint ID.
    #[arg(long)]
    endpoint: String,
    /// Your endpoint's location.
    #[arg(long)]
    location: String,
    /// Number of instances per request. Zero or less sends empty requests.
    #[arg(long = "num_instances", default_value_t = 3)]
    num_instances: i64,
    /// Number of concurrent requests. Zero or less sends nothing.
    #[arg(long = "num_requests", default_value_t = 10)]
    num_requests: i64,
    /// Service URL, defaults to https://{location}-aiplatform.googleapis.com
    #[arg(long = "api_endpoint")]
    api_endpoint: Option<String>,
    /// OAuth2 access token sent as a bearer credential.
    #[arg(long = "access_token", env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    #[arg(long = "log_level", default_value = "warn")]
    log_level: String,
    #[arg(long = "log_file")]
    log_file: Option<String>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            project: args.project,
            endpoint: args.endpoint,
            location: args.location,
            num_instances: usize::try_from(args.num_instances).unwrap_or(0),
            num_requests: usize::try_from(args.num_requests).unwrap_or(0),
            api_endpoint: args.api_endpoint,
            access_token: args.access_token,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let guard = log::init_logger(&args.log_level, args.log_file.as_deref())?;

    // tonic and rustls may both enable a crypto backend; pick one explicitly
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let result = run(args.into()).await;
    if let Err(e) = &result {
        error!("Error: {:?}", e);
    }

    drop(guard);

    result
}
