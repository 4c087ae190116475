use std::time::Instant;

use anyhow::Result;
use tracing::info;

pub mod aiplatform;
pub mod client;
pub mod driver;
pub mod instance;
pub mod log;
pub mod report;
pub mod service;
pub mod tls;

pub use client::{api_host, GrpcPredictionClient};
pub use driver::{drive, endpoint_path, DriveError};
pub use instance::{generate_instance, generate_instances, Instance};
pub use service::{PredictError, Prediction, PredictionService};

#[derive(Debug, Clone)]
pub struct Config {
    pub project: String,
    pub endpoint: String,
    pub location: String,
    pub num_instances: usize,
    pub num_requests: usize,
    pub api_endpoint: Option<String>,
    pub access_token: Option<String>,
}

impl Config {
    pub fn endpoint_path(&self) -> String {
        endpoint_path(&self.project, &self.location, &self.endpoint)
    }

    /// Service URL: the override when given, otherwise the regional host.
    pub fn service_url(&self) -> String {
        match &self.api_endpoint {
            Some(url) => url.clone(),
            None => format!("https://{}", api_host(&self.location)),
        }
    }
}

pub async fn run(config: Config) -> Result<()> {
    let client =
        GrpcPredictionClient::connect(&config.service_url(), config.access_token.as_deref())
            .await?;
    let endpoint = config.endpoint_path();

    println!(
        "Sending {} asynchronous prediction requests with {} instances per request ...",
        config.num_requests, config.num_instances
    );

    let start = Instant::now();
    let mut rng = rand::thread_rng();
    let mut stdout = std::io::stdout().lock();
    let completed = drive(
        &client,
        &endpoint,
        config.num_requests,
        config.num_instances,
        &mut rng,
        &mut stdout,
    )
    .await?;

    info!("Completed {} requests in {:?}", completed, start.elapsed());
    Ok(())
}
