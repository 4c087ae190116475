use std::io::Write;

use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, error};

use crate::instance::{generate_instances, Instance};
use crate::report::write_response;
use crate::service::{PredictError, Prediction, PredictionService};

#[derive(Error, Debug)]
pub enum DriveError {
    #[error("request #{request_id} failed: {source}")]
    Predict {
        request_id: usize,
        #[source]
        source: PredictError,
    },

    #[error("failed to write response: {0}")]
    Io(#[from] std::io::Error),
}

pub fn endpoint_path(project: &str, location: &str, endpoint: &str) -> String {
    format!(
        "projects/{}/locations/{}/endpoints/{}",
        project, location, endpoint
    )
}

/// Issues `num_requests` prediction requests of `num_instances` random
/// instances each, all in flight at once, and writes every response to `out`
/// in completion order.
///
/// Returns the number of completed requests. The first failed request ends
/// the run; responses already written stay written and requests still in
/// flight are dropped.
pub async fn drive<S, R, W>(
    service: &S,
    endpoint: &str,
    num_requests: usize,
    num_instances: usize,
    rng: &mut R,
    out: &mut W,
) -> Result<usize, DriveError>
where
    S: PredictionService + ?Sized,
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    let mut in_flight = FuturesUnordered::new();
    for request_id in 1..=num_requests {
        let instances = generate_instances(rng, num_instances);
        debug!("Dispatching request #{} with {} instances", request_id, instances.len());
        in_flight.push(round_trip(service, endpoint, request_id, instances));
    }

    let mut completed = 0;
    while let Some(result) = in_flight.next().await {
        match result {
            Ok((request_id, instances, predictions)) => {
                write_response(out, request_id, &instances, &predictions)?;
                completed += 1;
            }
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        }
    }
    Ok(completed)
}

async fn round_trip<S: PredictionService + ?Sized>(
    service: &S,
    endpoint: &str,
    request_id: usize,
    instances: Vec<Instance>,
) -> Result<(usize, Vec<Instance>, Vec<Prediction>), DriveError> {
    let predictions = service
        .predict(endpoint, &instances)
        .await
        .map_err(|source| DriveError::Predict { request_id, source })?;
    if predictions.len() != instances.len() {
        return Err(DriveError::Predict {
            request_id,
            source: PredictError::CountMismatch {
                expected: instances.len(),
                actual: predictions.len(),
            },
        });
    }
    Ok((request_id, instances, predictions))
}
