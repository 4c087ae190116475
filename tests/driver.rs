use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use prediction_client::{drive, DriveError, Instance, PredictError, Prediction, PredictionService};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ENDPOINT: &str = "projects/p/locations/us-central1/endpoints/e";

/// Answers every instance with the same prediction and records what it saw.
struct EchoService {
    prediction: Prediction,
    delay: Duration,
    seen: Mutex<Vec<(String, usize)>>,
}

impl EchoService {
    fn new(delay: Duration) -> Self {
        Self {
            prediction: Prediction::new(0.9, 0.05, 0.05),
            delay,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[tonic::async_trait]
impl PredictionService for EchoService {
    async fn predict(
        &self,
        endpoint: &str,
        instances: &[Instance],
    ) -> Result<Vec<Prediction>, PredictError> {
        self.seen
            .lock()
            .unwrap()
            .push((endpoint.to_string(), instances.len()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(vec![self.prediction; instances.len()])
    }
}

/// Returns a fixed list of predictions regardless of input.
struct FixedService(Vec<Prediction>);

#[tonic::async_trait]
impl PredictionService for FixedService {
    async fn predict(
        &self,
        _endpoint: &str,
        _instances: &[Instance],
    ) -> Result<Vec<Prediction>, PredictError> {
        Ok(self.0.clone())
    }
}

/// Fails the `fail_on`-th call; the others succeed after `delay`.
struct FailingService {
    calls: AtomicUsize,
    fail_on: usize,
    delay: Duration,
}

#[tonic::async_trait]
impl PredictionService for FailingService {
    async fn predict(
        &self,
        _endpoint: &str,
        instances: &[Instance],
    ) -> Result<Vec<Prediction>, PredictError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(PredictError::Status(tonic::Status::unavailable(
                "replica went away",
            )));
        }
        tokio::time::sleep(self.delay).await;
        Ok(vec![Prediction::new(0.2, 0.3, 0.5); instances.len()])
    }
}

async fn run_against<S: PredictionService>(
    service: &S,
    num_requests: usize,
    num_instances: usize,
) -> (Result<usize, DriveError>, String) {
    let mut rng = StdRng::seed_from_u64(2022);
    let mut out = Vec::new();
    let result = drive(service, ENDPOINT, num_requests, num_instances, &mut rng, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn issues_every_request_with_every_instance() {
    let service = EchoService::new(Duration::ZERO);
    let (result, output) = run_against(&service, 4, 3).await;

    assert_eq!(result.unwrap(), 4);
    let seen = service.seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|(endpoint, n)| endpoint == ENDPOINT && *n == 3));

    assert_eq!(output.matches("==> Response from request #").count(), 4);
    assert_eq!(output.matches("Instance ").count(), 12);
    assert_eq!(output.matches("Prediction ").count(), 12);
    for id in 1..=4 {
        assert!(output.contains(&format!("request #{}:", id)));
    }
}

#[tokio::test]
async fn zero_work_prints_nothing() {
    let service = EchoService::new(Duration::ZERO);

    let (result, output) = run_against(&service, 0, 3).await;
    assert_eq!(result.unwrap(), 0);
    assert!(output.is_empty());

    let (result, output) = run_against(&service, 2, 0).await;
    assert_eq!(result.unwrap(), 2);
    assert_eq!(output.matches("==> Response").count(), 2);
    assert!(!output.contains("Instance "));
}

#[tokio::test]
async fn prints_returned_scores_for_single_request() {
    let service = FixedService(vec![
        Prediction::new(0.9, 0.05, 0.05),
        Prediction::new(0.1, 0.8, 0.1),
    ]);
    let (result, output) = run_against(&service, 1, 2).await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(output.matches("==> Response from request #1:").count(), 1);
    assert!(output.contains("Prediction 1:\tsetosa:\t\t0.9\n\t\tversicolor:\t0.05\n\t\tvirginica:\t0.05\n"));
    assert!(output.contains("Prediction 2:\tsetosa:\t\t0.1\n\t\tversicolor:\t0.8\n\t\tvirginica:\t0.1\n"));
    assert!(output.contains("Instance 2:\tsepal_length:\t"));
    assert!(!output.contains("Instance 3:"));
}

#[tokio::test]
async fn requests_run_concurrently() {
    let delay = Duration::from_millis(200);
    let service = EchoService::new(delay);

    let start = Instant::now();
    let (result, _) = run_against(&service, 5, 1).await;
    let elapsed = start.elapsed();

    assert_eq!(result.unwrap(), 5);
    assert!(elapsed >= delay);
    assert!(elapsed < delay * 3, "took {:?}", elapsed);
}

#[tokio::test]
async fn failure_surfaces_the_failing_request() {
    let service = FailingService {
        calls: AtomicUsize::new(0),
        fail_on: 3,
        delay: Duration::from_millis(50),
    };
    let (result, output) = run_against(&service, 5, 2).await;

    match result {
        Err(DriveError::Predict { request_id, source }) => {
            assert!((1..=5).contains(&request_id));
            assert!(source.to_string().contains("replica went away"));
            assert!(!output.contains(&format!("request #{}:", request_id)));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(output.matches("==> Response").count() < 5);
}

#[tokio::test]
async fn short_response_is_an_error_not_a_truncated_block() {
    let service = FixedService(vec![Prediction::new(0.9, 0.05, 0.05)]);
    let (result, output) = run_against(&service, 1, 2).await;

    match result {
        Err(DriveError::Predict {
            request_id: 1,
            source: PredictError::CountMismatch { expected, actual },
        }) => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected count mismatch, got {:?}", other),
    }
    assert!(output.is_empty());
}
