use prost_types::value::Kind;
use prost_types::Value;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Certificate, Channel, ClientTlsConfig};
use tonic::Request;
use tracing::{debug, info};
use url::Url;

use crate::aiplatform::{PredictRequest, PredictResponse, PREDICT_PATH};
use crate::instance::Instance;
use crate::service::{PredictError, Prediction, PredictionService};
use crate::tls;

pub fn api_host(location: &str) -> String {
    format!("{}-aiplatform.googleapis.com", location)
}

/// gRPC client for the managed prediction service.
///
/// The underlying `Channel` multiplexes calls, so each request works on its
/// own clone of the handle.
#[derive(Debug, Clone)]
pub struct GrpcPredictionClient {
    inner: tonic::client::Grpc<Channel>,
    authorization: Option<MetadataValue<Ascii>>,
}

impl GrpcPredictionClient {
    pub async fn connect(url: &str, access_token: Option<&str>) -> Result<Self, PredictError> {
        let mut endpoint = Channel::from_shared(url.to_string())?;
        if let Ok(parsed) = Url::parse(url) {
            if parsed.scheme() == "https" {
                let pem = tls::native_root_pem()?;
                let mut tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem));
                if let Some(host) = parsed.host_str() {
                    tls = tls.domain_name(host);
                }
                endpoint = endpoint.tls_config(tls)?;
            }
        }
        let channel = endpoint.connect().await?;
        info!("Connected to {}", url);

        let authorization: Option<MetadataValue<Ascii>> = match access_token {
            Some(token) => Some(format!("Bearer {}", token).parse()?),
            None => None,
        };

        Ok(Self {
            inner: tonic::client::Grpc::new(channel),
            authorization,
        })
    }
}

#[tonic::async_trait]
impl PredictionService for GrpcPredictionClient {
    async fn predict(
        &self,
        endpoint: &str,
        instances: &[Instance],
    ) -> Result<Vec<Prediction>, PredictError> {
        let mut grpc = self.inner.clone();
        grpc.ready().await?;

        let mut request = Request::new(PredictRequest {
            endpoint: endpoint.to_string(),
            instances: instances.iter().map(Instance::to_value).collect(),
            parameters: None,
        });
        let routing = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("endpoint", endpoint)
            .finish();
        request
            .metadata_mut()
            .insert(
                "x-goog-request-params",
                routing.parse::<MetadataValue<Ascii>>()?,
            );
        if let Some(authorization) = &self.authorization {
            request
                .metadata_mut()
                .insert("authorization", authorization.clone());
        }

        let codec: ProstCodec<PredictRequest, PredictResponse> = ProstCodec::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(PREDICT_PATH), codec)
            .await?
            .into_inner();
        debug!(
            "Deployed model {} returned {} predictions",
            response.deployed_model_id,
            response.predictions.len()
        );

        decode_predictions(instances.len(), &response.predictions)
    }
}

pub fn decode_predictions(
    expected: usize,
    predictions: &[Value],
) -> Result<Vec<Prediction>, PredictError> {
    if predictions.len() != expected {
        return Err(PredictError::CountMismatch {
            expected,
            actual: predictions.len(),
        });
    }
    predictions
        .iter()
        .enumerate()
        .map(|(index, value)| decode_prediction(index, value))
        .collect()
}

fn decode_prediction(index: usize, value: &Value) -> Result<Prediction, PredictError> {
    let malformed = |reason: &str| PredictError::MalformedPrediction {
        index,
        reason: reason.to_string(),
    };

    let mut values = match &value.kind {
        Some(Kind::ListValue(list)) => &list.values,
        _ => return Err(malformed("not a list")),
    };
    // some serving containers wrap the score vector: [[a, b, c]]
    while let [Value {
        kind: Some(Kind::ListValue(inner)),
    }] = values.as_slice()
    {
        values = &inner.values;
    }

    let scores: Vec<f64> = values
        .iter()
        .map(|v| match v.kind {
            Some(Kind::NumberValue(n)) => Ok(n),
            _ => Err(malformed("score is not a number")),
        })
        .collect::<Result<_, _>>()?;
    match scores.as_slice() {
        [setosa, versicolor, virginica] => Ok(Prediction::new(*setosa, *versicolor, *virginica)),
        _ => Err(malformed(&format!("expected 3 scores, found {}", scores.len()))),
    }
}
