//! Messages of `google.cloud.aiplatform.v1.PredictionService/Predict`.
//!
//! Only the fields this client reads or writes are declared; prost skips
//! unknown fields on decode.

use prost_types::Value;

pub const PREDICT_PATH: &str = "/google.cloud.aiplatform.v1.PredictionService/Predict";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PredictRequest {
    #[prost(string, tag = "1")]
    pub endpoint: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub instances: ::prost::alloc::vec::Vec<Value>,
    #[prost(message, optional, tag = "3")]
    pub parameters: ::core::option::Option<Value>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PredictResponse {
    #[prost(message, repeated, tag = "1")]
    pub predictions: ::prost::alloc::vec::Vec<Value>,
    #[prost(string, tag = "2")]
    pub deployed_model_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub model: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub model_display_name: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub model_version_id: ::prost::alloc::string::String,
}
