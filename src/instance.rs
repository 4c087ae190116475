use prost_types::value::Kind;
use prost_types::{ListValue, Value};
use rand::Rng;

pub const FEATURE_NAMES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Closed sampling interval for each feature, in feature order.
pub const FEATURE_RANGES: [(f64, f64); 4] = [(5.0, 8.0), (2.0, 5.0), (1.0, 7.0), (0.1, 3.0)];

/// One input sample submitted for prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub features: [f64; 4],
}

impl Instance {
    /// Encodes the instance as a `ListValue` of numbers, the shape the
    /// prediction service expects for a dense feature vector.
    pub fn to_value(&self) -> Value {
        let values = self
            .features
            .iter()
            .map(|v| Value {
                kind: Some(Kind::NumberValue(*v)),
            })
            .collect();
        Value {
            kind: Some(Kind::ListValue(ListValue { values })),
        }
    }
}

pub fn generate_instance<R: Rng + ?Sized>(rng: &mut R) -> Instance {
    let mut features = [0f64; 4];
    for (feature, (lo, hi)) in features.iter_mut().zip(FEATURE_RANGES) {
        *feature = rng.gen_range(lo..=hi);
    }
    Instance { features }
}

pub fn generate_instances<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Instance> {
    (0..count).map(|_| generate_instance(rng)).collect()
}
