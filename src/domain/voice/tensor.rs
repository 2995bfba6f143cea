use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Compute device a tensor is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl Device {
    /// Mirror of the engine constructor's `use_cuda` flag
    pub fn from_cuda_flag(use_cuda: bool) -> Self {
        if use_cuda {
            Device::Cuda(0)
        } else {
            Device::Cpu
        }
    }

    pub fn is_cuda(&self) -> bool {
        matches!(self, Device::Cuda(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(index) => write!(f, "cuda:{}", index),
        }
    }
}

impl FromStr for Device {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|index| index.parse().ok())
                .map(Device::Cuda)
                .ok_or_else(|| TensorError::UnknownDevice(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    #[error("expected a number or an array, found {0}")]
    UnexpectedValue(&'static str),
    #[error("ragged array: expected {expected} elements at depth {depth}, found {found}")]
    Ragged {
        depth: usize,
        expected: usize,
        found: usize,
    },
    #[error("shape {shape:?} needs {expected} values, got {found}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },
    #[error("tensor contains a non-finite value at index {0}")]
    NonFinite(usize),
    #[error("value {value} at index {index} does not fit in f32")]
    OutOfRange { index: usize, value: f64 },
    #[error("unknown device: {0}")]
    UnknownDevice(String),
}

/// Dense row-major `f32` tensor.
///
/// JSON form is a nested array whose depth equals the rank, which is the
/// representation a `tolist()` call on the engine side produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
    device: Device,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                shape,
                expected,
                found: data.len(),
            });
        }

        Ok(Self {
            shape,
            data,
            device: Device::Cpu,
        })
    }

    pub fn from_vec(data: Vec<f32>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
            device: Device::Cpu,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Place the tensor on `device`
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Build a tensor from a nested JSON array (or a bare number for rank 0)
    pub fn from_json(value: &Value) -> Result<Self, TensorError> {
        let shape = infer_shape(value);
        let mut data = Vec::with_capacity(shape.iter().product());
        flatten(value, &shape, 0, &mut data)?;

        Ok(Self {
            shape,
            data,
            device: Device::Cpu,
        })
    }

    /// Render the tensor as nested JSON arrays
    pub fn to_json(&self) -> Result<Value, TensorError> {
        if let Some(index) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(TensorError::NonFinite(index));
        }

        Ok(nest(&self.shape, &self.data))
    }
}

// The first element at each depth dictates the expected shape; `flatten`
// then checks every sibling against it.
fn infer_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut cursor = value;

    while let Value::Array(items) = cursor {
        shape.push(items.len());
        match items.first() {
            Some(first) => cursor = first,
            None => break,
        }
    }

    shape
}

fn flatten(
    value: &Value,
    shape: &[usize],
    depth: usize,
    out: &mut Vec<f32>,
) -> Result<(), TensorError> {
    match (value, shape.get(depth)) {
        (Value::Number(number), None) => {
            let v = number
                .as_f64()
                .ok_or(TensorError::UnexpectedValue("a non-float number"))?;
            let narrowed = v as f32;
            if !narrowed.is_finite() {
                return Err(TensorError::OutOfRange {
                    index: out.len(),
                    value: v,
                });
            }
            out.push(narrowed);
            Ok(())
        }
        (Value::Array(items), Some(&expected)) => {
            if items.len() != expected {
                return Err(TensorError::Ragged {
                    depth,
                    expected,
                    found: items.len(),
                });
            }
            items
                .iter()
                .try_for_each(|item| flatten(item, shape, depth + 1, out))
        }
        (Value::Array(items), None) => Err(TensorError::Ragged {
            depth,
            expected: 0,
            found: items.len(),
        }),
        (Value::Number(_), Some(_)) => Err(TensorError::UnexpectedValue(
            "a number where an array was expected",
        )),
        (other, _) => Err(TensorError::UnexpectedValue(json_kind(other))),
    }
}

fn nest(shape: &[usize], data: &[f32]) -> Value {
    match shape.split_first() {
        None => data
            .first()
            .and_then(|v| Number::from_f64(f64::from(*v)))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some((&len, rest)) => {
            let stride = rest.iter().product::<usize>();
            Value::Array(
                (0..len)
                    .map(|i| nest(rest, &data[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Tensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tensor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Tensor::from_json(&value).map_err(de::Error::custom)
    }
}
