use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::sync::Arc;

/// Shared elementwise transfer function.
pub type ElementFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Transfer function paired with its derivative.
///
/// The derivative is expressed in terms of the function's *output*: training
/// calls `derivative(y)` on values that have already been through
/// `function`, so `derivative` must never expect the pre-activation input.
#[derive(Clone, Default, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    Sigmoid,
    Tanh,
    /// Caller-supplied pair. Not serializable.
    #[serde(skip)]
    Custom { func: ElementFn, dfunc: ElementFn },
}

impl Activation {
    pub fn sigmoid() -> Activation {
        Activation::Sigmoid
    }

    pub fn tanh() -> Activation {
        Activation::Tanh
    }

    /// Builds an activation from `func(x)` and `dfunc(y)`, where `y = func(x)`.
    pub fn custom<F, D>(func: F, dfunc: D) -> Activation
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Activation::Custom {
            func: Arc::new(func),
            dfunc: Arc::new(dfunc),
        }
    }

    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::Tanh => x.tanh(),
            Activation::Custom { func, .. } => func(x),
        }
    }

    /// Derivative evaluated from an already-activated value `y`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Tanh => 1.0 - y * y,
            Activation::Custom { dfunc, .. } => dfunc(y),
        }
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Sigmoid => f.write_str("Sigmoid"),
            Activation::Tanh => f.write_str("Tanh"),
            Activation::Custom { .. } => f.write_str("Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn sigmoid_derivative_at_zero_is_a_quarter() {
        let s = Activation::sigmoid();
        assert!((s.function(0.0) - 0.5).abs() < EPS);
        assert!((s.derivative(s.function(0.0)) - 0.25).abs() < EPS);
    }

    #[test]
    fn tanh_derivative_uses_output() {
        let t = Activation::tanh();
        let x = 0.7_f64;
        let y = t.function(x);
        let expected = 1.0 - x.tanh().powi(2);
        assert!((t.derivative(y) - expected).abs() < EPS);
        assert!((t.derivative(t.function(0.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn custom_pair_is_called_as_given() {
        let relu = Activation::custom(|x| x.max(0.0), |y| if y > 0.0 { 1.0 } else { 0.0 });
        assert_eq!(relu.function(-2.0), 0.0);
        assert_eq!(relu.function(3.0), 3.0);
        assert_eq!(relu.derivative(3.0), 1.0);
        assert_eq!(format!("{:?}", relu.clone()), "Custom");
    }

    #[test]
    fn default_is_sigmoid() {
        assert!(matches!(Activation::default(), Activation::Sigmoid));
    }

    #[test]
    fn builtins_serialize_by_name() {
        assert_eq!(serde_json::to_string(&Activation::tanh()).unwrap(), "\"Tanh\"");
        let back: Activation = serde_json::from_str("\"Sigmoid\"").unwrap();
        assert!(matches!(back, Activation::Sigmoid));
        assert!(serde_json::to_string(&Activation::custom(|x| x, |_| 1.0)).is_err());
    }
}
