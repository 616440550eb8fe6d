//! Typed per-identifier overrides.
//!
//! An override replaces the raw state value when an identifier is rendered.
//! Each one declares the value kinds it accepts and produces; the declaration
//! is checked when the override is registered and again on every call.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use photon_core::{BindError, StateMap, Value, ValueKind};

/// Declared input and output kinds of a transform. `None` accepts any kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signature {
    pub input: Option<ValueKind>,
    pub output: Option<ValueKind>,
}

impl Signature {
    /// Accepts and produces any kind.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(input: Option<ValueKind>, output: Option<ValueKind>) -> Self {
        Self { input, output }
    }

    /// Check a state value against the declared input. A missing value always passes.
    pub fn check_input(&self, identifier: &str, value: Option<&Value>) -> Result<(), BindError> {
        match (self.input, value) {
            (Some(expected), Some(value)) if value.kind() != expected => {
                Err(BindError::OverrideInput {
                    identifier: identifier.to_string(),
                    expected,
                    found: value.kind(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Check a produced value against the declared output. `Null` always
    /// passes: it means the override has nothing to say.
    pub fn check_output(&self, identifier: &str, value: &Value) -> Result<(), BindError> {
        match self.output {
            Some(expected) if !matches!(value, Value::Null) && value.kind() != expected => Err(BindError::OverrideOutput {
                identifier: identifier.to_string(),
                expected,
                found: value.kind(),
            }),
            _ => Ok(()),
        }
    }
}

type TransformFn = dyn Fn(Option<&Value>) -> Value;

/// A pure function substituted for the raw state value of one identifier.
#[derive(Clone)]
pub struct Transform {
    signature: Signature,
    func: Rc<TransformFn>,
}

impl Transform {
    /// A transform accepting and producing any kind.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Option<&Value>) -> Value + 'static,
    {
        Self::with_signature(Signature::any(), func)
    }

    /// A transform with fixed input and output kinds.
    pub fn typed<F>(input: ValueKind, output: ValueKind, func: F) -> Self
    where
        F: Fn(Option<&Value>) -> Value + 'static,
    {
        Self::with_signature(Signature::new(Some(input), Some(output)), func)
    }

    pub fn with_signature<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(Option<&Value>) -> Value + 'static,
    {
        Self {
            signature,
            func: Rc::new(func),
        }
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Run the transform with both sides of the signature checked.
    pub fn apply(&self, identifier: &str, value: Option<&Value>) -> Result<Value, BindError> {
        self.signature.check_input(identifier, value)?;
        let out = (self.func)(value);
        self.signature.check_output(identifier, &out)?;
        Ok(out)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Overrides keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct OverrideMap {
    transforms: IndexMap<String, Transform>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the override for `identifier`.
    pub fn insert(&mut self, identifier: impl Into<String>, transform: Transform) {
        self.transforms.insert(identifier.into(), transform);
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Transform> {
        self.transforms.shift_remove(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&Transform> {
        self.transforms.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.transforms.contains_key(identifier)
    }

    /// Identifiers with an override, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Value of `identifier` for typed bindings: the override's output, falling
/// back to the raw state value when there is no override or it produced `Null`.
pub fn resolve(
    identifier: &str,
    state: &StateMap,
    overrides: &OverrideMap,
) -> Result<Option<Value>, BindError> {
    let raw = state.get(identifier);
    match overrides.get(identifier) {
        Some(transform) => match transform.apply(identifier, raw)? {
            Value::Null => Ok(raw.cloned()),
            out => Ok(Some(out)),
        },
        None => Ok(raw.cloned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubled() -> Transform {
        Transform::typed(ValueKind::Number, ValueKind::Number, |v| {
            Value::from(v.and_then(Value::as_number).unwrap_or(0.0) * 2.0)
        })
    }

    #[test]
    fn test_resolve_without_override() {
        let state = StateMap::new().with("n", 3);
        let overrides = OverrideMap::new();
        assert_eq!(resolve("n", &state, &overrides).unwrap(), Some(Value::from(3)));
        assert_eq!(resolve("missing", &state, &overrides).unwrap(), None);
    }

    #[test]
    fn test_resolve_with_override() {
        let state = StateMap::new().with("n", 3);
        let mut overrides = OverrideMap::new();
        overrides.insert("n", doubled());
        assert_eq!(resolve("n", &state, &overrides).unwrap(), Some(Value::from(6)));
    }

    #[test]
    fn test_null_output_falls_back_to_state() {
        let state = StateMap::new().with("n", 3);
        let mut overrides = OverrideMap::new();
        overrides.insert("n", Transform::new(|_| Value::Null));
        assert_eq!(resolve("n", &state, &overrides).unwrap(), Some(Value::from(3)));
    }

    #[test]
    fn test_override_sees_missing_value() {
        let state = StateMap::new();
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "greeting",
            Transform::new(|v| match v {
                Some(v) => Value::from(format!("hi {v}")),
                None => Value::from("nobody"),
            }),
        );
        assert_eq!(
            resolve("greeting", &state, &overrides).unwrap(),
            Some(Value::from("nobody"))
        );
    }

    #[test]
    fn test_input_kind_is_checked() {
        let state = StateMap::new().with("n", "three");
        let mut overrides = OverrideMap::new();
        overrides.insert("n", doubled());
        let err = resolve("n", &state, &overrides).unwrap_err();
        assert_eq!(
            err,
            BindError::OverrideInput {
                identifier: "n".into(),
                expected: ValueKind::Number,
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_output_kind_is_checked() {
        let transform = Transform::with_signature(
            Signature::new(None, Some(ValueKind::List)),
            |_| Value::from("not a list"),
        );
        let err = transform.apply("classes", None).unwrap_err();
        assert!(matches!(err, BindError::OverrideOutput { expected: ValueKind::List, .. }));
    }

    #[test]
    fn test_null_output_passes_typed_signature() {
        let state = StateMap::new().with("n", 4);
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "n",
            Transform::typed(ValueKind::Number, ValueKind::String, |_| Value::Null),
        );
        assert_eq!(resolve("n", &state, &overrides).unwrap(), Some(Value::from(4)));
    }

    #[test]
    fn test_insert_replaces() {
        let mut overrides = OverrideMap::new();
        overrides.insert("a", Transform::new(|_| Value::from(1)));
        overrides.insert("b", Transform::new(|_| Value::from(2)));
        overrides.insert("a", Transform::new(|_| Value::from(3)));
        assert_eq!(overrides.len(), 2);
        let names: Vec<_> = overrides.names().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(overrides.get("a").unwrap().apply("a", None).unwrap(), Value::from(3));
        assert!(overrides.remove("a").is_some());
        assert!(!overrides.contains("a"));
    }
}
