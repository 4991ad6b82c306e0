//! Blocking wrappers over the async facade.
//!
//! [`BlockingCaller`] owns a private current-thread runtime and drives the
//! async entry points to completion on it. Do not use it from inside an
//! async context; call [`Caller`](crate::caller::Caller) directly there.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use typecast_ai_core::contract::TargetContract;

use crate::caller::{Caller, Task, TaskInputs};
use crate::error::CallResult;

/// A [`Caller`] with blocking entry points.
pub struct BlockingCaller {
    inner: Caller,
    runtime: tokio::runtime::Runtime,
}

impl BlockingCaller {
    /// Wrap a caller.
    ///
    /// # Errors
    ///
    /// Returns the runtime construction error when the OS refuses the
    /// resources for a new runtime.
    pub fn new(inner: Caller) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async caller.
    #[must_use]
    pub fn inner(&self) -> &Caller {
        &self.inner
    }

    /// Blocking [`Caller::invoke`].
    pub fn invoke<T: DeserializeOwned>(&self, task: &Task, inputs: &TaskInputs) -> CallResult<T> {
        self.runtime.block_on(self.inner.invoke(task, inputs))
    }

    /// Blocking [`Caller::invoke_map`].
    pub fn invoke_map<T: DeserializeOwned>(
        &self,
        task: &Task,
        batches: &[TaskInputs],
    ) -> CallResult<Vec<T>> {
        self.runtime.block_on(self.inner.invoke_map(task, batches))
    }

    /// Blocking [`Caller::cast`].
    pub fn cast<T: DeserializeOwned>(
        &self,
        input: JsonValue,
        contract: &TargetContract,
    ) -> CallResult<T> {
        self.runtime.block_on(self.inner.cast(input, contract))
    }

    /// Blocking [`Caller::extract`].
    pub fn extract<T: DeserializeOwned>(
        &self,
        text: &str,
        element: &TargetContract,
    ) -> CallResult<Vec<T>> {
        self.runtime.block_on(self.inner.extract(text, element))
    }

    /// Blocking [`Caller::classify`].
    pub fn classify(&self, text: &str, labels: &[&str]) -> CallResult<String> {
        self.runtime.block_on(self.inner.classify(text, labels))
    }

    /// Blocking [`Caller::generate`].
    pub fn generate<T: DeserializeOwned>(
        &self,
        count: usize,
        item: &TargetContract,
        guidance: Option<&str>,
    ) -> CallResult<Vec<T>> {
        self.runtime
            .block_on(self.inner.generate(count, item, guidance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use typecast_ai_core::settings::CallConfig;

    use crate::transport::MockTransport;

    #[test]
    fn test_blocking_classify() {
        let transport =
            MockTransport::new().with_structured(serde_json::json!({"data": "negative"}));
        let caller = Caller::new(Arc::new(transport), CallConfig::new("mock", "mock-model"));
        let blocking = BlockingCaller::new(caller).unwrap();

        let label = blocking
            .classify("this is terrible", &["positive", "negative"])
            .unwrap();
        assert_eq!(label, "negative");
    }

    #[test]
    fn test_blocking_extract() {
        let transport =
            MockTransport::new().with_structured(serde_json::json!({"data": [1, 2]}));
        let caller = Caller::new(Arc::new(transport), CallConfig::new("mock", "mock-model"));
        let blocking = BlockingCaller::new(caller).unwrap();

        let values: Vec<i64> = blocking
            .extract("one and two", &TargetContract::integer())
            .unwrap();
        assert_eq!(values, vec![1, 2]);
    }
}
