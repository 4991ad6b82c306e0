//! The caller facade.
//!
//! A [`Caller`] wires the pipeline together around one transport:
//! contract → compose → transport → coerce, with a facade-level retry loop
//! for coercion failures and optional thread continuity. The convenience
//! operations ([`Caller::cast`], [`Caller::extract`], [`Caller::classify`],
//! [`Caller::generate`]) are thin wrappers over [`Caller::invoke`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use typecast_ai::{caller::Caller, transport::MockTransport};
//! use typecast_ai_core::{contract::TargetContract, settings::CallConfig};
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new()
//!     .with_structured(serde_json::json!({"data": "positive"}));
//! let caller = Caller::new(
//!     Arc::new(transport),
//!     CallConfig::new("mock", "mock-model"),
//! );
//!
//! let label = caller.classify("I love this", &["positive", "negative"]).await.unwrap();
//! assert_eq!(label, "positive");
//! # });
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use typecast_ai_core::contract::TargetContract;
use typecast_ai_core::errors::ContractError;
use typecast_ai_core::settings::CallConfig;
use typecast_ai_core::thread::{Exchange, ThreadId};
use typecast_ai_output::coerce::coerce;

use crate::compose::compose;
use crate::error::{CallError, CallResult};
use crate::policy::{BudgetPolicy, RetryPolicy};
use crate::thread::ThreadStore;
use crate::transport::Transport;

/// A declared unit of work: a purpose, an output contract, and optional
/// per-call instructions and thread continuity.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name, used in logging.
    pub name: String,
    /// The declared purpose, appended to the prompt verbatim.
    pub purpose: String,
    /// The output contract.
    pub contract: TargetContract,
    /// Caller instructions, appended last so they win over earlier framing.
    pub instructions: Option<String>,
    /// Thread to read prior exchanges from and append this call's exchange
    /// to.
    pub thread: Option<ThreadId>,
}

impl Task {
    /// Create a task.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        purpose: impl Into<String>,
        contract: TargetContract,
    ) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            contract,
            instructions: None,
            thread: None,
        }
    }

    /// Start building a task by name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder {
            name: name.into(),
            purpose: None,
            contract: None,
            instructions: None,
            thread: None,
        }
    }

    /// Set per-call instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Attach this task to a thread.
    #[must_use]
    pub fn in_thread(mut self, thread: ThreadId) -> Self {
        self.thread = Some(thread);
        self
    }
}

/// Builder for [`Task`].
///
/// Unlike [`Task::new`], the contract is supplied separately, and its
/// absence is an explicit [`ContractError::Unspecified`] at build time,
/// never an inferred shape.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    name: String,
    purpose: Option<String>,
    contract: Option<TargetContract>,
    instructions: Option<String>,
    thread: Option<ThreadId>,
}

impl TaskBuilder {
    /// Set the purpose text.
    #[must_use]
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Set the output contract.
    #[must_use]
    pub fn contract(mut self, contract: TargetContract) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Set per-call instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Attach to a thread.
    #[must_use]
    pub fn thread(mut self, thread: ThreadId) -> Self {
        self.thread = Some(thread);
        self
    }

    /// Build the task.
    ///
    /// # Errors
    ///
    /// [`ContractError::Unspecified`] when no contract was declared.
    pub fn build(self) -> Result<Task, ContractError> {
        let contract = self.contract.ok_or(ContractError::Unspecified)?;
        Ok(Task {
            name: self.name,
            purpose: self.purpose.unwrap_or_default(),
            contract,
            instructions: self.instructions,
            thread: self.thread,
        })
    }
}

/// Ordered, labeled inputs for one call.
///
/// Deterministic pre-gathered context (the gather-then-generate pattern) is
/// just another labeled input: run the gathering code first, then add its
/// result with [`TaskInputs::with`].
#[derive(Debug, Clone, Default)]
pub struct TaskInputs(Vec<(String, JsonValue)>);

impl TaskInputs {
    /// Create an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labeled input.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: JsonValue) -> Self {
        self.0.push((label.into(), value));
        self
    }

    /// The labeled pairs, in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, JsonValue)] {
        &self.0
    }
}

impl<L: Into<String>> FromIterator<(L, JsonValue)> for TaskInputs {
    fn from_iter<I: IntoIterator<Item = (L, JsonValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, v)| (l.into(), v)).collect())
    }
}

/// The user-facing entry point of the pipeline.
pub struct Caller {
    transport: Arc<dyn Transport>,
    config: CallConfig,
    threads: Option<Arc<dyn ThreadStore>>,
    policy: Arc<dyn RetryPolicy>,
}

impl Caller {
    /// Create a caller over a transport, with the retry policy derived from
    /// the config's budget.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: CallConfig) -> Self {
        let policy = Arc::new(BudgetPolicy::new(config.retry_budget));
        Self {
            transport,
            config,
            threads: None,
            policy,
        }
    }

    /// Attach a thread store.
    #[must_use]
    pub fn with_thread_store(mut self, store: Arc<dyn ThreadStore>) -> Self {
        self.threads = Some(store);
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// The caller's configuration.
    #[must_use]
    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Run one call: compose, execute, coerce.
    ///
    /// Coercion failures are retried by re-issuing the identical rendered
    /// request while the retry policy allows; when the budget is exhausted
    /// the last coercion error is surfaced verbatim. Transport errors are
    /// propagated immediately and never retried here.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        task: &Task,
        inputs: &TaskInputs,
    ) -> CallResult<T> {
        let prior = match (&task.thread, &self.threads) {
            (Some(id), Some(store)) => store.history(id),
            _ => Vec::new(),
        };

        let request = compose(
            &task.contract,
            &task.purpose,
            inputs.pairs(),
            task.instructions.as_deref(),
            &prior,
            self.config.max_prompt_chars,
        )?;

        let mut attempt = 0u32;
        loop {
            let reply = self.transport.execute(&request, &self.config).await?;

            match coerce::<T>(&reply, &task.contract) {
                Ok(value) => {
                    if let (Some(id), Some(store)) = (&task.thread, &self.threads) {
                        store.append(id, Exchange::new(request.clone(), reply));
                    }
                    tracing::debug!(task = %task.name, attempt, "call succeeded");
                    return Ok(value);
                }
                Err(error) => {
                    if self.policy.should_retry(&error, attempt) {
                        tracing::debug!(
                            task = %task.name,
                            attempt,
                            %error,
                            "coercion failed, re-issuing request"
                        );
                        attempt += 1;
                        continue;
                    }
                    return Err(error.into());
                }
            }
        }
    }

    /// Run one independent call per input set, all started concurrently.
    ///
    /// Results come back in input order regardless of completion order. The
    /// first unrecovered error fails the whole batch and cancels the
    /// still-pending calls; there is no silent partial-results outcome.
    pub async fn invoke_map<T: DeserializeOwned>(
        &self,
        task: &Task,
        batches: &[TaskInputs],
    ) -> CallResult<Vec<T>> {
        let calls = batches.iter().map(|inputs| self.invoke::<T>(task, inputs));
        futures::future::try_join_all(calls).await
    }

    /// Convert a value into the target shape.
    pub async fn cast<T: DeserializeOwned>(
        &self,
        input: JsonValue,
        contract: &TargetContract,
    ) -> CallResult<T> {
        let task = Task::new(
            "cast",
            "Convert the input value into the target shape, preserving its meaning.",
            contract.clone(),
        );
        self.invoke(&task, &TaskInputs::new().with("input", input))
            .await
    }

    /// Extract every entity matching `element` from the text.
    pub async fn extract<T: DeserializeOwned>(
        &self,
        text: &str,
        element: &TargetContract,
    ) -> CallResult<Vec<T>> {
        let task = Task::new(
            "extract",
            "Extract every entity matching the target shape from the input text.",
            TargetContract::list(element.clone()),
        );
        self.invoke(&task, &TaskInputs::new().with("text", json!(text)))
            .await
    }

    /// Pick the label that best describes the text.
    ///
    /// The contract is an enumeration over `labels`; the coercer's
    /// exact-match membership rule is the entire validation step.
    pub async fn classify(&self, text: &str, labels: &[&str]) -> CallResult<String> {
        let contract = TargetContract::enumeration(labels.iter().copied())?;
        let task = Task::new(
            "classify",
            "Choose the single label that best describes the input.",
            contract,
        );
        self.invoke(&task, &TaskInputs::new().with("input", json!(text)))
            .await
    }

    /// Generate `count` instances of the item shape.
    pub async fn generate<T: DeserializeOwned>(
        &self,
        count: usize,
        item: &TargetContract,
        guidance: Option<&str>,
    ) -> CallResult<Vec<T>> {
        let mut task = Task::new(
            "generate",
            format!("Generate exactly {count} plausible, varied instances of the target shape."),
            TargetContract::list(item.clone()),
        );
        if let Some(guidance) = guidance {
            task = task.with_instructions(guidance);
        }
        self.invoke(&task, &TaskInputs::new().with("count", json!(count)))
            .await
    }
}
