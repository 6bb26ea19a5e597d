//! Delta-debugging reduction engine.
//!
//! # Responsibilities
//! - Establish the baseline response
//! - Run the header, cookie and query-parameter pass loops to a fixed point
//! - Test each candidate on an independent copy and commit the first equivalent one
//! - Record decisions, counters and stop reasons

use tracing::Instrument;
use uuid::Uuid;

use crate::config::{MinimizerConfig, ReduceConfig};
use crate::invocation::{CarrierKind, Invocation, QueryEditError};
use crate::lifecycle::{StopListener, StopReason};
use crate::observability::metrics::{self, CallOutcome};
use crate::oracle::{Oracle, PredicateSet, Response};
use crate::reduction::protected::ProtectedElements;
use crate::reduction::trace::{Decision, ElementKind, Verdict};
use crate::reduction::types::{Category, MinimizeError, Reduction};

/// Reduces curl invocations against an [`Oracle`].
pub struct Minimizer<O> {
    oracle: O,
    categories: ReduceConfig,
    predicates: PredicateSet,
    protected: ProtectedElements,
    stop: Option<StopListener>,
}

impl<O: Oracle> Minimizer<O> {
    /// Create a minimizer from configuration.
    pub fn new(oracle: O, config: &MinimizerConfig) -> Self {
        Self {
            oracle,
            categories: config.reduce.clone(),
            predicates: PredicateSet::new(config.compare.predicates.iter().copied()),
            protected: ProtectedElements::from_config(&config.protect),
            stop: None,
        }
    }

    /// Replace the protected set.
    pub fn with_protected(mut self, protected: ProtectedElements) -> Self {
        self.protected = protected;
        self
    }

    /// Check `stop` before every candidate execution.
    pub fn with_stop(mut self, stop: StopListener) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    /// Reduce `text` to a 1-minimal equivalent invocation.
    pub async fn minimize(&mut self, text: &str) -> Result<Reduction, MinimizeError> {
        let span = tracing::info_span!("minimize", run_id = %Uuid::new_v4());
        self.run(text).instrument(span).await
    }

    async fn run(&mut self, text: &str) -> Result<Reduction, MinimizeError> {
        let mut working = Invocation::parse(text)?;

        let baseline = self
            .oracle
            .execute(&working.to_text())
            .await
            .map_err(MinimizeError::Baseline)?;

        tracing::info!(
            status = baseline.status(),
            bytes = baseline.byte_len(),
            predicates = %self.predicates,
            "Baseline captured"
        );

        let categories = self.categories.clone();
        let mut run = Run {
            oracle: &self.oracle,
            predicates: &self.predicates,
            protected: &self.protected,
            stop: self.stop.as_mut(),
            baseline,
            trace: categories.trace.then(Vec::new),
            oracle_calls: 1,
            removals: 0,
        };

        let (stopped, query_error) = match run.reduce_all(&categories, &mut working).await {
            Ok(()) => (None, None),
            Err(Halt::Stopped(reason)) => {
                tracing::warn!(reason = ?reason, "Reduction stopped early; returning last verified command");
                (Some(reason), None)
            }
            Err(Halt::Skipped(error)) => {
                tracing::warn!(error = %error, "Query parameter reduction aborted");
                (None, Some(error))
            }
        };

        tracing::info!(
            oracle_calls = run.oracle_calls,
            removals = run.removals,
            "Minimization complete"
        );

        Ok(Reduction {
            invocation: working,
            baseline: run.baseline,
            trace: run.trace.unwrap_or_default(),
            oracle_calls: run.oracle_calls,
            removals: run.removals,
            stopped,
            query_error,
        })
    }
}

/// Why a category loop returned early.
enum Halt {
    Stopped(StopReason),
    Skipped(QueryEditError),
}

/// State for one minimization: the fixed baseline plus counters.
struct Run<'a, O> {
    oracle: &'a O,
    predicates: &'a PredicateSet,
    protected: &'a ProtectedElements,
    stop: Option<&'a mut StopListener>,
    baseline: Response,
    trace: Option<Vec<Decision>>,
    oracle_calls: usize,
    removals: usize,
}

impl<O: Oracle> Run<'_, O> {
    async fn reduce_all(&mut self, categories: &ReduceConfig, working: &mut Invocation) -> Result<(), Halt> {
        if categories.headers {
            self.reduce_headers(working).await?;
        }
        if categories.cookies {
            self.reduce_cookies(working).await?;
        }
        if categories.params {
            self.reduce_query(working).await?;
        }
        Ok(())
    }

    /// Execute `candidate` and report whether it matches the baseline.
    async fn probe(
        &mut self,
        candidate: &Invocation,
        category: Category,
        kind: ElementKind,
        element: &str,
    ) -> Result<bool, Halt> {
        if let Some(reason) = self.stop.as_deref_mut().and_then(StopListener::check) {
            return Err(Halt::Stopped(reason));
        }

        self.oracle_calls += 1;
        let (equivalent, error) = match self.oracle.execute(&candidate.to_text()).await {
            Ok(response) => (self.predicates.equivalent(&self.baseline, &response), None),
            Err(e) => {
                tracing::info!(kind = %kind, element = %element, error = %e, "Candidate failed to execute; keeping element");
                (false, Some(e.to_string()))
            }
        };

        let outcome = match (&error, equivalent) {
            (Some(_), _) => CallOutcome::Failed,
            (None, true) => CallOutcome::Equivalent,
            (None, false) => CallOutcome::Divergent,
        };
        metrics::record_oracle_call(category, outcome);

        let verdict = if equivalent { Verdict::Removed } else { Verdict::Kept };
        match verdict {
            Verdict::Removed => tracing::info!(kind = %kind, element = %element, "Not needed"),
            Verdict::Kept => tracing::debug!(kind = %kind, element = %element, "Needed"),
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.push(Decision {
                category,
                kind,
                element: element.to_string(),
                verdict,
                error,
            });
        }
        Ok(equivalent)
    }

    fn commit(&mut self, working: &mut Invocation, candidate: Invocation, category: Category) {
        *working = candidate;
        self.removals += 1;
        metrics::record_removal(category);
    }

    async fn reduce_headers(&mut self, working: &mut Invocation) -> Result<(), Halt> {
        loop {
            let headers: Vec<_> = working
                .headers()
                .into_iter()
                .filter(|h| !h.is_cookie_carrier() && !self.protected.header(&h.name))
                .filter(|h| working.args().get(h.index + 1).is_some_and(|v| !v.is_flag()))
                .collect();

            let mut removed = false;
            for header in headers {
                let mut candidate = working.clone();
                candidate.remove_argument(header.index);
                let label = raw_value(working, header.index);
                if self.probe(&candidate, Category::Header, ElementKind::Header, &label).await? {
                    self.commit(working, candidate, Category::Header);
                    removed = true;
                    break;
                }
            }
            if !removed {
                return Ok(());
            }
        }
    }

    async fn reduce_cookies(&mut self, working: &mut Invocation) -> Result<(), Halt> {
        loop {
            let carriers = working.cookie_carriers();

            let mut removed = false;
            'carriers: for carrier in carriers {
                if self.protected.freezes_carrier(&carrier) {
                    continue;
                }
                let kind = match carrier.kind {
                    CarrierKind::Header => ElementKind::CookieHeader,
                    CarrierKind::Flag => ElementKind::CookieFlag,
                };
                let label = raw_value(working, carrier.index);

                let whole_tested = !self.protected.pins_carrier(&carrier);
                if whole_tested {
                    let mut candidate = working.clone();
                    candidate.remove_argument(carrier.index);
                    if self.probe(&candidate, Category::Cookie, kind, &label).await? {
                        self.commit(working, candidate, Category::Cookie);
                        removed = true;
                        break 'carriers;
                    }
                }

                let names = carrier.names();
                // A single-name carrier was already covered by the whole-argument test.
                if whole_tested && names.len() <= 1 {
                    continue;
                }
                for name in names {
                    if self.protected.cookie(name) {
                        continue;
                    }
                    let mut candidate = working.clone();
                    match candidate.remove_cookie_entry(carrier.index, name) {
                        Ok(true) => {}
                        Ok(false) => continue,
                        Err(e) => {
                            tracing::warn!(cookie = %name, error = %e, "Cannot re-encode cookie carrier; keeping entry");
                            continue;
                        }
                    }
                    if self.probe(&candidate, Category::Cookie, ElementKind::Cookie, name).await? {
                        self.commit(working, candidate, Category::Cookie);
                        removed = true;
                        break 'carriers;
                    }
                }
            }
            if !removed {
                return Ok(());
            }
        }
    }

    async fn reduce_query(&mut self, working: &mut Invocation) -> Result<(), Halt> {
        loop {
            let params = working
                .query_parameters()
                .map_err(|e| Halt::Skipped(e.into()))?;

            let protected = self.protected;
            let mut removed = false;
            for param in params.iter().filter(|p| !protected.param(&p.key)) {
                let mut candidate = working.clone();
                candidate
                    .remove_query_parameter(&param.key)
                    .map_err(Halt::Skipped)?;
                if self
                    .probe(&candidate, Category::QueryParam, ElementKind::QueryParam, &param.key)
                    .await?
                {
                    self.commit(working, candidate, Category::QueryParam);
                    removed = true;
                    break;
                }
            }
            if !removed {
                return Ok(());
            }
        }
    }
}

fn raw_value(invocation: &Invocation, flag_index: usize) -> String {
    invocation
        .args()
        .get(flag_index + 1)
        .map(|arg| arg.value().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ExecutionError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn words(reduction: &Reduction) -> Vec<&str> {
        reduction.invocation.args().iter().map(|a| a.value()).collect()
    }

    fn body(text: &str) -> Result<Response, ExecutionError> {
        Ok(Response::new(200, text.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn test_drops_unneeded_header() {
        let oracle = |cmd: &str| -> Result<Response, ExecutionError> {
            body(if cmd.contains("X-Key") { "ok" } else { "denied" })
        };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default());
        let reduction = minimizer
            .minimize("curl -H 'Accept: */*' -H 'X-Key: 1' http://localhost/")
            .await
            .unwrap();
        assert_eq!(words(&reduction), vec!["curl", "-H", "X-Key: 1", "http://localhost/"]);
        assert_eq!(reduction.removals, 1);
        assert_eq!(reduction.oracle_calls, 3);
    }

    #[tokio::test]
    async fn test_failed_candidate_keeps_element() {
        let oracle = |cmd: &str| -> Result<Response, ExecutionError> {
            if cmd.contains("Accept") {
                body("ok")
            } else {
                Err(ExecutionError::Exit { code: Some(7), stderr: String::new() })
            }
        };
        let mut config = MinimizerConfig::default();
        config.reduce.trace = true;
        let mut minimizer = Minimizer::new(oracle, &config);
        let reduction = minimizer.minimize("curl -H 'Accept: */*' http://localhost/").await.unwrap();
        assert_eq!(reduction.removals, 0);
        assert_eq!(reduction.trace.len(), 1);
        assert_eq!(reduction.trace[0].verdict, Verdict::Kept);
        assert!(reduction.trace[0].error.is_some());
    }

    #[tokio::test]
    async fn test_cookie_entries_reduced_inside_carrier() {
        let oracle = |cmd: &str| -> Result<Response, ExecutionError> {
            body(if cmd.contains("b=2") { "ok" } else { "anon" })
        };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default());
        let reduction = minimizer
            .minimize("curl -H 'Cookie: a=1; b=2; c=3' http://localhost/")
            .await
            .unwrap();
        assert_eq!(words(&reduction), vec!["curl", "-H", "Cookie: b=2", "http://localhost/"]);
    }

    #[tokio::test]
    async fn test_protected_param_survives() {
        let oracle = |_: &str| -> Result<Response, ExecutionError> { body("same") };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default());
        let reduction = minimizer
            .minimize("curl 'http://localhost/?auth_key=k&utm=x'")
            .await
            .unwrap();
        assert_eq!(words(&reduction), vec!["curl", "http://localhost/?auth_key=k"]);
    }

    #[tokio::test]
    async fn test_baseline_failure_is_fatal() {
        let oracle = |_: &str| -> Result<Response, ExecutionError> { Err(ExecutionError::Timeout(1)) };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default());
        let err = minimizer.minimize("curl http://localhost/").await.unwrap_err();
        assert!(matches!(err, MinimizeError::Baseline(_)));
    }

    #[tokio::test]
    async fn test_expired_deadline_returns_input() {
        let calls = AtomicUsize::new(0);
        let oracle = |_: &str| -> Result<Response, ExecutionError> {
            calls.fetch_add(1, Ordering::SeqCst);
            body("same")
        };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default())
            .with_stop(StopListener::with_deadline(Duration::ZERO));
        let reduction = minimizer.minimize("curl -H 'A: 1' http://localhost/").await.unwrap();
        assert_eq!(reduction.stopped, Some(StopReason::DeadlineExceeded));
        assert_eq!(words(&reduction), vec!["curl", "-H", "A: 1", "http://localhost/"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_cookie_headers_are_removed() {
        let oracle = |_: &str| -> Result<Response, ExecutionError> { body("same") };
        let mut minimizer = Minimizer::new(oracle, &MinimizerConfig::default());
        let reduction = minimizer
            .minimize("curl -H 'Cookie;' -H 'Cookie:' http://x/")
            .await
            .unwrap();
        assert_eq!(words(&reduction), vec!["curl", "http://x/"]);
        assert_eq!(reduction.removals, 2);
    }
}
