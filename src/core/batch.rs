use crate::core::verifier::{email_domain, DomainVerifier};
use crate::core::{DomainLookup, HttpTransport};
use crate::utils::error::{Result, VerifyError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A command-line input: an email address or a bare domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Domain(String),
    Email { address: String, domain: String },
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.contains('@') {
            Ok(Target::Email {
                address: raw.to_string(),
                domain: email_domain(raw)?,
            })
        } else {
            Ok(Target::Domain(raw.to_string()))
        }
    }

    pub fn domain(&self) -> &str {
        match self {
            Target::Domain(domain) => domain,
            Target::Email { domain, .. } => domain,
        }
    }
}

#[derive(Debug)]
pub struct TargetOutcome {
    pub input: String,
    pub result: Result<DomainLookup>,
}

/// Checks every input with at most `concurrency` requests in flight. Results
/// come back in input order, one per input; a lookup task that dies yields a
/// `LookupAborted` outcome in its slot.
pub async fn check_many<T>(
    verifier: Arc<DomainVerifier<T>>,
    inputs: Vec<String>,
    concurrency: usize,
) -> Vec<TargetOutcome>
where
    T: HttpTransport + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut slots: Vec<Option<TargetOutcome>> = inputs.iter().map(|_| None).collect();

    for (index, input) in inputs.iter().cloned().enumerate() {
        let verifier = Arc::clone(&verifier);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let result = match Target::parse(&input) {
                Ok(target) => {
                    let _permit = semaphore.acquire_owned().await.ok();
                    verifier.lookup(target.domain()).await
                }
                Err(e) => Err(e),
            };
            (index, TargetOutcome { input, result })
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => tracing::error!("Lookup task failed: {}", e),
        }
    }

    // a task that panicked or was cancelled leaves its slot empty
    slots
        .into_iter()
        .zip(inputs)
        .map(|(slot, input)| {
            slot.unwrap_or_else(|| TargetOutcome {
                result: Err(VerifyError::LookupAborted {
                    input: input.clone(),
                    reason: "task panicked or was cancelled".to_string(),
                }),
                input,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutboundRequest;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks the highest number of requests in flight at once.
    #[derive(Clone, Default)]
    struct SlowTransport {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpTransport for SlowTransport {
        async fn get(&self, request: &OutboundRequest) -> Result<u16> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if request.url.ends_with("/kr/ac/gachon.txt") {
                Ok(200)
            } else {
                Ok(404)
            }
        }
    }

    /// Dies on one particular domain, answers 200 for everything else.
    struct PanickingTransport;

    #[async_trait]
    impl HttpTransport for PanickingTransport {
        async fn get(&self, request: &OutboundRequest) -> Result<u16> {
            if request.url.ends_with("/edu/crash.txt") {
                panic!("transport blew up for {}", request.url);
            }
            Ok(200)
        }
    }

    #[test]
    fn test_target_parse() {
        // case is left to the verifier
        assert_eq!(
            Target::parse(" Gachon.AC.kr ").unwrap(),
            Target::Domain("Gachon.AC.kr".to_string())
        );

        let email = Target::parse("kim@gachon.ac.kr").unwrap();
        assert_eq!(email.domain(), "gachon.ac.kr");

        assert!(Target::parse("kim@").is_err());
    }

    #[tokio::test]
    async fn test_check_many_preserves_input_order() {
        let verifier = Arc::new(DomainVerifier::new(SlowTransport::default(), None));
        let inputs = vec![
            "example.com".to_string(),
            "kim@gachon.ac.kr".to_string(),
            "broken@".to_string(),
            "gachon.ac.kr".to_string(),
            "mit.edu".to_string(),
        ];

        let outcomes = check_many(Arc::clone(&verifier), inputs.clone(), 2).await;

        let returned: Vec<&str> = outcomes.iter().map(|o| o.input.as_str()).collect();
        assert_eq!(returned, inputs.iter().map(String::as_str).collect::<Vec<_>>());

        assert!(!outcomes[0].result.as_ref().unwrap().is_verified());
        assert!(outcomes[1].result.as_ref().unwrap().is_verified());
        assert!(matches!(
            outcomes[2].result,
            Err(VerifyError::InvalidEmail { .. })
        ));
        assert!(outcomes[3].result.as_ref().unwrap().is_verified());
    }

    #[tokio::test]
    async fn test_check_many_mixed_case_domain_is_verified() {
        let verifier = Arc::new(DomainVerifier::new(SlowTransport::default(), None));
        let outcomes = check_many(verifier, vec!["Gachon.AC.kr".to_string()], 1).await;

        let lookup = outcomes[0].result.as_ref().unwrap();
        assert!(lookup.is_verified());
        assert_eq!(lookup.path, "kr/ac/gachon.txt");
        assert_eq!(outcomes[0].input, "Gachon.AC.kr");
    }

    #[tokio::test]
    async fn test_check_many_keeps_a_slot_for_a_failed_task() {
        let verifier = Arc::new(DomainVerifier::new(PanickingTransport, None));
        let inputs = vec![
            "mit.edu".to_string(),
            "crash.edu".to_string(),
            "kim@gachon.ac.kr".to_string(),
        ];

        let outcomes = check_many(verifier, inputs.clone(), 2).await;

        assert_eq!(outcomes.len(), inputs.len());
        assert_eq!(outcomes[1].input, "crash.edu");
        match &outcomes[1].result {
            Err(VerifyError::LookupAborted { input, .. }) => assert_eq!(input, "crash.edu"),
            other => panic!("expected an aborted lookup, got {:?}", other),
        }
        assert!(outcomes[0].result.as_ref().unwrap().is_verified());
        assert!(outcomes[2].result.as_ref().unwrap().is_verified());
    }

    #[tokio::test]
    async fn test_check_many_respects_limit() {
        let transport = SlowTransport::default();
        let verifier = Arc::new(DomainVerifier::new(transport.clone(), None));
        let inputs = (0..8).map(|i| format!("school{}.edu", i)).collect();

        check_many(verifier, inputs, 3).await;

        assert!(transport.peak.load(Ordering::SeqCst) <= 3);
        assert!(transport.peak.load(Ordering::SeqCst) >= 1);
    }
}
