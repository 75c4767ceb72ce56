use std::sync::Arc;

use domain::alert::entity::AlertRecord;
use domain::common::error::DomainError;
use domain::crossmatch::engine::SpatialCrossMatcher;
use domain::enrich::engine::CandidateEnricher;
use domain::enrich::entity::EnrichedCandidate;
use domain::filter::engine::FilterChain;
use domain::notify::engine::NotificationRouter;
use domain::photometry;
use ports::secondary::clock_port::ClockPort;
use ports::secondary::notification_sender::NotificationSender;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// One batch of alerts plus the reply slot for its verdict vector.
///
/// The upstream batch engine supplies aligned field vectors and expects one
/// boolean per alert back, in order.
pub struct BatchRequest {
    pub alerts: Vec<AlertRecord>,
    pub reply: oneshot::Sender<Vec<bool>>,
}

/// Candidate pipeline application service.
///
/// Composes the stages for one batch: predicate filter → galaxy cross-match
/// → enrichment → channel routing → best-effort dispatch. The verdict vector
/// is fully computed before any notification leaves the process, and
/// notification failures never alter it.
pub struct CandidatePipeline {
    filter: FilterChain,
    matcher: Option<SpatialCrossMatcher>,
    enricher: CandidateEnricher,
    router: NotificationRouter,
    clock: Arc<dyn ClockPort>,
    sender: Option<Arc<dyn NotificationSender>>,
}

impl CandidatePipeline {
    /// `matcher` must be present when the filter variant requires
    /// cross-matching; construction fails otherwise since the stage could
    /// never confirm a candidate.
    pub fn new(
        filter: FilterChain,
        matcher: Option<SpatialCrossMatcher>,
        router: NotificationRouter,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, DomainError> {
        if filter.rules().crossmatch && matcher.is_none() {
            return Err(DomainError::InvalidConfig(format!(
                "filter variant '{}' requires a galaxy catalog for cross-matching",
                filter.variant().label()
            )));
        }
        Ok(Self {
            filter,
            matcher,
            enricher: CandidateEnricher::new(),
            router,
            clock,
            sender: None,
        })
    }

    #[must_use]
    pub fn with_sender(mut self, sender: Arc<dyn NotificationSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Classification stages only: filter, cross-match, enrich.
    ///
    /// Returns the verdict vector (aligned with the input) and the enriched
    /// candidates for variants that route notifications. Pure with respect
    /// to I/O; identical inputs give identical verdicts.
    pub fn classify_batch(
        &self,
        alerts: &[AlertRecord],
    ) -> (Vec<bool>, Vec<EnrichedCandidate>) {
        let mut verdicts = self.filter.evaluate_batch(alerts);
        let rules = self.filter.rules();
        let mut candidates = Vec::new();

        for (idx, alert) in alerts.iter().enumerate() {
            if !verdicts[idx] {
                continue;
            }

            let host = match (&self.matcher, rules.crossmatch) {
                (Some(matcher), true) => {
                    let apparent = photometry::dc_mag(&alert.photometry);
                    let matched = apparent.and_then(|dc| {
                        matcher.find_host(alert.ra_deg, alert.dec_deg, dc.mag)
                    });
                    match matched {
                        Some(m) => Some((matcher.catalog().entry(m.entry_idx), m)),
                        None => {
                            // No plausible host: the classification itself is
                            // withdrawn, not just the notification.
                            verdicts[idx] = false;
                            continue;
                        }
                    }
                }
                _ => None,
            };

            if rules.notify {
                candidates.push(self.enricher.enrich(alert, host, rules.variant));
            }
        }

        (verdicts, candidates)
    }

    /// Process one batch end to end and return the verdict vector.
    ///
    /// Verdicts are computed before dispatch; sends are time-bounded by the
    /// sender and their failures are logged only.
    pub async fn process_batch(&self, alerts: &[AlertRecord]) -> Vec<bool> {
        let (verdicts, candidates) = self.classify_batch(alerts);

        let accepted = verdicts.iter().filter(|v| **v).count();
        tracing::debug!(
            batch = alerts.len(),
            accepted,
            variant = self.filter.variant().label(),
            "batch classified"
        );

        self.dispatch(&candidates).await;
        verdicts
    }

    /// Best-effort notification dispatch, sequential in alert order.
    async fn dispatch(&self, candidates: &[EnrichedCandidate]) {
        if candidates.is_empty() {
            return;
        }
        let today = self.clock.utc_day();

        for candidate in candidates {
            let matched = self.router.route(candidate, today);
            if matched.is_empty() {
                tracing::debug!(
                    object_id = %candidate.object_id,
                    "candidate matched no notification channel"
                );
                continue;
            }

            for (idx, channel) in matched {
                if channel.webhook_url.is_none() {
                    tracing::warn!(
                        object_id = %candidate.object_id,
                        channel = %channel.name,
                        channel_index = idx,
                        "webhook endpoint not configured; channel skipped"
                    );
                    continue;
                }

                let Some(sender) = &self.sender else {
                    tracing::info!(
                        object_id = %candidate.object_id,
                        channel = %channel.name,
                        "no sender configured; notification dropped"
                    );
                    continue;
                };

                let message = NotificationRouter::build_message(channel, candidate);
                if let Err(e) = sender.send(&message, channel).await {
                    tracing::warn!(
                        object_id = %candidate.object_id,
                        channel = %channel.name,
                        error = %e,
                        "notification send failed"
                    );
                }
            }
        }
    }

    /// Async run loop: consumes batch requests, replies with verdict
    /// vectors, and drains pending requests on cancellation.
    ///
    /// The reply is sent before dispatch starts, so the caller's verdict is
    /// never held hostage by a slow webhook.
    pub async fn run(self, mut rx: mpsc::Receiver<BatchRequest>, cancel_token: CancellationToken) {
        let mut batches: u64 = 0;

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    // Drain remaining batches before exiting.
                    while let Ok(request) = rx.try_recv() {
                        batches += 1;
                        self.handle_request(request).await;
                    }
                    break;
                }
                msg = rx.recv() => {
                    match msg {
                        Some(request) => {
                            batches += 1;
                            self.handle_request(request).await;
                        }
                        None => break, // channel closed
                    }
                }
            }
        }

        tracing::info!(total_batches = batches, "candidate pipeline stopped");
    }

    async fn handle_request(&self, request: BatchRequest) {
        let (verdicts, candidates) = self.classify_batch(&request.alerts);
        let _ = request.reply.send(verdicts);
        self.dispatch(&candidates).await;
    }
}
