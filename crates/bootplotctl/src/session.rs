//! Plot session: one visible result slot driven by mode selection.
//!
//! Every selection bumps a generation counter and resets the slot to
//! `Loading`. An acquisition carries the ticket it was issued with; when it
//! finishes, its result is applied only if that ticket is still current.
//! Older acquisitions are not cancelled, their results are just dropped.

use bootplot_shared::navigation::{resolve_click, ClickTarget, NavigationRequest, Navigator};
use bootplot_shared::{AnnotateOptions, Mode, PipelineResult, PlotError};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::acquire::Acquirer;
use crate::config::Config;

/// Identity of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub mode: Mode,
}

#[derive(Debug, Default)]
struct SessionState {
    mode: Mode,
    generation: u64,
    result: PipelineResult,
}

pub struct PlotSession<A: Acquirer> {
    acquirer: A,
    binary: String,
    host: String,
    options: AnnotateOptions,
    state: RwLock<SessionState>,
}

impl<A: Acquirer> PlotSession<A> {
    pub fn new(acquirer: A, config: &Config) -> Self {
        Self {
            acquirer,
            binary: config.analyze.binary.clone(),
            host: config.view.host.clone(),
            options: config.annotate_options(),
            state: RwLock::new(SessionState {
                mode: config.view.default_mode,
                ..SessionState::default()
            }),
        }
    }

    /// Select a mode: supersedes whatever is in flight and shows `Loading`.
    pub async fn select(&self, mode: Mode) -> RequestTicket {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.mode = mode;
        state.result = PipelineResult::Loading;
        debug!("Selected {} (generation {})", mode, state.generation);
        RequestTicket {
            generation: state.generation,
            mode,
        }
    }

    /// Apply an acquisition outcome. Returns false if the ticket was stale.
    pub async fn complete(&self, ticket: RequestTicket, outcome: Result<String, PlotError>) -> bool {
        {
            let state = self.state.read().await;
            if !Self::is_current(&state, ticket) {
                debug!(
                    "Discarding stale {} result (generation {}, current {})",
                    ticket.mode, ticket.generation, state.generation
                );
                return false;
            }
        }

        // Run the pipeline outside the lock; recheck before writing.
        let result = PipelineResult::from_outcome(ticket.mode, &self.binary, outcome, &self.options);

        let mut state = self.state.write().await;
        if !Self::is_current(&state, ticket) {
            debug!(
                "Discarding {} result superseded during annotation (generation {})",
                ticket.mode, ticket.generation
            );
            return false;
        }

        match &result {
            PipelineResult::Success(plot) => info!(
                "{} plot ready: {} entries, {} captions",
                ticket.mode,
                plot.entries.len(),
                plot.captions.len()
            ),
            PipelineResult::Failure(failure) => info!("{} plot failed: {}", ticket.mode, failure),
            PipelineResult::Loading => {}
        }
        state.result = result;
        true
    }

    /// Select `mode`, acquire, and apply the result if still current.
    pub async fn refresh(&self, mode: Mode) -> bool {
        let ticket = self.select(mode).await;
        let outcome = self.acquirer.acquire(mode).await;
        self.complete(ticket, outcome).await
    }

    /// Route a click on the rendered plot. Returns the request that was issued.
    pub async fn handle_click<T, N>(&self, target: &T, navigator: &N) -> Option<NavigationRequest>
    where
        T: ClickTarget + ?Sized,
        N: Navigator + ?Sized,
    {
        if self.state.read().await.result.as_success().is_none() {
            return None;
        }
        let request = resolve_click(target, &self.host)?;
        info!("Navigating to {} on {}", request.path, request.host);
        navigator.jump(request.clone());
        Some(request)
    }

    pub async fn result(&self) -> PipelineResult {
        self.state.read().await.result.clone()
    }

    pub async fn mode(&self) -> Mode {
        self.state.read().await.mode
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn is_current(state: &SessionState, ticket: RequestTicket) -> bool {
        state.generation == ticket.generation && state.mode == ticket.mode
    }
}
