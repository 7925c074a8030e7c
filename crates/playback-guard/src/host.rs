use tracing::{debug, info, warn};
use watch_state_models::MediaType;

use crate::blocklist::{BlockList, NavigationDecision};
use crate::engine::ContentFilterEngine;
use crate::surface::EmbeddedSurface;

/// Load lifecycle of the embedded surface. There is no automatic retry from
/// `Error`; the caller must request a new load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Epoch of one load request. Completion signals carry the generation they
/// belong to so stale ones can be discarded after a supersede.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadGeneration(u64);

/// Owns one embedded playback surface and its lifecycle. One instance per
/// active playback screen.
pub struct PlaybackHost {
    surface: EmbeddedSurface,
    blocklist: BlockList,
    state: LoadState,
    generation: u64,
    filter: Option<ContentFilterEngine>,
}

impl PlaybackHost {
    pub fn new(blocklist: BlockList) -> Self {
        let surface = EmbeddedSurface::new();
        // Pre-load gate; active even before the filter engine attaches.
        surface.install_navigation_policy(blocklist.clone());
        Self {
            surface,
            blocklist,
            state: LoadState::Idle,
            generation: 0,
            filter: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn surface(&self) -> &EmbeddedSurface {
        &self.surface
    }

    /// Request a load of the target URL. A fresh load never continues an
    /// existing `Loading` state: the surface is re-pointed under a new
    /// generation and any in-flight load is superseded.
    ///
    /// Returns `None` when the navigation gate rejected the target; that is
    /// silent suppression, not an error, and the host's state is unchanged.
    pub fn load(&mut self, url: &str) -> Option<LoadGeneration> {
        if self.surface.navigate(url) == NavigationDecision::Blocked {
            debug!(url, "load target rejected by navigation gate");
            return None;
        }

        // Release the previous generation's watchers before re-pointing.
        if let Some(filter) = self.filter.take() {
            filter.teardown();
        }

        self.generation += 1;
        self.state = LoadState::Loading;
        self.filter = Some(ContentFilterEngine::attach(
            &self.surface,
            self.blocklist.clone(),
        ));
        info!(generation = self.generation, url, "playback load requested");
        Some(LoadGeneration(self.generation))
    }

    fn is_stale(&self, generation: LoadGeneration) -> bool {
        generation.0 != self.generation
    }

    /// Surface signal: the load began.
    pub fn notify_load_started(&mut self, generation: LoadGeneration) {
        if self.is_stale(generation) {
            debug!(?generation, "ignoring stale load-started signal");
        }
    }

    /// Surface signal: content finished loading.
    pub fn notify_load_ended(&mut self, generation: LoadGeneration) {
        if self.is_stale(generation) {
            debug!(?generation, "ignoring stale load completion");
            return;
        }
        if self.state == LoadState::Loading {
            self.state = LoadState::Ready;
            info!(generation = generation.0, "playback surface ready");
        }
    }

    /// Surface signal: the load failed. The filter stays attached; filtering
    /// does not depend on load success. Only an in-flight load can fail: an
    /// error signal arriving after Ready or after teardown is ignored.
    pub fn notify_load_errored(&mut self, generation: LoadGeneration) {
        if self.is_stale(generation) {
            debug!(?generation, "ignoring stale load error");
            return;
        }
        if self.state == LoadState::Loading {
            self.state = LoadState::Error;
            warn!(generation = generation.0, "playback load failed");
        }
    }

    /// Tear down the surface, releasing the filter's timer and observer.
    pub fn teardown(&mut self) {
        if let Some(filter) = self.filter.take() {
            filter.teardown();
        }
        self.state = LoadState::Idle;
    }
}

/// Build the opaque player URL for a title. Series default to season 1,
/// episode 1 when unset.
pub fn stream_url(
    base_url: &str,
    id: u64,
    media_type: MediaType,
    season: Option<u32>,
    episode: Option<u32>,
) -> String {
    match media_type {
        MediaType::Movie => format!("{}/movie/{}", base_url, id),
        MediaType::Series => format!(
            "{}/tv/{}/{}/{}",
            base_url,
            id,
            season.unwrap_or(1),
            episode.unwrap_or(1)
        ),
    }
}
