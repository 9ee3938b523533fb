//! Smart arrangement session.
//!
//! Runs one arrangement at a time against a shared [`Scene`]:
//!
//! 1. snapshot the selection and build the request under the scene lock;
//! 2. await the layout service with the lock released, so the scene stays
//!    editable;
//! 3. re-read the scene, reconcile and commit under the lock again.
//!
//! A failed request still removes stale derived elements from earlier passes.

use crate::layout::LayoutService;
use layerkit_core::{
    emit, AppEvent, ArrangeError, ArrangeEvent, ErrorEvent, SceneEvent, ThreadSafe,
};
use layerkit_designer::arrangement::{
    cleanup, reconcile, ArrangeRequest, ArrangementResult, Clock, IdSource, ReconcileOptions,
    SystemClock, TargetSize, UuidIdSource, DEFAULT_SPACING, FALLBACK_CANVAS_SIZE,
};
use layerkit_designer::{ops, Element, ResizeRoute, Scene};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Gap between existing content and the arranged cluster.
    pub spacing: f64,
    /// Canvas size sent when the scene is empty and has no viewport.
    pub fallback_canvas: (f64, f64),
    /// Match against the scene as it is at commit time, dropping selected
    /// elements deleted while the request was in flight.
    pub verify_at_commit: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            fallback_canvas: FALLBACK_CANVAS_SIZE,
            verify_at_commit: true,
        }
    }
}

/// User-visible status message for an arrangement.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Request sent, user may keep working.
    Arranging { layers: usize },
    Arranged { created: usize },
    /// The service answered but nothing could be arranged.
    Failed,
    ModelOverloaded,
    /// Transport failure.
    Error,
    /// The request was not sent.
    Rejected { reason: String },
}

impl Notice {
    pub fn for_error(err: &ArrangeError) -> Self {
        match err {
            ArrangeError::ModelOverloaded => Notice::ModelOverloaded,
            ArrangeError::Transport { .. } | ArrangeError::CommitFailed { .. } => Notice::Error,
            ArrangeError::ServiceRejected { .. }
            | ArrangeError::NoMatches { .. }
            | ArrangeError::StaleSelection { .. } => Notice::Failed,
            other => Notice::Rejected {
                reason: other.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Arranging { .. } | Notice::Arranged { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Arranging { layers } => write!(
                f,
                "Arranging {} layers, you can keep working in the meantime...",
                layers
            ),
            Notice::Arranged { created } => {
                write!(f, "Smart arrangement complete! Created {} new layers", created)
            }
            Notice::Failed => write!(f, "Layer arrangement failed"),
            Notice::ModelOverloaded => {
                write!(f, "The layout model is overloaded, please try again later")
            }
            Notice::Error => write!(f, "Layer arrangement error, please try again"),
            Notice::Rejected { reason } => write!(f, "{}", reason),
        }
    }
}

/// Result of a successful arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeOutcome {
    /// Ids of the derived elements, now the active selection.
    pub created: Vec<String>,
    /// Stale derived elements removed from earlier passes.
    pub removed: Vec<String>,
    /// Arrangement ids that produced no element.
    pub unmatched: Vec<String>,
    /// Selected elements deleted while the request was in flight.
    pub vanished: Vec<String>,
    pub fallback_matches: usize,
    pub notice: Notice,
}

/// What a resize request turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    /// The single selected element was resized in place.
    Direct { id: String },
    Arranged(ArrangeOutcome),
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ArrangeError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ArrangeError::AlreadyArranging)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives smart arrangement for one scene.
pub struct ArrangeSession {
    scene: ThreadSafe<Scene>,
    service: Arc<dyn LayoutService>,
    options: SessionOptions,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    in_flight: AtomicBool,
}

impl fmt::Debug for ArrangeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrangeSession")
            .field("service", &self.service.name())
            .field("options", &self.options)
            .field("in_flight", &self.is_arranging())
            .finish()
    }
}

impl ArrangeSession {
    pub fn new(scene: ThreadSafe<Scene>, service: Arc<dyn LayoutService>) -> Self {
        Self {
            scene,
            service,
            options: SessionOptions::default(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdSource),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the time and id sources used for derived elements.
    pub fn with_sources(mut self, clock: Arc<dyn Clock>, ids: Arc<dyn IdSource>) -> Self {
        self.clock = clock;
        self.ids = ids;
        self
    }

    pub fn scene(&self) -> &ThreadSafe<Scene> {
        &self.scene
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// True while a request is outstanding.
    pub fn is_arranging(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resize the selection to `target`.
    ///
    /// One selected element is resized directly; two or more go through
    /// [`ArrangeSession::arrange`].
    pub async fn resize(&self, target: TargetSize) -> Result<ResizeOutcome, ArrangeError> {
        let count = self.scene.lock().selected_ids().len();
        match ResizeRoute::for_selection(count) {
            ResizeRoute::None => Err(ArrangeError::TooFewElements { count }),
            ResizeRoute::Direct => {
                let target = target.validate()?;
                let mut scene = self.scene.lock();
                let id = ops::resize_single(
                    &mut scene,
                    target.width,
                    target.height,
                    self.clock.as_ref(),
                    self.ids.as_ref(),
                )
                .map_err(|e| match e {
                    layerkit_core::Error::Arrange(e) => e,
                    other => ArrangeError::CommitFailed {
                        message: other.to_string(),
                    },
                })?;
                Ok(ResizeOutcome::Direct { id })
            }
            ResizeRoute::Arrange => self.arrange(target).await.map(ResizeOutcome::Arranged),
        }
    }

    /// Arrange the selected elements into `target` through the layout service.
    pub async fn arrange(&self, target: TargetSize) -> Result<ArrangeOutcome, ArrangeError> {
        let result = self.arrange_inner(target).await;
        if let Err(err) = &result {
            let notice = Notice::for_error(err);
            tracing::warn!("Arrangement failed: {}", err);
            emit!(AppEvent::Arrange(ArrangeEvent::Failed {
                reason: notice.to_string(),
                overloaded: matches!(err, ArrangeError::ModelOverloaded),
            }));
        }
        result
    }

    async fn arrange_inner(&self, target: TargetSize) -> Result<ArrangeOutcome, ArrangeError> {
        let (selection, request) = {
            let scene = self.scene.lock();
            let selection = scene.selected_elements();
            if selection.len() < 2 {
                return Err(ArrangeError::TooFewElements {
                    count: selection.len(),
                });
            }
            let viewport = scene.viewport().or(Some(self.options.fallback_canvas));
            let request = ArrangeRequest::build(&selection, scene.elements(), viewport, target)?;
            (selection, request)
        };

        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let notice = Notice::Arranging {
            layers: selection.len(),
        };
        tracing::info!("{} (service: {})", notice, self.service.name());
        emit!(AppEvent::Arrange(ArrangeEvent::Started {
            selected: selection.len(),
            target_width: request.target_width,
            target_height: request.target_height,
        }));

        let response = match self.service.arrange(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Layout service request failed: {}", e);
                self.commit_cleanup(&selection)?;
                return Err(e.into());
            }
        };

        if !response.success {
            let message = response.message.unwrap_or_default();
            self.commit_cleanup(&selection)?;
            if message.to_ascii_lowercase().contains("overloaded") {
                return Err(ArrangeError::ModelOverloaded);
            }
            return Err(ArrangeError::ServiceRejected { message });
        }

        self.commit(&selection, &response.arrangements)
    }

    /// Remove stale derived elements only.
    fn commit_cleanup(&self, selection: &[Element]) -> Result<(), ArrangeError> {
        let mut scene = self.scene.lock();
        let result = cleanup(selection, scene.elements());
        if result.removed_ids.is_empty() {
            return Ok(());
        }
        scene.replace_all(result.kept).map_err(commit_failed)?;
        emit!(AppEvent::Scene(SceneEvent::ElementsChanged { count: scene.len() }));
        Ok(())
    }

    fn commit(
        &self,
        snapshot: &[Element],
        arrangements: &[ArrangementResult],
    ) -> Result<ArrangeOutcome, ArrangeError> {
        let mut scene = self.scene.lock();

        let mut live = Vec::with_capacity(snapshot.len());
        let mut vanished = Vec::new();
        for el in snapshot {
            match scene.get(&el.id) {
                Some(current) => live.push(current.clone()),
                None => vanished.push(el.id.clone()),
            }
        }

        let selection = if self.options.verify_at_commit {
            if !vanished.is_empty() {
                tracing::warn!(
                    "{} selected element(s) were deleted during arrangement: {:?}",
                    vanished.len(),
                    vanished
                );
                emit!(AppEvent::Error(ErrorEvent::Warning {
                    message: format!("{} selected layer(s) were deleted while arranging", vanished.len()),
                }));
            }
            if live.is_empty() {
                let kept = cleanup(snapshot, scene.elements()).kept;
                scene.replace_all(kept).map_err(commit_failed)?;
                emit!(AppEvent::Scene(SceneEvent::ElementsChanged { count: scene.len() }));
                return Err(ArrangeError::StaleSelection { missing: vanished });
            }
            live
        } else {
            snapshot.to_vec()
        };

        let options = ReconcileOptions {
            spacing: self.options.spacing,
            clock: self.clock.as_ref(),
            ids: self.ids.as_ref(),
        };
        let result = reconcile(&selection, arrangements, scene.elements(), &options);
        let failure = result.failure();

        scene.replace_all(result.elements).map_err(commit_failed)?;
        emit!(AppEvent::Scene(SceneEvent::ElementsChanged { count: scene.len() }));

        if let Some(err) = failure {
            return Err(err);
        }

        scene
            .select_only(result.derived_ids.iter().cloned())
            .map_err(commit_failed)?;
        emit!(AppEvent::Scene(SceneEvent::SelectionChanged {
            ids: result.derived_ids.clone(),
        }));

        let notice = Notice::Arranged {
            created: result.derived_ids.len(),
        };
        tracing::info!("{}", notice);
        emit!(AppEvent::Arrange(ArrangeEvent::Succeeded {
            created: result.derived_ids.len(),
            removed: result.removed_ids.len(),
        }));

        Ok(ArrangeOutcome {
            created: result.derived_ids,
            removed: result.removed_ids,
            unmatched: result.unmatched_ids,
            vanished,
            fallback_matches: result.fallback_matches.len(),
            notice,
        })
    }
}

fn commit_failed(err: layerkit_core::Error) -> ArrangeError {
    ArrangeError::CommitFailed {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _g = InFlightGuard::acquire(&flag).unwrap();
            assert!(matches!(
                InFlightGuard::acquire(&flag),
                Err(ArrangeError::AlreadyArranging)
            ));
        }
        assert!(InFlightGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn test_notice_for_error() {
        assert_eq!(Notice::for_error(&ArrangeError::ModelOverloaded), Notice::ModelOverloaded);
        assert_eq!(
            Notice::for_error(&ArrangeError::NoMatches { unmatched: vec![] }),
            Notice::Failed
        );
        assert!(matches!(
            Notice::for_error(&ArrangeError::TooFewElements { count: 1 }),
            Notice::Rejected { .. }
        ));
        assert_eq!(
            Notice::Arranged { created: 3 }.to_string(),
            "Smart arrangement complete! Created 3 new layers"
        );
    }
}
