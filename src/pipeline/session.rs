//! Editor session: the state behind the single editing screen.
//!
//! Every control change (new photo, new filter, new intensity) funnels into
//! one synchronous "reconfigure and re-render" step, so a rendered image is
//! never stale.

use crate::config::SessionConfig;
use crate::core::error::{RenderError, SaveError, SaveResult};
use crate::core::filter::FilterKind;
use crate::core::param::Intensity;
use crate::core::types::{RenderedImage, SourceImage};
use crate::filters::FilterSelector;
use crate::library::{ImageLibraryWriter, SaveTicket};
use crate::pipeline::render::render;
use std::sync::Arc;

/// Outcome of the most recent render attempt.
#[derive(Debug, Clone)]
pub enum RenderState {
    /// No source image is bound, nothing was attempted.
    Empty,
    /// The current inputs rendered successfully.
    Rendered(RenderedImage),
    /// The current inputs were rendered and the filter produced no output.
    Failed(RenderError),
}

impl RenderState {
    /// The rendered image, if the last render succeeded.
    pub fn image(&self) -> Option<&RenderedImage> {
        match self {
            RenderState::Rendered(image) => Some(image),
            _ => None,
        }
    }

    /// The render error, if the last render failed.
    pub fn error(&self) -> Option<&RenderError> {
        match self {
            RenderState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderState::Empty)
    }
}

/// Render listener callback type.
pub type RenderListener = dyn Fn(&RenderState) + Send + Sync;

/// Owns the active filter, intensity, source photo and latest render.
pub struct EditorSession {
    selector: FilterSelector,
    intensity: Intensity,
    source: Option<SourceImage>,
    state: RenderState,
    listener: Option<Arc<RenderListener>>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("filter", &self.selector.active())
            .field("intensity", &self.intensity)
            .field("source", &self.source.as_ref().map(|s| s.dimensions()))
            .field("state", &self.state)
            .field("listener", &self.listener.as_ref().map(|_| "<listener>"))
            .finish()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(FilterKind::default(), Intensity::default())
    }
}

impl EditorSession {
    /// Create a session with no photo bound.
    pub fn new(filter: FilterKind, intensity: Intensity) -> Self {
        Self {
            selector: FilterSelector::new(filter),
            intensity,
            source: None,
            state: RenderState::Empty,
            listener: None,
        }
    }

    /// Create a session from the `[session]` config table.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.filter, Intensity::clamped(config.intensity))
    }

    /// Set a callback that receives every new render state.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&RenderState) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Bind a new photo and re-render.
    pub fn load_image(&mut self, source: SourceImage) -> &RenderState {
        log::debug!("Loaded source image {:?}", source.dimensions());
        self.source = Some(source);
        self.rerender()
    }

    /// Drop the bound photo. The session returns to [`RenderState::Empty`].
    pub fn clear_image(&mut self) -> &RenderState {
        self.source = None;
        self.rerender()
    }

    /// Make `kind` the active filter and re-render.
    pub fn select_filter(&mut self, kind: FilterKind) -> &RenderState {
        let previous = self.selector.select(kind);
        log::debug!("Filter changed {} -> {}", previous, kind);
        self.rerender()
    }

    /// Move the intensity control and re-render.
    ///
    /// The value is passed through unchanged; clamping belongs to whoever
    /// reads the control.
    pub fn set_intensity(&mut self, intensity: Intensity) -> &RenderState {
        self.intensity = intensity;
        self.rerender()
    }

    pub fn filter(&self) -> FilterKind {
        self.selector.active()
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// The latest rendered image, if any.
    pub fn rendered(&self) -> Option<&RenderedImage> {
        self.state.image()
    }

    /// Hand the latest render to a library writer.
    ///
    /// Returns immediately; the ticket resolves once the writer is done.
    pub fn save(&self, writer: &dyn ImageLibraryWriter) -> SaveResult<SaveTicket> {
        let image = self.rendered().ok_or(SaveError::NothingRendered)?;
        Ok(writer.write(image))
    }

    fn rerender(&mut self) -> &RenderState {
        self.state = match &self.source {
            None => RenderState::Empty,
            Some(source) => match render(source, self.selector.active(), self.intensity) {
                Ok(image) => RenderState::Rendered(image),
                Err(e) => {
                    match e.filter() {
                        Some(kind) => log::warn!("Render failed in {}: {}", kind, e),
                        None => log::warn!("Render failed: {}", e),
                    }
                    RenderState::Failed(e)
                }
            },
        };

        if let Some(listener) = &self.listener {
            listener(&self.state);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::param::ParameterKey;
    use crate::library::{SavedImage, SaveTicket};
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::Mutex;

    fn photo() -> SourceImage {
        SourceImage::new(DynamicImage::ImageRgba8(RgbaImage::from_fn(12, 9, |x, y| {
            Rgba([(x * 20) as u8, (y * 25) as u8, 60, 255])
        })))
    }

    struct RecordingWriter {
        written: Mutex<Vec<FilterKind>>,
    }

    impl ImageLibraryWriter for RecordingWriter {
        fn write(&self, image: &RenderedImage) -> SaveTicket {
            self.written.lock().unwrap().push(image.filter);
            SaveTicket::resolved(Ok(SavedImage {
                path: "memory".into(),
                bytes: 0,
                format: crate::core::types::ImageFormat::Png,
            }))
        }
    }

    #[test]
    fn test_starts_empty() {
        let session = EditorSession::default();
        assert!(session.state().is_empty());
        assert!(session.rendered().is_none());
        assert_eq!(session.filter(), FilterKind::SepiaTone);
        assert_eq!(session.intensity(), Intensity::new(0.5));
    }

    #[test]
    fn test_controls_without_source_stay_empty() {
        let mut session = EditorSession::default();
        assert!(session.select_filter(FilterKind::Vignette).is_empty());
        assert!(session.set_intensity(Intensity::new(0.9)).is_empty());
        assert_eq!(session.filter(), FilterKind::Vignette);
    }

    #[test]
    fn test_every_change_rerenders() {
        let mut session = EditorSession::default();
        session.load_image(photo());
        assert_eq!(session.rendered().unwrap().filter, FilterKind::SepiaTone);

        session.select_filter(FilterKind::GaussianBlur);
        let rendered = session.rendered().unwrap();
        assert_eq!(rendered.filter, FilterKind::GaussianBlur);
        assert_eq!(rendered.parameters.get(ParameterKey::Radius), Some(100.0));

        session.set_intensity(Intensity::new(0.0));
        let rendered = session.rendered().unwrap();
        assert_eq!(rendered.intensity, Intensity::new(0.0));
        assert_eq!(rendered.pixels(), &photo().image().to_rgba8());
    }

    #[test]
    fn test_clear_image_drops_render() {
        let mut session = EditorSession::default();
        session.load_image(photo());
        assert!(session.rendered().is_some());
        assert!(session.clear_image().is_empty());
    }

    #[test]
    fn test_empty_source_is_failed_not_empty() {
        let mut session = EditorSession::default();
        let empty = SourceImage::new(DynamicImage::ImageRgba8(RgbaImage::new(0, 0)));
        let state = session.load_image(empty);
        assert!(matches!(state.error(), Some(RenderError::EmptyExtent { .. })));
        assert!(session.rendered().is_none());
    }

    #[test]
    fn test_listener_sees_each_render() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut session = EditorSession::default().with_listener(move |state| {
            sink.lock().unwrap().push(state.image().map(|i| i.filter));
        });

        session.select_filter(FilterKind::Edges);
        session.load_image(photo());
        session.select_filter(FilterKind::Pixellate);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![None, Some(FilterKind::Edges), Some(FilterKind::Pixellate)]
        );
    }

    #[test]
    fn test_save_requires_render() {
        let writer = RecordingWriter { written: Mutex::new(Vec::new()) };
        let mut session = EditorSession::default();
        assert!(matches!(session.save(&writer), Err(SaveError::NothingRendered)));

        session.load_image(photo());
        let ticket = session.save(&writer).unwrap();
        assert!(ticket.wait().is_ok());
        assert_eq!(*writer.written.lock().unwrap(), vec![FilterKind::SepiaTone]);
    }

    #[test]
    fn test_from_config_clamps_intensity() {
        let config = SessionConfig {
            filter: FilterKind::Crystallize,
            intensity: 3.0,
        };
        let session = EditorSession::from_config(&config);
        assert_eq!(session.filter(), FilterKind::Crystallize);
        assert_eq!(session.intensity(), Intensity::MAX);
    }
}
