// Map lifecycle: initializing -> ready -> released
use crate::error::PaneError;
use crate::model::{LineLayerSpec, SequenceOverlay, VectorSourceSpec};

/// The calls the lifecycle needs from a map to put the sequence overlay on it.
pub trait LayerTarget {
    fn has_source(&self, id: &str) -> bool;
    fn has_layer(&self, id: &str) -> bool;
    fn add_vector_source(&self, id: &str, spec: &VectorSourceSpec) -> Result<(), PaneError>;
    fn add_line_layer(&self, spec: &LineLayerSpec, before: Option<&str>) -> Result<(), PaneError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapPhase {
    /// Map created, style still loading. Sources can't be added yet.
    #[default]
    Initializing,
    Ready,
    Released,
}

#[derive(Debug, Default)]
pub struct MapLifecycle {
    phase: MapPhase,
    overlay_attached: bool,
}

impl MapLifecycle {
    pub fn phase(&self) -> MapPhase {
        self.phase
    }

    pub fn overlay_attached(&self) -> bool {
        self.overlay_attached
    }

    /// The renderer finished loading its style.
    pub fn style_loaded(&mut self) -> Result<(), PaneError> {
        match self.phase {
            MapPhase::Initializing | MapPhase::Ready => {
                self.phase = MapPhase::Ready;
                Ok(())
            }
            MapPhase::Released => Err(PaneError::Released),
        }
    }

    pub fn release(&mut self) {
        self.phase = MapPhase::Released;
    }

    /// Adds the overlay's source and layer. Only valid once ready; attaching
    /// twice leaves the map untouched.
    pub fn attach_overlay<T: LayerTarget>(
        &mut self,
        target: &T,
        overlay: &SequenceOverlay,
    ) -> Result<(), PaneError> {
        match self.phase {
            MapPhase::Initializing => return Err(PaneError::NotReady),
            MapPhase::Released => return Err(PaneError::Released),
            MapPhase::Ready => {}
        }
        if self.overlay_attached {
            return Ok(());
        }

        if !target.has_source(&overlay.source_id) {
            target.add_vector_source(&overlay.source_id, &overlay.source)?;
        }
        if !target.has_layer(&overlay.layer.id) {
            let before = match overlay.before_layer.as_deref() {
                Some(id) if target.has_layer(id) => Some(id),
                Some(id) => {
                    tracing::warn!("style has no layer `{}`; sequence overlay goes on top", id);
                    None
                }
                None => None,
            };
            target.add_line_layer(&overlay.layer, before)?;
        }
        self.overlay_attached = true;
        Ok(())
    }
}
