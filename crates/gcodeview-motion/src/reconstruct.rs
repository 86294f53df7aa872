//! Reconstruction driver
//!
//! Feeds layer blocks through the motion state machine in document order,
//! reporting progress once per layer and honoring cancellation between layers.

use crate::error::ReconstructError;
use crate::gcode::{scan_preamble, SlicedGcode};
use crate::model::GcodeModel;
use crate::motion::ModelBuilder;
use gcodeview_core::Tracer;
use gcodeview_settings::ReconstructConfig;
use tracing::{debug, warn};

/// Turns sliced G-code into a [`GcodeModel`]
#[derive(Debug, Clone, Default)]
pub struct GcodeReconstructor {
    config: ReconstructConfig,
}

impl GcodeReconstructor {
    pub fn new(config: ReconstructConfig) -> Result<Self, ReconstructError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconstructConfig {
        &self.config
    }

    /// Reconstruct a model from preamble and layer blocks.
    ///
    /// Returns [`ReconstructError::Interrupted`] with the partial model when
    /// the tracer reports an interruption after a layer.
    pub fn reconstruct(
        &self,
        gcode: &SlicedGcode,
        tracer: &mut dyn Tracer,
    ) -> Result<GcodeModel, ReconstructError> {
        let print_info = scan_preamble(gcode.prefix());
        let mut builder = ModelBuilder::new(&self.config, print_info);

        let layers_total = gcode.layer_count();
        debug!("Reconstructing {} layers", layers_total);

        for (index, layer) in gcode.layers().iter().enumerate() {
            builder.process_layer(layer, index);

            let layers_done = index + 1;
            tracer.progress(layers_done as f32 / layers_total as f32);
            if tracer.interrupted() {
                let message = format!("stopped after layer {} of {}", layers_done, layers_total);
                warn!("Reconstruction interrupted: {}", message);
                tracer.failed(&message);
                return Err(ReconstructError::Interrupted {
                    layers_done,
                    layers_total,
                    message,
                    partial: Box::new(builder.finish(true)),
                });
            }
        }

        let model = builder.finish(false);
        let info = model.base_info();
        debug!(
            "Reconstruction complete: layers={}, moves={}, positions={}, seams={}, retractions={}, nozzles={}",
            info.layers,
            info.total_steps,
            model.positions().len(),
            model.seams().len(),
            model.retractions().len(),
            info.nozzle_count
        );
        Ok(model)
    }

    /// Split `text` and reconstruct it
    pub fn reconstruct_text(
        &self,
        text: &str,
        tracer: &mut dyn Tracer,
    ) -> Result<GcodeModel, ReconstructError> {
        self.reconstruct(&SlicedGcode::from_text(text), tracer)
    }
}
