//! Post-pass over a finished move list.

use super::{BaseInfo, GcodeModel, Move};
use gcodeview_core::ValueRange;
use std::collections::BTreeMap;
use tracing::debug;

/// Rewrite raw feed rates to `[0, 1]` over `range`; all zero when the range is
/// empty or flat
pub fn normalize_speeds(moves: &mut [Move], range: Option<ValueRange>) {
    let (min, span) = match range {
        Some(r) if r.span() > 0.0 => (r.min, r.span()),
        _ => {
            moves.iter_mut().for_each(|mv| mv.speed = 0.0);
            return;
        }
    };
    for mv in moves.iter_mut() {
        mv.speed = ((mv.speed - min) / span).clamp(0.0, 1.0);
    }
}

/// Report everything as one synthetic layer.
///
/// Step maps are merged into one, with ordinals offset by the non-empty line
/// counts of the layers before them.
pub fn collapse_layers(info: &mut BaseInfo, step_index_maps: &mut Vec<Vec<usize>>, line_counts: &[usize]) {
    debug!(
        "Collapsing {} layers into one ({} moves)",
        step_index_maps.len(),
        info.total_steps
    );

    info.layer_numbers.clear();
    info.layers = 1;
    info.steps = vec![info.total_steps];

    if !info.layer_times.is_empty() {
        let total: f32 = info.layer_times.values().sum();
        info.layer_times = BTreeMap::from([(0, total)]);
    }

    if step_index_maps.is_empty() {
        return;
    }
    let mut merged = Vec::with_capacity(info.total_steps);
    let mut offset = 0;
    for (map, count) in step_index_maps.iter().zip(line_counts) {
        merged.extend(map.iter().map(|ordinal| ordinal + offset));
        offset += count;
    }
    *step_index_maps = vec![merged];
}

/// Fill the sample-derived ranges of [`BaseInfo`]
pub fn summarize_samples(model: &mut GcodeModel) {
    let info = &mut model.base_info;
    info.line_width = ValueRange::from_values(
        model
            .layer_geometries
            .iter()
            .map(|g| g.width)
            .filter(|w| *w > 0.0),
    );
    info.layer_height = ValueRange::from_values(
        model
            .layer_geometries
            .iter()
            .map(|g| g.layer_height)
            .filter(|h| *h > 0.0),
    );
    info.temperature = ValueRange::from_values(
        model
            .temperatures
            .iter()
            .map(|t| t.nozzle)
            .filter(|n| *n > 0.0),
    );
    info.layer_time = ValueRange::from_values(info.layer_times.values().copied());
}
