//! WASM bindings for chordgram-core
//!
//! Lets a browser-side visualizer run the estimation pipeline on annotation
//! text and look up chord colors for axis layout.

#[cfg(feature = "wasm")]
use crate::model::builder::{ConditionalRow, JointRow, ModelBuilder, ModelConfig};
#[cfg(feature = "wasm")]
use crate::types::chord::Chord;
#[cfg(feature = "wasm")]
use crate::types::track::ChordTrack;
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
#[derive(serde::Serialize)]
struct AnalysisResult {
    source_entries: usize,
    augmented_entries: usize,
    joint: Vec<JointRow>,
    conditional: Vec<ConditionalRow>,
}

/// Build joint and conditional tables from tab-separated annotation text
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn analyze_annotation(text: &str, transpositions: usize) -> Result<JsValue, JsValue> {
    let track = ChordTrack::parse(text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let model = ModelBuilder::new(ModelConfig::with_transpositions(transpositions))
        .build(&track)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let result = AnalysisResult {
        source_entries: model.source_entries(),
        augmented_entries: model.augmented_entries(),
        joint: model.joint_rows(),
        conditional: model.conditional_rows(),
    };
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `#rrggbb` color for a chord label
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn chord_color(label: &str) -> Result<String, JsValue> {
    Chord::parse(label)
        .map(|chord| chord.to_color().to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Canonical form of a chord label (`Bb:maj` -> `A#:maj`)
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn canonical_label(label: &str) -> Result<String, JsValue> {
    Chord::parse(label)
        .map(|chord| chord.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
