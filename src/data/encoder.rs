// ============================================================
// Layer 4 — Stroke Encoder
// ============================================================
// Turns one RawDrawing into model-ready ink.
//
//   strokes ──flatten──▶ (x, y, pen_lift) per point
//           ──normalize──▶ x, y scaled into [0, 1] per axis
//           ──delta──▶ (Δx, Δy, pen_lift), first point dropped
//
// pen_lift is 1.0 on the last point of every stroke, 0.0 elsewhere.
// A drawing with T points encodes to T - 1 steps; T <= 1 gives an
// empty ink sequence, which the caller reports as Empty.

use crate::data::dataset::SketchSample;
use crate::domain::drawing::{RawDrawing, Stroke};
use crate::domain::error::{SketchError, SketchResult};
use crate::domain::vocabulary::ClassVocabulary;

/// One encoded time step: `[Δx, Δy, pen_lift]`.
pub type InkPoint = [f32; 3];

#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeEncoder;

impl StrokeEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a drawing and resolve its label against the vocabulary.
    pub fn encode(&self, raw: &RawDrawing, vocab: &ClassVocabulary) -> SketchResult<SketchSample> {
        let label_index = vocab.index_of(&raw.word).ok_or_else(|| {
            SketchError::malformed(0, format!("label '{}' is not in the class vocabulary", raw.word))
        })?;
        let ink = self.encode_ink(raw)?;

        Ok(SketchSample::new(ink, raw.word.clone(), label_index))
    }

    /// Encode only the strokes; no label lookup.
    pub fn encode_ink(&self, raw: &RawDrawing) -> SketchResult<Vec<InkPoint>> {
        let strokes = raw.strokes()?;
        tracing::trace!("Encoding '{}': {} points", raw.word, raw.total_points());
        let mut points = flatten(&strokes);
        normalize(&mut points);
        Ok(delta_encode(&points))
    }
}

/// Concatenate strokes, flagging the last point of each.
pub fn flatten(strokes: &[Stroke<'_>]) -> Vec<InkPoint> {
    let total = strokes.iter().map(|s| s.xs.len()).sum();
    let mut points = Vec::with_capacity(total);

    for stroke in strokes {
        let last = stroke.xs.len().saturating_sub(1);
        for (i, (&x, &y)) in stroke.xs.iter().zip(stroke.ys).enumerate() {
            let pen_lift = if i == last { 1.0 } else { 0.0 };
            points.push([x, y, pen_lift]);
        }
    }

    points
}

/// Scale x and y into [0, 1] using the drawing's bounding box.
/// A collapsed axis (max == min) gets scale 1, so it maps to all zeros.
pub fn normalize(points: &mut [InkPoint]) {
    if points.is_empty() {
        return;
    }

    let mut lower = [f32::INFINITY; 2];
    let mut upper = [f32::NEG_INFINITY; 2];
    for point in points.iter() {
        for axis in 0..2 {
            lower[axis] = lower[axis].min(point[axis]);
            upper[axis] = upper[axis].max(point[axis]);
        }
    }

    let scale = [0, 1].map(|axis| match upper[axis] - lower[axis] {
        s if s == 0.0 => 1.0,
        s => s,
    });

    for point in points.iter_mut() {
        for axis in 0..2 {
            point[axis] = (point[axis] - lower[axis]) / scale[axis];
        }
    }
}

/// Offsets from the previous point; the first point has no
/// predecessor and is dropped. pen_lift is carried unchanged.
pub fn delta_encode(points: &[InkPoint]) -> Vec<InkPoint> {
    points
        .windows(2)
        .map(|pair| {
            let [prev, cur] = [pair[0], pair[1]];
            [cur[0] - prev[0], cur[1] - prev[1], cur[2]]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn square() -> RawDrawing {
        RawDrawing::from_json(r#"{"word":"square","drawing":[[[0,10],[0,0]],[[10,10],[0,10]]]}"#)
            .unwrap()
    }

    fn vocab() -> ClassVocabulary {
        ClassVocabulary::new(["cat", "dog", "square"]).unwrap()
    }

    #[test]
    fn test_two_stroke_square() {
        let sample = StrokeEncoder::new().encode(&square(), &vocab()).unwrap();

        assert_eq!(sample.length(), 3);
        assert_eq!(sample.label, "square");
        assert_eq!(sample.label_index, 2);
        // end of stroke 1, start of stroke 2, end of stroke 2
        assert_eq!(sample.ink[0], [1.0, 0.0, 1.0]);
        assert_eq!(sample.ink[1], [0.0, 0.0, 0.0]);
        assert_eq!(sample.ink[2], [0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_point_is_empty() {
        let raw = RawDrawing::from_json(r#"{"word":"circle","drawing":[[[5],[5]]]}"#).unwrap();
        let ink = StrokeEncoder::new().encode_ink(&raw).unwrap();
        assert!(ink.is_empty());
    }

    #[test]
    fn test_no_points_is_empty() {
        let raw = RawDrawing::new("circle", vec![]);
        assert!(StrokeEncoder::new().encode_ink(&raw).unwrap().is_empty());

        let raw = RawDrawing::new("circle", vec![vec![vec![], vec![]]]);
        assert!(StrokeEncoder::new().encode_ink(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_label() {
        let raw = RawDrawing::new("horse", vec![vec![vec![0.0, 1.0], vec![0.0, 1.0]]]);
        let err = StrokeEncoder::new().encode(&raw, &vocab()).unwrap_err();
        assert!(err.to_string().contains("'horse'"));
    }

    #[test]
    fn test_mismatched_stroke_is_malformed() {
        let raw = RawDrawing::new("cat", vec![vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0]]]);
        let err = StrokeEncoder::new().encode(&raw, &vocab()).unwrap_err();
        assert!(matches!(err, SketchError::MalformedInput { .. }));
    }

    #[test]
    fn test_huge_coordinate_never_becomes_nan() {
        let raw = RawDrawing::from_json(r#"{"word":"cat","drawing":[[[0,-1e39,4],[0,2,4]]]}"#)
            .unwrap();
        let err = StrokeEncoder::new().encode(&raw, &vocab()).unwrap_err();
        assert!(matches!(err, SketchError::MalformedInput { .. }));
    }

    #[test]
    fn test_collapsed_axis_is_zero() {
        // vertical line: every x is 7
        let mut points = vec![[7.0, 0.0, 0.0], [7.0, 3.0, 0.0], [7.0, 9.0, 1.0]];
        normalize(&mut points);
        for point in &points {
            assert_eq!(point[0], 0.0);
            assert!(point[1].is_finite());
        }
        assert_abs_diff_eq!(points[1][1], 1.0 / 3.0, epsilon = 1e-6);

        let ink = delta_encode(&points);
        assert!(ink.iter().flatten().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_single_point_normalizes_to_origin() {
        let mut points = vec![[5.0, 5.0, 1.0]];
        normalize(&mut points);
        assert_eq!(points, vec![[0.0, 0.0, 1.0]]);
    }

    fn strokes_strategy() -> impl Strategy<Value = Vec<Vec<(f32, f32)>>> {
        prop::collection::vec(
            prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..12),
            0..6,
        )
    }

    fn to_raw(strokes: &[Vec<(f32, f32)>]) -> RawDrawing {
        let drawing: Vec<Vec<Vec<f32>>> = strokes
            .iter()
            .map(|points| {
                let (xs, ys): (Vec<f32>, Vec<f32>) = points.iter().copied().unzip();
                vec![xs, ys]
            })
            .collect();
        RawDrawing::new("cat", drawing)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_encoded_length_is_points_minus_one(strokes in strokes_strategy()) {
            let raw   = to_raw(&strokes);
            let total = raw.total_points();
            let ink   = StrokeEncoder::new().encode_ink(&raw).unwrap();
            prop_assert_eq!(ink.len(), total.saturating_sub(1));
        }

        #[test]
        fn prop_pen_lift_marks_stroke_ends(strokes in strokes_strategy()) {
            let raw    = to_raw(&strokes);
            let parsed = raw.strokes().unwrap();
            let points = flatten(&parsed);
            let ends: usize = strokes.iter().filter(|s| !s.is_empty()).count();
            let lifts = points.iter().filter(|p| p[2] == 1.0).count();
            prop_assert_eq!(lifts, ends);
            if let Some(last) = points.last() {
                prop_assert_eq!(last[2], 1.0);
            }
        }

        #[test]
        fn prop_normalized_axes_span_unit_range(strokes in strokes_strategy()) {
            let raw    = to_raw(&strokes);
            let parsed = raw.strokes().unwrap();
            let mut points = flatten(&parsed);
            let distinct: Vec<bool> = (0..2)
                .map(|axis| points.iter().any(|p| points.first().is_some_and(|f| f[axis] != p[axis])))
                .collect();
            normalize(&mut points);

            for axis in 0..2 {
                if !distinct[axis] {
                    prop_assert!(points.iter().all(|p| p[axis] == 0.0));
                    continue;
                }
                let lo = points.iter().map(|p| p[axis]).fold(f32::INFINITY, f32::min);
                let hi = points.iter().map(|p| p[axis]).fold(f32::NEG_INFINITY, f32::max);
                prop_assert!(lo.abs() < 1e-6);
                prop_assert!((hi - 1.0).abs() < 1e-5);
            }
        }
    }
}
