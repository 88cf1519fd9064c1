use nalgebra as na;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{HapticsError, Result};
use crate::expression::Expr;
use crate::types::Rgb;

/// A "virtual graph": a polyline in the rig frame that can be touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub name: String,
    /// Source equation, kept for display only.
    #[serde(default)]
    pub equation: Option<String>,
    pub points: Vec<na::Vector3<f64>>,
    /// Touch distance threshold in mm.
    pub thickness: f64,
    pub color: Rgb,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Curve {
    pub fn new(name: &str, points: Vec<na::Vector3<f64>>, thickness: f64, color: Rgb) -> Curve {
        Curve {
            name: name.to_string(),
            equation: None,
            points,
            thickness,
            color,
            visible: true,
        }
    }

    /// Samples `y = expr(x)` over `x_range` in the plane `z = plane_z`.
    pub fn from_expression(
        name: &str,
        expr: &Expr,
        x_range: (f64, f64),
        samples: usize,
        plane_z: f64,
        thickness: f64,
        color: Rgb,
    ) -> Curve {
        Curve {
            points: sample_expression(expr, x_range, samples, plane_z),
            ..Curve::new(name, Vec::new(), thickness, color)
        }
    }
}

/// Evenly samples `expr` into polyline vertices, dropping non-finite values.
pub fn sample_expression(
    expr: &Expr,
    x_range: (f64, f64),
    samples: usize,
    plane_z: f64,
) -> Vec<na::Vector3<f64>> {
    let (x0, x1) = x_range;
    let step = if samples > 1 {
        (x1 - x0) / (samples - 1) as f64
    } else {
        0.0
    };
    (0..samples)
        .into_par_iter()
        .filter_map(|i| {
            let x = x0 + step * i as f64;
            let y = expr.eval(x);
            if y.is_finite() {
                Some(na::Vector3::new(x, y, plane_z))
            } else {
                None
            }
        })
        .collect()
}

/// An equation accepted from a parsed (non-fallback) command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationRecord {
    pub name: String,
    pub equation_str: String,
    #[serde(default)]
    pub lambda_str: Option<String>,
}

/// Insertion-ordered collection of curves.
///
/// Indices are stable under `push` and shift only when an earlier curve is
/// removed. The equation history outlives deletions and is only reset by
/// [`CurveSet::clear_history`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    curves: Vec<Curve>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<EquationRecord>,
}

impl CurveSet {
    pub fn new() -> CurveSet {
        CurveSet::default()
    }

    /// Appends a curve and returns its index.
    pub fn push(&mut self, curve: Curve) -> usize {
        log::info!("add curve {:?} ({} points)", curve.name, curve.points.len());
        self.curves.push(curve);
        self.curves.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Curve> {
        self.check_index(index)?;
        let curve = self.curves.remove(index);
        log::info!("remove curve {:?}", curve.name);
        Ok(curve)
    }

    pub fn pop(&mut self) -> Option<Curve> {
        let curve = self.curves.pop();
        if let Some(c) = &curve {
            log::info!("remove curve {:?}", c.name);
        }
        curve
    }

    /// Removes every curve, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.curves.len();
        self.curves.clear();
        log::info!("cleared {} curves", n);
        n
    }

    /// Flips visibility and returns the new state.
    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        let curve = &mut self.curves[index];
        curve.visible = !curve.visible;
        log::info!("curve {:?} visible: {}", curve.name, curve.visible);
        Ok(curve.visible)
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) -> Result<()> {
        self.check_index(index)?;
        self.curves[index].visible = visible;
        Ok(())
    }

    /// Replaces the polyline of an existing curve.
    pub fn set_points(&mut self, index: usize, points: Vec<na::Vector3<f64>>) -> Result<()> {
        self.check_index(index)?;
        self.curves[index].points = points;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Curve> {
        self.curves.get_mut(index)
    }

    /// First curve with this name.
    pub fn find_by_name(&self, name: &str) -> Option<(usize, &Curve)> {
        self.curves.iter().enumerate().find(|(_, c)| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn record_equation(&mut self, record: EquationRecord) {
        self.history.push(record);
    }

    pub fn equation_history(&self) -> &[EquationRecord] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        log::info!("equation history cleared");
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.curves.len() {
            return Err(HapticsError::CurveIndex {
                index,
                len: self.curves.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// A curve set shared between a control thread that edits it and a frame
/// thread that reads it.
///
/// Readers take a [`snapshot`](SharedCurveSet::snapshot) so that a frame is
/// evaluated against one consistent set.
#[derive(Debug, Clone, Default)]
pub struct SharedCurveSet {
    inner: Arc<RwLock<CurveSet>>,
}

impl SharedCurveSet {
    pub fn new(curves: CurveSet) -> SharedCurveSet {
        SharedCurveSet {
            inner: Arc::new(RwLock::new(curves)),
        }
    }

    pub fn snapshot(&self) -> CurveSet {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut CurveSet) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
