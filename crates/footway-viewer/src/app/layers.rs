//! Segments currently on the map, grouped by grade
//!
//! The loader drives these through [`SegmentDisplay`]; the map plugin reads
//! them every frame through a shared [`LayerHandle`].

use footway_lib::{Grade, SegmentDisplay, SegmentShape, Style, WayId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An attached segment with its current stroke
#[derive(Clone, Debug)]
pub struct DrawnSegment {
    pub shape: Arc<SegmentShape>,
    pub style: Style,
    /// Draw direction arrows along the point order
    pub arrow: bool,
}

impl DrawnSegment {
    pub fn grade(&self) -> Grade {
        self.shape.props.grade
    }
}

/// One layer per grade plus an optional segment drawn above everything
#[derive(Default)]
pub struct MapLayers {
    layers: [HashMap<WayId, DrawnSegment>; Grade::ALL.len()],
    front: Option<(Grade, WayId)>,
}

impl MapLayers {
    pub fn len(&self) -> usize {
        self.layers.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(HashMap::is_empty)
    }

    /// Number of segments in the layer of `grade`
    pub fn count(&self, grade: Grade) -> usize {
        self.layers[grade as usize].len()
    }

    /// Segments of one grade, except the one drawn in front
    pub fn layer(&self, grade: Grade) -> impl Iterator<Item = (&WayId, &DrawnSegment)> {
        let front = self.front.as_ref().map(|(_, id)| id);
        self.layers[grade as usize]
            .iter()
            .filter(move |(id, _)| Some(*id) != front)
    }

    /// Segment raised above all layers, if it is still attached
    pub fn front(&self) -> Option<(&WayId, &DrawnSegment)> {
        let (grade, id) = self.front.as_ref()?;
        self.layers[*grade as usize].get_key_value(id)
    }

    pub fn get(&self, id: &WayId) -> Option<&DrawnSegment> {
        self.layers.iter().find_map(|layer| layer.get(id))
    }

    fn get_mut(&mut self, id: &WayId) -> Option<&mut DrawnSegment> {
        self.layers.iter_mut().find_map(|layer| layer.get_mut(id))
    }
}

impl SegmentDisplay for MapLayers {
    fn attach(&mut self, shape: &Arc<SegmentShape>, style: Style) {
        let segment = DrawnSegment {
            shape: Arc::clone(shape),
            style,
            arrow: false,
        };
        self.layers[segment.grade() as usize].insert(shape.id.clone(), segment);
    }

    fn detach(&mut self, id: &WayId) {
        for layer in &mut self.layers {
            if layer.remove(id).is_some() {
                break;
            }
        }
        if self.front.as_ref().is_some_and(|(_, front)| front == id) {
            self.front = None;
        }
    }

    fn set_style(&mut self, id: &WayId, style: Style) {
        match self.get_mut(id) {
            Some(segment) => segment.style = style,
            None => tracing::warn!(%id, "Restyling a segment that is not attached"),
        }
    }

    fn bring_to_front(&mut self, id: &WayId) {
        if let Some(segment) = self.get(id) {
            self.front = Some((segment.grade(), id.clone()));
        }
    }

    fn attach_arrow(&mut self, shape: &Arc<SegmentShape>) {
        if let Some(segment) = self.get_mut(&shape.id) {
            segment.arrow = true;
        }
    }
}

/// Shared handle to the layers, cheap to clone into the map plugin
#[derive(Clone, Default)]
pub struct LayerHandle(Arc<RwLock<MapLayers>>);

impl LayerHandle {
    pub fn read(&self) -> RwLockReadGuard<'_, MapLayers> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MapLayers> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SegmentDisplay for LayerHandle {
    fn attach(&mut self, shape: &Arc<SegmentShape>, style: Style) {
        self.write().attach(shape, style);
    }

    fn detach(&mut self, id: &WayId) {
        self.write().detach(id);
    }

    fn set_style(&mut self, id: &WayId, style: Style) {
        self.write().set_style(id, style);
    }

    fn bring_to_front(&mut self, id: &WayId) {
        self.write().bring_to_front(id);
    }

    fn attach_arrow(&mut self, shape: &Arc<SegmentShape>) {
        self.write().attach_arrow(shape);
    }
}
