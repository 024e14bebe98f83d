//! Walkers plugin drawing the footway layers on the map
//!
//! Besides painting, the plugin reports what the app needs to know about the
//! map for this frame: the visible bounding box, the zoom and what a click hit.

use crate::app::layers::{DrawnSegment, LayerHandle};
use crate::app::state::GradeVisibility;
use egui::{Color32, Pos2, Shape, Stroke};
use footway_lib::{BoundingBox, Grade, Style, WAY_WEIGHT, WayId};
use std::sync::{Arc, Mutex, PoisonError};
use walkers::{MapMemory, Plugin, Projector};

/// Extra pixels around a stroke that still count as a hit
const HIT_SLOP: f32 = 4.0;
/// Screen distance between two arrowheads on a steep segment
const ARROW_SPACING: f32 = 80.0;

/// What the map saw during the last frame
#[derive(Debug, Default)]
pub struct MapFeedback {
    pub viewport: Option<BoundingBox>,
    pub zoom: f64,
    pub click: Option<MapClick>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapClick {
    Segment(WayId),
    /// Somewhere without a visible segment
    Empty,
}

pub type SharedFeedback = Arc<Mutex<MapFeedback>>;

/// Plugin for rendering footway segments on the map
pub struct FootwayPlugin {
    layers: LayerHandle,
    visibility: GradeVisibility,
    /// Width of an ordinary segment in pixels
    line_width: f32,
    feedback: SharedFeedback,
}

impl FootwayPlugin {
    pub fn new(
        layers: LayerHandle,
        visibility: GradeVisibility,
        line_width: f32,
        feedback: SharedFeedback,
    ) -> Self {
        Self {
            layers,
            visibility,
            line_width,
            feedback,
        }
    }

    fn stroke(&self, style: &Style) -> Stroke {
        let width = style.weight / WAY_WEIGHT * self.line_width;
        let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let footway_lib::Rgb(r, g, b) = style.color;
        Stroke::new(width, Color32::from_rgba_unmultiplied(r, g, b, alpha))
    }

    fn render_segment(&self, segment: &DrawnSegment, points: &[Pos2], painter: &egui::Painter) {
        if points.len() < 2 {
            return;
        }
        let stroke = self.stroke(&segment.style);
        match segment.style.dash {
            Some(dash) => painter.extend(Shape::dashed_line(
                points,
                stroke,
                dash.length / WAY_WEIGHT * self.line_width,
                dash.gap / WAY_WEIGHT * self.line_width,
            )),
            None => {
                painter.add(Shape::line(points.to_vec(), stroke));
            }
        }
        if segment.arrow {
            for head in arrowheads(points, stroke.width * 2.0 + 4.0) {
                painter.add(Shape::convex_polygon(head, stroke.color, Stroke::NONE));
            }
        }
    }

    /// Segments in draw order: layers by grade, then the front segment
    fn visible_segments<'a>(
        &self,
        layers: &'a crate::app::layers::MapLayers,
    ) -> Vec<(&'a WayId, &'a DrawnSegment)> {
        let mut segments: Vec<_> = Grade::ALL
            .into_iter()
            .filter(|grade| self.visibility.is_visible(*grade))
            .flat_map(|grade| layers.layer(grade))
            .collect();
        if let Some((id, segment)) = layers.front()
            && self.visibility.is_visible(segment.grade())
        {
            segments.push((id, segment));
        }
        segments
    }
}

impl Plugin for FootwayPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        map_memory: &MapMemory,
    ) {
        profiling::scope!("FootwayPlugin::run");

        let painter = ui.painter();
        let viewport_rect = response.rect;

        // Screen corners to geographic bounds
        let top_left = projector.unproject(viewport_rect.min.to_vec2());
        let bottom_right = projector.unproject(viewport_rect.max.to_vec2());
        let viewport = viewport_bounds(top_left, bottom_right);

        let click_pos = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };
        let mut best_hit: Option<(f32, WayId)> = None;

        {
            let layers = self.layers.read();
            let segments = self.visible_segments(&layers);

            profiling::scope!("render_segments");
            for (id, segment) in segments {
                let points: Vec<Pos2> = segment
                    .shape
                    .points
                    .iter()
                    .map(|&point| {
                        let point: geo::Point = point.into();
                        let screen = projector.project(walkers::lat_lon(point.y(), point.x()));
                        Pos2::new(screen.x, screen.y)
                    })
                    .collect();

                self.render_segment(segment, &points, painter);

                if let Some(pos) = click_pos {
                    let reach = self.stroke(&segment.style).width / 2.0 + HIT_SLOP;
                    let distance = distance_to_polyline(pos, &points);
                    if distance <= reach && best_hit.as_ref().is_none_or(|(d, _)| distance <= *d) {
                        best_hit = Some((distance, id.clone()));
                    }
                }
            }
        }

        let mut feedback = self.feedback.lock().unwrap_or_else(PoisonError::into_inner);
        feedback.viewport = Some(viewport);
        feedback.zoom = map_memory.zoom();
        if click_pos.is_some() {
            feedback.click = Some(match best_hit {
                Some((_, id)) => MapClick::Segment(id),
                None => MapClick::Empty,
            });
        }
    }
}

/// Geographic bounds spanned by two opposite screen corners
pub fn viewport_bounds(
    top_left: walkers::Position,
    bottom_right: walkers::Position,
) -> BoundingBox {
    geo::Rect::new(
        geo::Coord {
            x: top_left.x(),
            y: top_left.y(),
        },
        geo::Coord {
            x: bottom_right.x(),
            y: bottom_right.y(),
        },
    )
    .into()
}

/// Shortest screen distance from `pos` to a polyline
pub fn distance_to_polyline(pos: Pos2, line: &[Pos2]) -> f32 {
    match line {
        [] => f32::INFINITY,
        [single] => pos.distance(*single),
        _ => line
            .windows(2)
            .map(|pair| distance_to_segment(pos, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn distance_to_segment(pos: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0.0 {
        return pos.distance(a);
    }
    let t = ((pos - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    pos.distance(a + ab * t)
}

/// Triangles pointing along the polyline, one every [`ARROW_SPACING`] pixels
/// and at least one per polyline
pub fn arrowheads(line: &[Pos2], size: f32) -> Vec<Vec<Pos2>> {
    let lengths: Vec<f32> = line.windows(2).map(|pair| pair[0].distance(pair[1])).collect();
    let total: f32 = lengths.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let count = ((total / ARROW_SPACING).floor() as usize).max(1);
    let step = total / count as f32;
    let mut heads = Vec::with_capacity(count);
    let mut target = step / 2.0;
    let mut walked = 0.0;

    for (pair, length) in line.windows(2).zip(&lengths) {
        if *length == 0.0 {
            continue;
        }
        let direction = (pair[1] - pair[0]) / *length;
        while target <= walked + length && heads.len() < count {
            let tip = pair[0] + direction * (target - walked + size / 2.0).min(*length);
            let base = tip - direction * size;
            let side = direction.rot90() * (size / 2.0);
            heads.push(vec![tip, base + side, base - side]);
            target += step;
        }
        walked += length;
    }
    heads
}
