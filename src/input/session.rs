//! In-progress drawing gestures.

use crate::draw::{
    Annotation, AnnotationId, AnnotationKind, Bounds, Color, Point, Style,
    render::HIGHLIGHTER_OPACITY,
};
use crate::editor::ToolSettings;

use super::tool::Tool;

/// Mosaic regions are outlined in a fixed gray that never reaches the export.
const MOSAIC_OUTLINE: Color = Color::from_rgb8(0x88, 0x88, 0x88);
const MOSAIC_OUTLINE_OPACITY: f64 = 0.8;

/// Transient state between pointer-down and pointer-up. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    pub tool: Tool,
    /// Every recorded position for freehand tools; just the start otherwise.
    pub points: Vec<Point>,
    pub start: Point,
    /// Last pointer position after the press, if the pointer moved.
    pub end: Option<Point>,
}

impl DrawingSession {
    pub fn begin(tool: Tool, at: Point) -> Self {
        Self {
            tool,
            points: vec![at],
            start: at,
            end: None,
        }
    }

    /// Records a pointer position.
    pub fn extend(&mut self, to: Point) {
        if self.tool.is_freehand() {
            self.points.push(to);
        }
        self.end = Some(to);
    }

    /// Rectangle spanned by the gesture, if it has an end.
    pub fn drag_bounds(&self) -> Option<Bounds> {
        self.end.map(|end| Bounds::from_corners(self.start, end))
    }

    /// Turns the gesture into an annotation, or `None` if it is degenerate
    /// (fewer than two freehand points, or a shape without an end point) or
    /// the tool does not create annotations.
    pub fn build_annotation(
        &self,
        id: AnnotationId,
        settings: &ToolSettings,
        now: u64,
    ) -> Option<Annotation> {
        let (kind, bounds, style) = match self.tool {
            Tool::Pen | Tool::Highlighter => {
                if self.points.len() < 2 {
                    return None;
                }
                let bounds = Bounds::from_points(&self.points)?;
                let points = self.points.clone();
                if self.tool == Tool::Pen {
                    (AnnotationKind::Pen { points }, bounds, settings.stroke_style())
                } else {
                    let style = Style {
                        opacity: HIGHLIGHTER_OPACITY,
                        ..settings.stroke_style()
                    };
                    (AnnotationKind::Highlighter { points }, bounds, style)
                }
            }
            Tool::Arrow => {
                let end = self.end?;
                (
                    AnnotationKind::Arrow {
                        start: self.start,
                        end,
                        head_size: settings.arrow_head_size,
                    },
                    Bounds::from_corners(self.start, end),
                    settings.stroke_style(),
                )
            }
            Tool::Circle => {
                let bounds = self.drag_bounds()?;
                (
                    AnnotationKind::Circle {
                        radius: bounds.width.min(bounds.height) / 2.0,
                    },
                    bounds,
                    settings.shape_style(),
                )
            }
            Tool::Rectangle => (
                AnnotationKind::Rectangle,
                self.drag_bounds()?,
                settings.shape_style(),
            ),
            Tool::Mosaic => (
                AnnotationKind::Mosaic {
                    pixel_size: settings.mosaic_size,
                },
                self.drag_bounds()?,
                Style {
                    color: MOSAIC_OUTLINE,
                    stroke_width: 0.0,
                    opacity: MOSAIC_OUTLINE_OPACITY,
                    fill_color: None,
                },
            ),
            Tool::Select
            | Tool::Text
            | Tool::Crop
            | Tool::Rotate
            | Tool::Flip
            | Tool::Resize => return None,
        };

        Some(Annotation::new(id, kind, bounds, style, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ToolSettings {
        ToolSettings::default()
    }

    fn session(tool: Tool, points: &[(f64, f64)]) -> DrawingSession {
        let mut iter = points.iter().map(|&(x, y)| Point::new(x, y));
        let mut session = DrawingSession::begin(tool, iter.next().unwrap());
        for p in iter {
            session.extend(p);
        }
        session
    }

    fn build(session: &DrawingSession) -> Option<Annotation> {
        session.build_annotation(AnnotationId::from("a"), &settings(), 7)
    }

    #[test]
    fn rectangle_normalizes_drag_direction() {
        let ann = build(&session(Tool::Rectangle, &[(110.0, 60.0), (10.0, 10.0)])).unwrap();
        assert_eq!(ann.kind, AnnotationKind::Rectangle);
        assert_eq!(ann.bounds, Bounds::new(10.0, 10.0, 100.0, 50.0));
        assert_eq!(ann.created_at, 7);
        assert_eq!(ann.updated_at, 7);
    }

    #[test]
    fn shapes_without_end_are_discarded() {
        for tool in [Tool::Arrow, Tool::Circle, Tool::Rectangle, Tool::Mosaic] {
            assert!(build(&session(tool, &[(5.0, 5.0)])).is_none(), "{tool:?}");
        }
    }

    #[test]
    fn freehand_needs_two_points() {
        assert!(build(&session(Tool::Pen, &[(1.0, 1.0)])).is_none());
        let ann = build(&session(Tool::Pen, &[(1.0, 1.0), (4.0, 9.0), (2.0, 3.0)])).unwrap();
        assert_eq!(ann.bounds, Bounds::new(1.0, 1.0, 3.0, 8.0));
        let AnnotationKind::Pen { points } = &ann.kind else {
            panic!("expected pen");
        };
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn highlighter_is_half_opacity() {
        let ann = build(&session(Tool::Highlighter, &[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        assert_eq!(ann.style.opacity, 0.5);
        assert!(matches!(ann.kind, AnnotationKind::Highlighter { .. }));
    }

    #[test]
    fn circle_radius_uses_shorter_side() {
        let ann = build(&session(Tool::Circle, &[(0.0, 0.0), (40.0, 20.0)])).unwrap();
        assert_eq!(ann.kind, AnnotationKind::Circle { radius: 10.0 });
    }

    #[test]
    fn arrow_keeps_direction_and_head_size() {
        let ann = build(&session(Tool::Arrow, &[(50.0, 50.0), (10.0, 20.0)])).unwrap();
        assert_eq!(
            ann.kind,
            AnnotationKind::Arrow {
                start: Point::new(50.0, 50.0),
                end: Point::new(10.0, 20.0),
                head_size: 15.0,
            }
        );
        assert_eq!(ann.bounds, Bounds::new(10.0, 20.0, 40.0, 30.0));
    }

    #[test]
    fn mosaic_uses_fixed_outline_style_and_block_size() {
        let ann = build(&session(Tool::Mosaic, &[(0.0, 0.0), (30.0, 30.0)])).unwrap();
        assert_eq!(ann.kind, AnnotationKind::Mosaic { pixel_size: 10 });
        assert_eq!(ann.style.color.to_hex(), "#888888");
        assert_eq!(ann.style.stroke_width, 0.0);
        assert_eq!(ann.style.opacity, 0.8);
    }

    #[test]
    fn non_drawing_tools_build_nothing() {
        for tool in [Tool::Select, Tool::Text, Tool::Crop, Tool::Rotate] {
            assert!(build(&session(tool, &[(0.0, 0.0), (9.0, 9.0)])).is_none());
        }
    }
}
