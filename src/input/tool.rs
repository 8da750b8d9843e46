//! Editor tool selection.

/// Editor tool selection.
///
/// The first eight tools create or select annotations. Crop, rotate, flip and
/// resize are transform tools: they never create annotations and are handed
/// to the external transform service instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Hit-test, select and drag existing annotations
    #[default]
    Select,
    /// Freehand stroke following the pointer
    Pen,
    /// Freehand stroke at half opacity
    Highlighter,
    /// Straight arrow with a head at the end point
    Arrow,
    /// Circle inscribed in the dragged rectangle
    Circle,
    /// Rectangle from corner to corner
    Rectangle,
    /// Inline text entry anchored at the click
    Text,
    /// Pixelation region
    Mosaic,
    Crop,
    Rotate,
    Flip,
    Resize,
}

impl Tool {
    /// Pen and highlighter record every pointer position.
    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pen | Tool::Highlighter)
    }

    /// Tools that run a press-move-release drawing session.
    pub fn starts_session(self) -> bool {
        matches!(
            self,
            Tool::Pen
                | Tool::Highlighter
                | Tool::Arrow
                | Tool::Circle
                | Tool::Rectangle
                | Tool::Mosaic
                | Tool::Crop
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pen => "pen",
            Tool::Highlighter => "highlighter",
            Tool::Arrow => "arrow",
            Tool::Circle => "circle",
            Tool::Rectangle => "rectangle",
            Tool::Text => "text",
            Tool::Mosaic => "mosaic",
            Tool::Crop => "crop",
            Tool::Rotate => "rotate",
            Tool::Flip => "flip",
            Tool::Resize => "resize",
        }
    }
}
