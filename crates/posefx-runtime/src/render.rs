//! Draw commands for the rendering surface
//!
//! The engine decides WHAT to draw; the surface owns the pixels. All
//! coordinates are in landmark space.

use posefx_core::Point2D;
use posefx_visual::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            align: TextAlign::Center,
            color,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// One primitive draw operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Pixelate the whole video frame before anything is drawn on top
    Pixelate { block_size: u32 },
    FillCircle {
        center: Point2D,
        radius: f32,
        color: Color,
    },
    Line {
        from: Point2D,
        to: Point2D,
        color: Color,
        width: f32,
    },
    /// Open path through `points`
    Polyline {
        points: Vec<Point2D>,
        color: Color,
        width: f32,
    },
    Text {
        at: Point2D,
        text: String,
        style: TextStyle,
    },
}

/// Drawing surface provided by the host
pub trait RenderSurface {
    fn pixelate(&mut self, block_size: u32);
    fn fill_circle(&mut self, center: Point2D, radius: f32, color: Color);
    fn line(&mut self, from: Point2D, to: Point2D, color: Color, width: f32);
    fn polyline(&mut self, points: &[Point2D], color: Color, width: f32);
    fn text(&mut self, at: Point2D, text: &str, style: &TextStyle);
}

impl DrawCommand {
    pub fn apply<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            DrawCommand::Pixelate { block_size } => surface.pixelate(*block_size),
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => surface.fill_circle(*center, *radius, *color),
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => surface.line(*from, *to, *color, *width),
            DrawCommand::Polyline {
                points,
                color,
                width,
            } => surface.polyline(points, *color, *width),
            DrawCommand::Text { at, text, style } => surface.text(*at, text, style),
        }
    }

    /// Text payload, if this is a text command
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Replay a frame's commands onto a surface in order
pub fn draw_all<S: RenderSurface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        command.apply(surface);
    }
}

/// Surface that records what it was asked to draw
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl RenderSurface for CommandRecorder {
    fn pixelate(&mut self, block_size: u32) {
        self.commands.push(DrawCommand::Pixelate { block_size });
    }

    fn fill_circle(&mut self, center: Point2D, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Point2D, to: Point2D, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn polyline(&mut self, points: &[Point2D], color: Color, width: f32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn text(&mut self, at: Point2D, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_preserves_order() {
        let commands = vec![
            DrawCommand::Pixelate { block_size: 8 },
            DrawCommand::Polyline {
                points: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)],
                color: Color::CYAN,
                width: 4.0,
            },
            DrawCommand::Text {
                at: Point2D::new(10.0, 10.0),
                text: "hi".into(),
                style: TextStyle::new(20.0, Color::WHITE).aligned(TextAlign::Left),
            },
        ];
        let mut recorder = CommandRecorder::default();
        draw_all(&commands, &mut recorder);
        assert_eq!(recorder.commands, commands);
        assert_eq!(recorder.commands[2].text(), Some("hi"));
        assert_eq!(recorder.commands[0].text(), None);
    }
}
