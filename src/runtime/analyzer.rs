//! Statement execution and the coordinate pipeline

use serde::{Deserialize, Serialize};

use super::color::{ColorTable, Rgb};
use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::lexer::SourceLocation;
use crate::parser::{ColorSpec, EvalContext, Expression, Program, SizeSpec, Statement};

/// Receiver of plotted points
pub trait DrawSink {
    /// Plot one point in device coordinates
    fn draw(&mut self, x: f64, y: f64, color: Rgb, size: u32);
}

impl<F> DrawSink for F
where
    F: FnMut(f64, f64, Rgb, u32),
{
    fn draw(&mut self, x: f64, y: f64, color: Rgb, size: u32) {
        self(x, y, color, size)
    }
}

/// A plotted point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub size: u32,
}

/// Sink that keeps every point it receives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointRecorder {
    points: Vec<Point>,
}

impl PointRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points in plotting order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl DrawSink for PointRecorder {
    fn draw(&mut self, x: f64, y: f64, color: Rgb, size: u32) {
        self.points.push(Point { x, y, color, size });
    }
}

/// Pen attributes applied to every plotted point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Rgb,
    /// Point size, at least 1
    pub size: u32,
}

impl Default for Pen {
    fn default() -> Self {
        Pen {
            color: Rgb::RED,
            size: 1,
        }
    }
}

/// Scale, then clockwise rotation, then translation to the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub origin: (f64, f64),
    pub scale: (f64, f64),
    /// Clockwise, in radians
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            origin: (0.0, 0.0),
            scale: (1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Map a raw point to device coordinates
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (x, y) = (x * self.scale.0, y * self.scale.1);
        let (sin, cos) = self.rotation.sin_cos();
        let (x, y) = (x * cos + y * sin, y * cos - x * sin);
        (x + self.origin.0, y + self.origin.1)
    }
}

/// Analyzer behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyzerConfig {
    /// Log statement effects and a sample of plotted points at debug level
    pub debug_output: bool,
}

/// Executes a parsed program against a draw sink
///
/// Holds the interpreter state: the coordinate transform, the pen and the
/// loop parameter. State persists across [`run`](Self::run) calls until
/// [`reset`](Self::reset).
pub struct SemanticAnalyzer<'a> {
    colors: &'a ColorTable,
    diagnostics: &'a mut Diagnostics,
    config: AnalyzerConfig,
    transform: Transform,
    pen: Pen,
    context: EvalContext,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(colors: &'a ColorTable, diagnostics: &'a mut Diagnostics) -> Self {
        SemanticAnalyzer::with_config(colors, diagnostics, AnalyzerConfig::default())
    }

    pub fn with_config(
        colors: &'a ColorTable,
        diagnostics: &'a mut Diagnostics,
        config: AnalyzerConfig,
    ) -> Self {
        SemanticAnalyzer {
            colors,
            diagnostics,
            config,
            transform: Transform::default(),
            pen: Pen::default(),
            context: EvalContext::default(),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Current value of the loop parameter
    pub fn parameter(&self) -> f64 {
        self.context.param
    }

    /// Restore the default transform, pen and parameter
    pub fn reset(&mut self) {
        self.transform = Transform::default();
        self.pen = Pen::default();
        self.context = EvalContext::default();
    }

    /// Execute every statement in order; returns the number of points plotted
    pub fn run<D: DrawSink + ?Sized>(&mut self, program: &Program, sink: &mut D) -> usize {
        program
            .statements
            .iter()
            .map(|statement| self.execute(statement, sink))
            .sum()
    }

    /// Execute one statement; returns the number of points plotted
    pub fn execute<D: DrawSink + ?Sized>(&mut self, statement: &Statement, sink: &mut D) -> usize {
        match statement {
            Statement::Origin { x, y, .. } => {
                self.transform.origin = (self.eval(x), self.eval(y));
                self.debug(format_args!("origin set to {:?}", self.transform.origin));
            }
            Statement::Scale { x, y, .. } => {
                self.transform.scale = (self.eval(x), self.eval(y));
                self.debug(format_args!("scale set to {:?}", self.transform.scale));
            }
            Statement::Rot { angle, .. } => {
                self.transform.rotation = self.eval(angle);
                self.debug(format_args!("rotation set to {}", self.transform.rotation));
            }
            Statement::Color { color, .. } => {
                self.pen.color = match color {
                    ColorSpec::Rgb { red, green, blue } => {
                        Rgb::from_channels(self.eval(red), self.eval(green), self.eval(blue))
                    }
                    ColorSpec::Named(name) => name
                        .color_name()
                        .map_or(Rgb::RED, |name| name.rgb(self.colors)),
                };
                self.debug(format_args!("pen color set to {}", self.pen.color));
            }
            Statement::Size { size, .. } => {
                let value = match size {
                    SizeSpec::Uniform(size) => self.eval(size),
                    SizeSpec::Pair { width, .. } => self.eval(width),
                };
                if value >= 1.0 {
                    self.pen.size = value as u32;
                    self.debug(format_args!("pen size set to {}", self.pen.size));
                }
            }
            Statement::ForDraw {
                start,
                end,
                step,
                x,
                y,
                location,
            } => return self.draw_loop([start, end, step], (x, y), location, sink),
        }
        0
    }

    fn draw_loop<D: DrawSink + ?Sized>(
        &mut self,
        [start, end, step]: [&Expression; 3],
        (x, y): (&Expression, &Expression),
        location: &SourceLocation,
        sink: &mut D,
    ) -> usize {
        let start = self.eval(start);
        let end = self.eval(end);
        let step = self.eval(step);
        self.debug(format_args!(
            "FOR loop: start={}, end={}, step={}",
            start, end, step
        ));

        if step == 0.0 {
            self.diagnostics.report(Error::ZeroStep {
                location: location.clone(),
            });
            return 0;
        }
        if (step > 0.0 && start > end) || (step < 0.0 && start < end) {
            self.diagnostics.report(Error::StepDirectionMismatch {
                location: location.clone(),
                start,
                end,
                step,
            });
            return 0;
        }

        let in_range = |t: f64| if step > 0.0 { t <= end } else { t >= end };
        let mut count = 0;
        self.context.param = start;
        while in_range(self.context.param) {
            let raw = (self.eval(x), self.eval(y));
            let (px, py) = self.transform.apply(raw.0, raw.1);
            if count < 5 || count % 100 == 0 {
                self.debug(format_args!(
                    "T={} -> raw({}, {}) -> transformed({}, {})",
                    self.context.param, raw.0, raw.1, px, py
                ));
            }
            sink.draw(px, py, self.pen.color, self.pen.size);
            count += 1;

            let next = self.context.param + step;
            if next == self.context.param {
                self.diagnostics.report(Error::LoopStalled {
                    location: location.clone(),
                    value: next,
                    step,
                });
                break;
            }
            self.context.param = next;
        }

        self.debug(format_args!("FOR loop completed: {} points drawn", count));
        count
    }

    fn eval(&self, expr: &Expression) -> f64 {
        expr.value(&self.context)
    }

    fn debug(&self, message: std::fmt::Arguments<'_>) {
        if self.config.debug_output {
            tracing::debug!("{}", message);
        }
    }
}
