use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use crate::error::Result;
use crate::lexer::{MathFunction, SourceLocation};
use crate::runtime::{ColorTable, Rgb};

/// Values expressions read while being evaluated
///
/// The analyzer owns one of these and lends it to every
/// [`Expression::value`] call; `param` is the current value of `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalContext {
    /// Current value of the loop parameter
    pub param: f64,
}

impl EvalContext {
    /// Context with the loop parameter set to `param`
    pub fn with_param(param: f64) -> Self {
        EvalContext { param }
    }
}

/// Node tags of the syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    OriginStmt,
    ScaleStmt,
    RotStmt,
    ForDrawStmt,
    ColorStmt,
    SizeStmt,
    BinaryExpr,
    UnaryExpr,
    FuncCallExpr,
    ConstExpr,
    ParamExpr,
    ColorNameExpr,
}

/// Complete drawing program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Identifier of the source the program was parsed from
    pub source: String,
    /// Statements in source order
    pub statements: Vec<Statement>,
}

impl Program {
    /// Program with no statements
    pub fn new(source: impl Into<String>) -> Self {
        Program {
            source: source.into(),
            statements: Vec::new(),
        }
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True if the program has no statements
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Indented tree rendering of the whole program
    pub fn dump(&self) -> String {
        let mut out = format!(
            "{:?} {} ({} statements)\n",
            NodeKind::Program,
            self.source,
            self.statements.len()
        );
        for statement in &self.statements {
            statement.dump_into(&mut out, 1);
        }
        out
    }

    /// JSON rendering of the tree
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{};", statement)?;
        }
        Ok(())
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `ORIGIN IS (x, y)`
    Origin {
        /// Horizontal offset
        x: Expression,
        /// Vertical offset
        y: Expression,
        /// Location of the ORIGIN keyword
        location: SourceLocation,
    },

    /// `SCALE IS (x, y)`
    Scale {
        /// Horizontal factor
        x: Expression,
        /// Vertical factor
        y: Expression,
        /// Location of the SCALE keyword
        location: SourceLocation,
    },

    /// `ROT IS angle`
    Rot {
        /// Clockwise rotation in radians
        angle: Expression,
        /// Location of the ROT keyword
        location: SourceLocation,
    },

    /// `FOR T FROM start TO end STEP step DRAW (x, y)`
    ForDraw {
        /// First parameter value
        start: Expression,
        /// Last parameter value (inclusive)
        end: Expression,
        /// Parameter increment
        step: Expression,
        /// Point abscissa, usually in terms of `T`
        x: Expression,
        /// Point ordinate, usually in terms of `T`
        y: Expression,
        /// Location of the FOR keyword
        location: SourceLocation,
    },

    /// `COLOR IS (r, g, b)` or `COLOR IS name`
    Color {
        /// Pen color
        color: ColorSpec,
        /// Location of the COLOR keyword
        location: SourceLocation,
    },

    /// `SIZE IS size` or `SIZE IS (width, height)`
    Size {
        /// Pen size
        size: SizeSpec,
        /// Location of the SIZE keyword
        location: SourceLocation,
    },
}

/// Right-hand side of a COLOR statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorSpec {
    /// Explicit channels
    Rgb {
        red: Expression,
        green: Expression,
        blue: Expression,
    },
    /// Named color, always an [`Expression::ColorName`]
    Named(Expression),
}

/// Right-hand side of a SIZE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SizeSpec {
    /// Single size
    Uniform(Expression),
    /// Two-dimensional form; the width sets the pen size
    Pair {
        width: Expression,
        height: Expression,
    },
}

impl Statement {
    /// Node tag
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Origin { .. } => NodeKind::OriginStmt,
            Statement::Scale { .. } => NodeKind::ScaleStmt,
            Statement::Rot { .. } => NodeKind::RotStmt,
            Statement::ForDraw { .. } => NodeKind::ForDrawStmt,
            Statement::Color { .. } => NodeKind::ColorStmt,
            Statement::Size { .. } => NodeKind::SizeStmt,
        }
    }

    /// Location of the statement keyword
    pub fn location(&self) -> &SourceLocation {
        match self {
            Statement::Origin { location, .. }
            | Statement::Scale { location, .. }
            | Statement::Rot { location, .. }
            | Statement::ForDraw { location, .. }
            | Statement::Color { location, .. }
            | Statement::Size { location, .. } => location,
        }
    }

    /// Expression children in source order
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Statement::Origin { x, y, .. } | Statement::Scale { x, y, .. } => vec![x, y],
            Statement::Rot { angle, .. } => vec![angle],
            Statement::ForDraw {
                start,
                end,
                step,
                x,
                y,
                ..
            } => vec![start, end, step, x, y],
            Statement::Color { color, .. } => match color {
                ColorSpec::Rgb { red, green, blue } => vec![red, green, blue],
                ColorSpec::Named(name) => vec![name],
            },
            Statement::Size { size, .. } => match size {
                SizeSpec::Uniform(size) => vec![size],
                SizeSpec::Pair { width, height } => vec![width, height],
            },
        }
    }

    /// Value of the `index`-th child
    pub fn child_value(&self, index: usize, ctx: &EvalContext) -> Option<f64> {
        self.children().get(index).map(|child| child.value(ctx))
    }

    /// Indented tree rendering of this statement
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let _ = writeln!(
            out,
            "{}{:?} @ {}",
            "  ".repeat(depth),
            self.kind(),
            self.location()
        );
        for child in self.children() {
            child.dump_into(out, depth + 1);
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Origin { x, y, .. } => write!(f, "ORIGIN IS ({}, {})", x, y),
            Statement::Scale { x, y, .. } => write!(f, "SCALE IS ({}, {})", x, y),
            Statement::Rot { angle, .. } => write!(f, "ROT IS {}", angle),
            Statement::ForDraw {
                start,
                end,
                step,
                x,
                y,
                ..
            } => write!(
                f,
                "FOR T FROM {} TO {} STEP {} DRAW ({}, {})",
                start, end, step, x, y
            ),
            Statement::Color { color, .. } => match color {
                ColorSpec::Rgb { red, green, blue } => {
                    write!(f, "COLOR IS ({}, {}, {})", red, green, blue)
                }
                ColorSpec::Named(name) => write!(f, "COLOR IS {}", name),
            },
            Statement::Size { size, .. } => match size {
                SizeSpec::Uniform(size) => write!(f, "SIZE IS {}", size),
                SizeSpec::Pair { width, height } => write!(f, "SIZE IS ({}, {})", width, height),
            },
        }
    }
}

/// Color given by name, resolved when the statement runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorName {
    /// Name as written
    pub name: String,
    /// Location of the name
    pub location: SourceLocation,
}

impl ColorName {
    /// Color the name stands for; unknown names are red
    pub fn rgb(&self, colors: &ColorTable) -> Rgb {
        colors.resolve(&self.name)
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
        /// Location of the operator
        location: SourceLocation,
    },

    /// Unary sign
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expression>,
        /// Location of the sign
        location: SourceLocation,
    },

    /// Single-argument function call
    Call {
        /// Function name as written
        name: String,
        /// Bound function, `None` if the name is unknown
        function: Option<MathFunction>,
        /// Argument
        argument: Box<Expression>,
        /// Location of the function name
        location: SourceLocation,
    },

    /// Number fixed at parse time (literals and named constants)
    Const {
        /// Numeric value
        #[serde(with = "finite_or_text")]
        value: f64,
        /// Text it was parsed from
        lexeme: String,
        /// Location of the literal
        location: SourceLocation,
    },

    /// The loop parameter `T`
    Param {
        /// Location of `T`
        location: SourceLocation,
    },

    /// Color name (numeric value 0)
    ColorName(ColorName),
}

impl Expression {
    /// Constant node
    pub fn constant(value: f64, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Expression::Const {
            value,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Binary node
    pub fn binary(
        op: BinaryOp,
        left: Expression,
        right: Expression,
        location: SourceLocation,
    ) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    /// The color name this node holds, if it is a color name
    pub fn color_name(&self) -> Option<&ColorName> {
        match self {
            Expression::ColorName(name) => Some(name),
            _ => None,
        }
    }

    /// Node tag
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Binary { .. } => NodeKind::BinaryExpr,
            Expression::Unary { .. } => NodeKind::UnaryExpr,
            Expression::Call { .. } => NodeKind::FuncCallExpr,
            Expression::Const { .. } => NodeKind::ConstExpr,
            Expression::Param { .. } => NodeKind::ParamExpr,
            Expression::ColorName(_) => NodeKind::ColorNameExpr,
        }
    }

    /// Source location of the node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expression::Binary { location, .. }
            | Expression::Unary { location, .. }
            | Expression::Call { location, .. }
            | Expression::Const { location, .. }
            | Expression::Param { location } => location,
            Expression::ColorName(name) => &name.location,
        }
    }

    /// Evaluate the expression
    pub fn value(&self, ctx: &EvalContext) -> f64 {
        match self {
            Expression::Binary {
                op, left, right, ..
            } => op.apply(left.value(ctx), right.value(ctx)),
            Expression::Unary { op, operand, .. } => op.apply(operand.value(ctx)),
            Expression::Call {
                function, argument, ..
            } => match function {
                Some(function) => function.apply(argument.value(ctx)),
                None => 0.0,
            },
            Expression::Const { value, .. } => *value,
            Expression::Param { .. } => ctx.param,
            Expression::ColorName(_) => 0.0,
        }
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = match self {
            Expression::Binary { op, .. } => writeln!(out, "{}{:?} {}", indent, self.kind(), op),
            Expression::Unary { op, .. } => writeln!(out, "{}{:?} {}", indent, self.kind(), op),
            Expression::Call { name, function, .. } => writeln!(
                out,
                "{}{:?} {}{}",
                indent,
                self.kind(),
                name,
                if function.is_some() { "" } else { " (unbound)" }
            ),
            Expression::Const { value, .. } => {
                writeln!(out, "{}{:?} {}", indent, self.kind(), value)
            }
            Expression::Param { .. } => writeln!(out, "{}{:?} T", indent, self.kind()),
            Expression::ColorName(name) => {
                writeln!(out, "{}{:?} {}", indent, self.kind(), name.name)
            }
        };
        match self {
            Expression::Binary { left, right, .. } => {
                left.dump_into(out, depth + 1);
                right.dump_into(out, depth + 1);
            }
            Expression::Unary { operand, .. } => operand.dump_into(out, depth + 1),
            Expression::Call { argument, .. } => argument.dump_into(out, depth + 1),
            _ => {}
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", left, op, right),
            Expression::Unary { op, operand, .. } => write!(f, "({}{})", op, operand),
            Expression::Call { name, argument, .. } => write!(f, "{}({})", name, argument),
            Expression::Const { lexeme, .. } => write!(f, "{}", lexeme),
            Expression::Param { .. } => write!(f, "T"),
            Expression::ColorName(name) => write!(f, "{}", name.name),
        }
    }
}

/// Serde form of constant values
///
/// JSON has no infinities or NaN, so non-finite values travel as the
/// strings `inf`, `-inf` and `NaN`.
mod finite_or_text {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition operator (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Division operator (/)
    Div,
    /// Power operator (**)
    Pow,
}

impl BinaryOp {
    /// Apply the operator; division by zero yields 0
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => {
                if right == 0.0 {
                    0.0
                } else {
                    left / right
                }
            }
            BinaryOp::Pow => left.powf(right),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Unary plus (+x)
    Plus,
    /// Negation (-x)
    Neg,
}

impl UnaryOp {
    /// Apply the operator
    pub fn apply(self, operand: f64) -> f64 {
        match self {
            UnaryOp::Plus => operand,
            UnaryOp::Neg => -operand,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Pow => write!(f, "**"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> SourceLocation {
        SourceLocation::start_of("test")
    }

    fn num(value: f64) -> Expression {
        Expression::constant(value, value.to_string(), at())
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        let expr = Expression::binary(BinaryOp::Div, num(5.0), num(0.0), at());
        assert_eq!(expr.value(&EvalContext::default()), 0.0);
    }

    #[test]
    fn test_param_reads_context() {
        let expr = Expression::binary(BinaryOp::Mul, Expression::Param { location: at() }, num(2.0), at());
        assert_eq!(expr.value(&EvalContext::with_param(3.5)), 7.0);
        assert_eq!(expr.value(&EvalContext::with_param(-1.0)), -2.0);
    }

    #[test]
    fn test_unbound_call_yields_zero() {
        let call = Expression::Call {
            name: "frobnicate".to_string(),
            function: None,
            argument: Box::new(num(1.0)),
            location: at(),
        };
        assert_eq!(call.value(&EvalContext::default()), 0.0);

        let sqrt = Expression::Call {
            name: "sqrt".to_string(),
            function: Some(MathFunction::Sqrt),
            argument: Box::new(num(16.0)),
            location: at(),
        };
        assert_eq!(sqrt.value(&EvalContext::default()), 4.0);
        assert_eq!(sqrt.kind(), NodeKind::FuncCallExpr);
    }

    #[test]
    fn test_color_name_resolution() {
        let colors = ColorTable::new();
        let name = ColorName {
            name: "Blue".to_string(),
            location: at(),
        };
        assert_eq!(name.rgb(&colors), Rgb::new(0, 0, 255));
        let expr = Expression::ColorName(name);
        assert_eq!(expr.value(&EvalContext::default()), 0.0);
        assert_eq!(expr.color_name().map(|n| n.name.as_str()), Some("Blue"));
        assert!(num(1.0).color_name().is_none());
    }

    #[test]
    fn test_named_color_is_a_child_node() {
        let stmt = Statement::Color {
            color: ColorSpec::Named(Expression::ColorName(ColorName {
                name: "green".to_string(),
                location: at(),
            })),
            location: at(),
        };
        let kinds: Vec<NodeKind> = stmt.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::ColorNameExpr]);
        assert_eq!(stmt.to_string(), "COLOR IS green");
        assert!(stmt.dump().contains("  ColorNameExpr green"));
    }

    #[test]
    fn test_statement_children_are_ordered() {
        let stmt = Statement::ForDraw {
            start: num(0.0),
            end: num(1.0),
            step: num(2.0),
            x: num(3.0),
            y: num(4.0),
            location: at(),
        };
        let ctx = EvalContext::default();
        let values: Vec<f64> = stmt.children().iter().map(|c| c.value(&ctx)).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stmt.child_value(4, &ctx), Some(4.0));
        assert_eq!(stmt.child_value(5, &ctx), None);
        assert_eq!(stmt.kind(), NodeKind::ForDrawStmt);
    }

    #[test]
    fn test_display_and_dump() {
        let mut program = Program::new("test");
        program.statements.push(Statement::Rot {
            angle: Expression::binary(BinaryOp::Div, num(3.0), num(2.0), at()),
            location: at(),
        });
        assert_eq!(program.to_string(), "ROT IS (3 / 2);\n");
        let dump = program.dump();
        assert!(dump.starts_with("Program test (1 statements)"));
        assert!(dump.contains("    BinaryExpr /"));
        assert!(dump.contains("      ConstExpr 3"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut program = Program::new("test");
        program.statements.push(Statement::Size {
            size: SizeSpec::Uniform(num(2.0)),
            location: at(),
        });
        let json = program.to_json().expect("serializable");
        let back: Program = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, program);
    }

    #[test]
    fn test_json_keeps_non_finite_constants() {
        let mut program = Program::new("test");
        program.statements.push(Statement::Origin {
            x: num(f64::INFINITY),
            y: num(f64::NEG_INFINITY),
            location: at(),
        });
        program.statements.push(Statement::Rot {
            angle: num(f64::NAN),
            location: at(),
        });
        let json = program.to_json().expect("serializable");
        assert!(json.contains("\"inf\""));
        assert!(!json.contains("null"));

        let back: Program = serde_json::from_str(&json).expect("deserializable");
        let ctx = EvalContext::default();
        assert_eq!(back.statements[0], program.statements[0]);
        assert_eq!(back.statements[0].child_value(1, &ctx), Some(f64::NEG_INFINITY));
        assert!(back.statements[1]
            .child_value(0, &ctx)
            .map_or(false, f64::is_nan));
    }
}
