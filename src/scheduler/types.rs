use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExpressionId(pub String);

impl ExpressionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// The five two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Wire-level operator, including unary minus. Serialized as the operator
/// symbol itself (`"+"`, `"u-"`, ...) for compatibility with workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    UnaryMinus,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Power => "^",
            Operation::UnaryMinus => "u-",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operation::Add),
            "-" => Some(Operation::Subtract),
            "*" => Some(Operation::Multiply),
            "/" => Some(Operation::Divide),
            "^" => Some(Operation::Power),
            "u-" => Some(Operation::UnaryMinus),
            _ => None,
        }
    }
}

impl From<BinaryOp> for Operation {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Operation::Add,
            BinaryOp::Subtract => Operation::Subtract,
            BinaryOp::Multiply => Operation::Multiply,
            BinaryOp::Divide => Operation::Divide,
            BinaryOp::Power => Operation::Power,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OperationVisitor;

        impl<'de> Visitor<'de> for OperationVisitor {
            type Value = Operation;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an operator symbol (+, -, *, /, ^, u-)")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Operation, E> {
                Operation::parse(value)
                    .ok_or_else(|| E::custom(format!("unknown operator: {}", value)))
            }
        }

        deserializer.deserialize_str(OperationVisitor)
    }
}

/// One input slot of a task: either a literal from the source expression or
/// the eventual result of an earlier task.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    TaskResult(TaskId),
}

impl Operand {
    pub fn dependency(&self) -> Option<&TaskId> {
        match self {
            Operand::Literal(_) => None,
            Operand::TaskResult(id) => Some(id),
        }
    }
}

/// The operation a task performs, tagged so that "unary minus" is a variant
/// rather than a null second argument.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Binary { op: BinaryOp, args: [Operand; 2] },
    Negate { arg: Operand },
}

impl TaskKind {
    pub fn operation(&self) -> Operation {
        match self {
            TaskKind::Binary { op, .. } => (*op).into(),
            TaskKind::Negate { .. } => Operation::UnaryMinus,
        }
    }

    pub fn operands(&self) -> &[Operand] {
        match self {
            TaskKind::Binary { args, .. } => args,
            TaskKind::Negate { arg } => std::slice::from_ref(arg),
        }
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &TaskId> {
        self.operands().iter().filter_map(Operand::dependency)
    }
}

/// Lifecycle state shared by tasks and expressions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One elementary operation node of an expression.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub expr_id: ExpressionId,
    pub kind: TaskKind,
    pub op_time_ms: u64,
    pub status: Status,
    pub result: Option<f64>,
    /// Set while `processing`; past this instant the dispatch is considered
    /// abandoned and the task becomes dispatchable again.
    pub lease_expires: Option<u64>,
}

impl Task {
    pub fn new(expr_id: ExpressionId, kind: TaskKind, op_time_ms: u64) -> Self {
        Self {
            id: TaskId::new(),
            expr_id,
            kind,
            op_time_ms,
            status: Status::Pending,
            result: None,
            lease_expires: None,
        }
    }
}

/// A submitted calculation: the source string plus its compiled task list.
///
/// The last task in `tasks` is the root of the dependency graph; its result
/// becomes the expression result once every task has completed.
#[derive(Debug, Clone)]
pub struct Expression {
    pub id: ExpressionId,
    pub source: String,
    pub status: Status,
    pub tasks: Vec<Task>,
    pub result: Option<f64>,
    pub error: Option<String>,
}

/// A task handed to a worker: every dependency slot already resolved to a
/// concrete number. `args[1]` is `None` only for unary minus.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedTask {
    pub id: TaskId,
    pub expr_id: ExpressionId,
    pub op: Operation,
    pub args: [Option<f64>; 2],
    pub op_time_ms: u64,
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
