use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Like,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenBranch {
    pub condition: Expr,
    pub value: Expr,
}

/// The AST of one parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Literal(Value),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Case {
        branches: Vec<WhenBranch>,
        else_expr: Option<Box<Expr>>,
    },
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),
    IsEmpty(Box<Expr>),
    IsNotEmpty(Box<Expr>),
}
