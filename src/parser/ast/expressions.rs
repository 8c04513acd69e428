use super::*;

ast_enum! {
    /// Any expression, variable references included
    Expr {
        Literal(Literal) = LITERAL,
        Nil(NilLiteral) = NIL_LITERAL,
        NameRef(NameRef) = NAME_REF,
        FunctionCall(FunctionCall) = FUNCTION_CALL,
        Field(FieldExpr) = FIELD_EXPR,
        Index(IndexExpr) = INDEX_EXPR,
        XmlAttribute(XmlAttributeExpr) = XML_ATTRIBUTE_EXPR,
        MethodCall(CallExpr) = CALL_EXPR,
        Array(ArrayLiteral) = ARRAY_LITERAL,
        Record(RecordLiteral) = RECORD_LITERAL,
        Table(TableLiteral) = TABLE_LITERAL,
        Tuple(TupleExpr) = TUPLE_EXPR,
        Paren(ParenExpr) = PAREN_EXPR,
        Binary(BinaryExpr) = BINARY_EXPR,
        Prefix(PrefixExpr) = PREFIX_EXPR,
        Ternary(TernaryExpr) = TERNARY_EXPR,
        Elvis(ElvisExpr) = ELVIS_EXPR,
        Range(RangeExpr) = RANGE_EXPR,
        Match(MatchExpr) = MATCH_EXPR,
        Conversion(TypeConversionExpr) = TYPE_CONVERSION_EXPR,
        Check(CheckExpr) = CHECK_EXPR,
        Trap(TrapExpr) = TRAP_EXPR,
        Typeof(TypeofExpr) = TYPEOF_EXPR,
        Start(StartExpr) = START_EXPR,
        Wait(WaitExpr) = WAIT_EXPR,
        WorkerReceive(WorkerReceiveExpr) = WORKER_RECEIVE_EXPR,
        Action(ActionInvocation) = ACTION_INVOCATION,
        Lambda(LambdaExpr) = LAMBDA_EXPR,
        Arrow(ArrowFunction) = ARROW_FUNCTION,
        TypeInit(TypeInitExpr) = TYPE_INIT_EXPR,
        Template(StringTemplate) = STRING_TEMPLATE,
        Xml(XmlLiteral) = XML_LITERAL,
        Query(TableQuery) = TABLE_QUERY,
    }
}

/// First significant token directly under `node`
fn operator_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
}

fn nth_expr(node: &SyntaxNode, n: usize) -> Option<Expr> {
    node.children().filter_map(Expr::cast).nth(n)
}

// ============================================================================
// Literals
// ============================================================================

ast_node!(Literal, LITERAL);

/// Literal value, decoded where that is unambiguous
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        operator_token(&self.0)
    }

    /// `None` for literals that do not fit, e.g. an out-of-range integer
    pub fn value(&self) -> Option<LiteralValue> {
        let token = self.token()?;
        let text = token.text();
        match token.kind() {
            SyntaxKind::INTEGER_LITERAL => parse_int(text).map(LiteralValue::Int),
            SyntaxKind::FLOAT_LITERAL => text
                .trim_end_matches(['f', 'F', 'd', 'D'])
                .parse()
                .ok()
                .map(LiteralValue::Float),
            SyntaxKind::STRING_LITERAL => Some(LiteralValue::String(unquote(text))),
            SyntaxKind::TRUE_KW => Some(LiteralValue::Bool(true)),
            SyntaxKind::FALSE_KW => Some(LiteralValue::Bool(false)),
            SyntaxKind::NULL_KW => Some(LiteralValue::Null),
            _ => None,
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

ast_node!(NilLiteral, NIL_LITERAL);

ast_node!(ArrayLiteral, ARRAY_LITERAL);

impl ArrayLiteral {
    children_method!(elements, Expr);
}

ast_node!(RecordLiteral, RECORD_LITERAL);

impl RecordLiteral {
    children_method!(fields, RecordField);

    /// Value of the first field whose literal key is `key`
    pub fn get(&self, key: &str) -> Option<Expr> {
        self.fields()
            .find(|f| f.key().as_deref() == Some(key))
            .and_then(|f| f.value())
    }
}

ast_node!(RecordField, RECORD_FIELD);

impl RecordField {
    /// Literal key: `name` or `"name"`; `None` for computed keys
    pub fn key(&self) -> Option<String> {
        let token = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())?;
        match token.kind() {
            SyntaxKind::IDENT => Some(token.text().to_string()),
            SyntaxKind::STRING_LITERAL => Some(unquote(token.text())),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).last()
    }
}

ast_node!(TableLiteral, TABLE_LITERAL);

impl TableLiteral {
    /// Column names; `key` columns are reported with `true`
    pub fn columns(&self) -> Vec<(String, bool)> {
        let Some(columns) = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::TABLE_COLUMNS)
        else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut key = false;
        for element in columns.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::IDENT => key = true,
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::COMMA => key = false,
                rowan::NodeOrToken::Node(n) => {
                    if let Some(name) = Name::cast(n).and_then(|n| n.text()) {
                        result.push((name, key));
                    }
                    key = false;
                }
                _ => {}
            }
        }
        result
    }

    pub fn rows(&self) -> Vec<Vec<Expr>> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::TABLE_ROW)
            .map(|row| row.children().filter_map(Expr::cast).collect())
            .collect()
    }
}

ast_node!(TupleExpr, TUPLE_EXPR);

impl TupleExpr {
    children_method!(elements, Expr);
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    first_child_method!(inner, Expr);
}

// ============================================================================
// Variable references
// ============================================================================

ast_node!(FunctionCall, FUNCTION_CALL);

impl FunctionCall {
    first_child_method!(callee, NameRef);
    first_child_method!(args, ArgList);
}

ast_node!(FieldExpr, FIELD_EXPR);

impl FieldExpr {
    first_child_method!(receiver, Expr);

    /// Field name; `None` for `x.*`
    pub fn field(&self) -> Option<NameRef> {
        self.0.children().skip(1).find_map(NameRef::cast)
    }

    /// `j!name` rather than `j.name`
    pub fn is_safe_navigation(&self) -> bool {
        has_token(&self.0, SyntaxKind::BANG)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn base(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn index(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

ast_node!(XmlAttributeExpr, XML_ATTRIBUTE_EXPR);

impl XmlAttributeExpr {
    pub fn base(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn attribute(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    // `obj.method` part of `obj.method(args)`
    first_child_method!(method, FieldExpr);
    first_child_method!(args, ArgList);
}

ast_node!(ArgList, ARG_LIST);

/// One argument of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Positional(Expr),
    Named(NamedArg),
    Rest(RestArg),
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.0.children().filter_map(|n| {
            if let Some(named) = NamedArg::cast(n.clone()) {
                Some(Arg::Named(named))
            } else if let Some(rest) = RestArg::cast(n.clone()) {
                Some(Arg::Rest(rest))
            } else {
                Expr::cast(n).map(Arg::Positional)
            }
        })
    }
}

ast_node!(NamedArg, NAMED_ARG);

impl NamedArg {
    first_child_method!(name, Name);
    first_child_method!(value, Expr);
}

ast_node!(RestArg, REST_ARG);

impl RestArg {
    first_child_method!(value, Expr);
}

// ============================================================================
// Operators
// ============================================================================

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }

    /// Operator kind; shifts report `SHL`, `SHR` or `USHR`
    pub fn op(&self) -> Option<SyntaxKind> {
        operator_token(&self.0).map(|t| t.kind())
    }
}

ast_node!(RangeExpr, RANGE_EXPR);

impl RangeExpr {
    pub fn start(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn end(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }

    /// `..<` excludes the end
    pub fn is_exclusive(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT_DOT_LT)
    }
}

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        operator_token(&self.0).map(|t| t.kind())
    }

    first_child_method!(operand, Expr);
}

ast_node!(TernaryExpr, TERNARY_EXPR);

impl TernaryExpr {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn then_branch(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }

    pub fn else_branch(&self) -> Option<Expr> {
        nth_expr(&self.0, 2)
    }
}

ast_node!(ElvisExpr, ELVIS_EXPR);

impl ElvisExpr {
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn fallback(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

ast_node!(MatchExpr, MATCH_EXPR);

impl MatchExpr {
    first_child_method!(scrutinee, Expr);
    children_method!(arms, MatchExprArm);
}

ast_node!(MatchExprArm, MATCH_EXPR_ARM);

impl MatchExprArm {
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(binding, Name);
    first_child_method!(body, Expr);
}

ast_node!(TypeConversionExpr, TYPE_CONVERSION_EXPR);

impl TypeConversionExpr {
    first_child_method!(target, TypeDescriptor);

    /// The converted value; the optional conversion function sits inside the chevrons
    pub fn operand(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).last()
    }
}

macro_rules! unary_node {
    ($name:ident, $kind:ident) => {
        ast_node!($name, $kind);

        impl $name {
            first_child_method!(operand, Expr);
        }
    };
}

unary_node!(CheckExpr, CHECK_EXPR);
unary_node!(TrapExpr, TRAP_EXPR);
unary_node!(TypeofExpr, TYPEOF_EXPR);
unary_node!(StartExpr, START_EXPR);
unary_node!(WaitExpr, WAIT_EXPR);

ast_node!(WorkerReceiveExpr, WORKER_RECEIVE_EXPR);

impl WorkerReceiveExpr {
    first_child_method!(worker, NameRef);
}

ast_node!(ActionInvocation, ACTION_INVOCATION);

impl ActionInvocation {
    // the endpoint in `ep->get("/")`
    first_child_method!(target, Expr);

    pub fn action(&self) -> Option<NameRef> {
        self.0.children().filter_map(NameRef::cast).last()
    }

    first_child_method!(args, ArgList);
}

// ============================================================================
// Functions and construction
// ============================================================================

ast_node!(LambdaExpr, LAMBDA_EXPR);

impl LambdaExpr {
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
    first_child_method!(body, Block);
}

ast_node!(ArrowFunction, ARROW_FUNCTION);

impl ArrowFunction {
    pub fn params(&self) -> Vec<Name> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARROW_PARAMS)
            .map(|params| params.children().filter_map(Name::cast).collect())
            .unwrap_or_default()
    }

    first_child_method!(body, Expr);
}

ast_node!(TypeInitExpr, TYPE_INIT_EXPR);

impl TypeInitExpr {
    first_child_method!(ty, TypeRef);
    first_child_method!(args, ArgList);
}

// ============================================================================
// Embedded languages
// ============================================================================

ast_node!(StringTemplate, STRING_TEMPLATE);

impl StringTemplate {
    pub fn interpolations(&self) -> Vec<Expr> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::TEMPLATE_INTERPOLATION)
            .filter_map(|n| n.children().find_map(Expr::cast))
            .collect()
    }
}

ast_node!(XmlLiteral, XML_LITERAL);

impl XmlLiteral {
    pub fn interpolations(&self) -> Vec<Expr> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::XML_INTERPOLATION)
            .filter_map(|n| n.children().find_map(Expr::cast))
            .collect()
    }
}

ast_node!(TableQuery, TABLE_QUERY);

impl TableQuery {
    /// Clause node kinds in source order, `FROM_CLAUSE` first
    pub fn clause_kinds(&self) -> Vec<SyntaxKind> {
        self.0.children().map(|n| n.kind()).collect()
    }
}
