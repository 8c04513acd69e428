use super::*;

ast_node!(Block, BLOCK);

impl Block {
    children_method!(statements, Stmt);
}

ast_enum! {
    Stmt {
        VarDef(VarDefStmt) = VAR_DEF_STMT,
        Assign(AssignStmt) = ASSIGN_STMT,
        CompoundAssign(CompoundAssignStmt) = COMPOUND_ASSIGN_STMT,
        TupleDestructure(TupleDestructureStmt) = TUPLE_DESTRUCTURE_STMT,
        WorkerSend(WorkerSendStmt) = WORKER_SEND_STMT,
        Expr(ExprStmt) = EXPR_STMT,
        If(IfStmt) = IF_STMT,
        While(WhileStmt) = WHILE_STMT,
        Foreach(ForeachStmt) = FOREACH_STMT,
        Match(MatchStmt) = MATCH_STMT,
        Break(BreakStmt) = BREAK_STMT,
        Continue(ContinueStmt) = CONTINUE_STMT,
        Return(ReturnStmt) = RETURN_STMT,
        Panic(PanicStmt) = PANIC_STMT,
        Lock(LockStmt) = LOCK_STMT,
        Transaction(TransactionStmt) = TRANSACTION_STMT,
        Retry(RetryStmt) = RETRY_STMT,
        Abort(AbortStmt) = ABORT_STMT,
        Fork(ForkStmt) = FORK_STMT,
        Worker(WorkerDecl) = WORKER_DECL,
        Forever(ForeverStmt) = FOREVER_STMT,
        Namespace(NamespaceDecl) = NAMESPACE_DECL,
    }
}

// ============================================================================
// Simple statements
// ============================================================================

ast_node!(VarDefStmt, VAR_DEF_STMT);

impl VarDefStmt {
    has_token_method!(is_final, FINAL_KW);
    has_token_method!(is_var, VAR_KW, "var x = 1;");
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(binding, BindingPattern);
    first_child_method!(name, Name);
    first_child_method!(initializer, Expr);
}

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    pub fn target(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(CompoundAssignStmt, COMPOUND_ASSIGN_STMT);

impl CompoundAssignStmt {
    pub fn target(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    /// `PLUS_EQ`, `SHR_EQ` and friends
    pub fn op(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| !k.is_trivia())
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(TupleDestructureStmt, TUPLE_DESTRUCTURE_STMT);

impl TupleDestructureStmt {
    /// `a` and `b` in `(a, b) = t;`
    pub fn targets(&self) -> Vec<Expr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::TUPLE_REF)
            .map(|refs| refs.children().filter_map(Expr::cast).collect())
            .unwrap_or_default()
    }

    first_child_method!(value, Expr);
}

ast_node!(WorkerSendStmt, WORKER_SEND_STMT);

impl WorkerSendStmt {
    first_child_method!(value, Expr);

    pub fn worker(&self) -> Option<NameRef> {
        self.0.children().filter_map(NameRef::cast).last()
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    first_child_method!(expr, Expr);
}

// ============================================================================
// Control flow
// ============================================================================

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    first_child_method!(condition, Expr);
    first_child_method!(then_branch, Block);

    /// The nested `if` of an `else if`
    pub fn else_if(&self) -> Option<IfStmt> {
        self.else_clause()
            .and_then(|clause| clause.children().find_map(IfStmt::cast))
    }

    pub fn else_branch(&self) -> Option<Block> {
        self.else_clause()
            .and_then(|clause| clause.children().find_map(Block::cast))
    }

    fn else_clause(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ELSE_CLAUSE)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    first_child_method!(condition, Expr);
    first_child_method!(body, Block);
}

ast_node!(ForeachStmt, FOREACH_STMT);

impl ForeachStmt {
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(binding, BindingPattern);
    first_child_method!(name, Name);
    first_child_method!(iterable, Expr);
    first_child_method!(body, Block);
}

ast_node!(BindingPattern, BINDING_PATTERN);

impl BindingPattern {
    /// Every bound name, nested tuples flattened in source order
    pub fn names(&self) -> Vec<Name> {
        self.0.descendants().filter_map(Name::cast).collect()
    }
}

ast_node!(MatchStmt, MATCH_STMT);

impl MatchStmt {
    first_child_method!(scrutinee, Expr);
    children_method!(clauses, MatchClause);
}

ast_node!(MatchClause, MATCH_CLAUSE);

impl MatchClause {
    first_child_method!(pattern, MatchPattern);

    // a clause body is either a block or one statement
    first_child_method!(body, Block);
    first_child_method!(statement, Stmt);
}

ast_node!(MatchPattern, MATCH_PATTERN);

impl MatchPattern {
    has_token_method!(is_binding, VAR_KW, "var (a, b) if a > b");

    /// The static value a non-binding pattern compares against
    pub fn value(&self) -> Option<Expr> {
        if self.is_binding() {
            return None;
        }
        self.0.children().find_map(Expr::cast)
    }

    pub fn bindings(&self) -> Vec<Name> {
        if !self.is_binding() {
            return Vec::new();
        }
        self.0
            .children()
            .find_map(|n| {
                BindingPattern::cast(n.clone())
                    .map(|b| b.names())
                    .or_else(|| Name::cast(n).map(|name| vec![name]))
            })
            .unwrap_or_default()
    }

    pub fn guard(&self) -> Option<Expr> {
        if !has_token(&self.0, SyntaxKind::IF_KW) {
            return None;
        }
        self.0.children().find_map(Expr::cast)
    }
}

macro_rules! keyword_stmt {
    ($($name:ident = $kind:ident),+ $(,)?) => {
        $(ast_node!($name, $kind);)+
    };
}

keyword_stmt!(
    BreakStmt = BREAK_STMT,
    ContinueStmt = CONTINUE_STMT,
    RetryStmt = RETRY_STMT,
    AbortStmt = ABORT_STMT,
);

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    first_child_method!(value, Expr);
}

ast_node!(PanicStmt, PANIC_STMT);

impl PanicStmt {
    first_child_method!(value, Expr);
}

// ============================================================================
// Concurrency and transactions
// ============================================================================

ast_node!(LockStmt, LOCK_STMT);

impl LockStmt {
    first_child_method!(body, Block);
}

ast_node!(TransactionStmt, TRANSACTION_STMT);

/// Handler block following a transaction body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionHandler {
    OnRetry,
    Committed,
    Aborted,
}

impl TransactionStmt {
    first_child_method!(body, Block);

    /// `(property, value)` pairs from `with retries = 3, oncommit = f`
    pub fn properties(&self) -> Vec<(String, Option<Expr>)> {
        let Some(props) = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::TRANSACTION_PROPS)
        else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut key: Option<String> = None;
        for element in props.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::RETRIES_KW => {
                    key = Some(t.text().to_string());
                }
                rowan::NodeOrToken::Node(n) => {
                    if let Some(name) = Name::cast(n.clone()) {
                        key = name.text();
                    } else if let Some(value) = Expr::cast(n) {
                        if let Some(key) = key.take() {
                            result.push((key, Some(value)));
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(key) = key {
            result.push((key, None));
        }
        result
    }

    pub fn handlers(&self) -> Vec<(TransactionHandler, Option<Block>)> {
        self.0
            .children()
            .filter_map(|n| {
                let handler = match n.kind() {
                    SyntaxKind::ONRETRY_CLAUSE => TransactionHandler::OnRetry,
                    SyntaxKind::COMMITTED_CLAUSE => TransactionHandler::Committed,
                    SyntaxKind::ABORTED_CLAUSE => TransactionHandler::Aborted,
                    _ => return None,
                };
                Some((handler, n.children().find_map(Block::cast)))
            })
            .collect()
    }
}

ast_node!(ForkStmt, FORK_STMT);

impl ForkStmt {
    children_method!(workers, WorkerDecl);
}

ast_node!(WorkerDecl, WORKER_DECL);

impl WorkerDecl {
    first_child_method!(name, Name);
    first_child_method!(return_type, ReturnType);
    first_child_method!(body, Block);
}

ast_node!(ForeverStmt, FOREVER_STMT);

impl ForeverStmt {
    children_method!(queries, StreamingQuery);
}

ast_node!(StreamingQuery, STREAMING_QUERY);

impl StreamingQuery {
    /// Parameters and body of the `=> (params) { }` action
    pub fn action(&self) -> Option<(Option<ParamList>, Option<Block>)> {
        let action = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::STREAMING_ACTION)?;
        Some((
            action.children().find_map(ParamList::cast),
            action.children().find_map(Block::cast),
        ))
    }
}
