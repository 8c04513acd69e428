use super::*;

// ============================================================================
// Root
// ============================================================================

ast_node!(CompilationUnit, COMPILATION_UNIT);

impl CompilationUnit {
    children_method!(items, Item);

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl> + '_ {
        self.items().filter_map(|item| match item {
            Item::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionDef> + '_ {
        self.items().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            _ => None,
        })
    }
}

ast_enum! {
    /// Anything that can appear at the top level of a compilation unit
    Item {
        Import(ImportDecl) = IMPORT_DECL,
        Namespace(NamespaceDecl) = NAMESPACE_DECL,
        Function(FunctionDef) = FUNCTION_DEF,
        Service(ServiceDef) = SERVICE_DEF,
        Type(TypeDef) = TYPE_DEF,
        GlobalVar(GlobalVarDef) = GLOBAL_VAR_DEF,
        Const(ConstDef) = CONST_DEF,
        Annotation(AnnotationDef) = ANNOTATION_DEF,
    }
}

impl Item {
    /// Declared name, for items that declare one
    pub fn name(&self) -> Option<Name> {
        match self {
            Item::Import(_) => None,
            Item::Namespace(ns) => ns.prefix(),
            Item::Function(f) => f.name(),
            Item::Service(s) => s.name(),
            Item::Type(t) => t.name(),
            Item::GlobalVar(v) => v.name(),
            Item::Const(c) => c.name(),
            Item::Annotation(a) => a.name(),
        }
    }
}

// ============================================================================
// Imports and namespaces
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    /// `ballerina` in `import ballerina/io;`
    pub fn org(&self) -> Option<String> {
        let org = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::ORG_NAME)?;
        find_token(&org, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    /// Package path segments: `["foo", "bar"]` for `import org/foo.bar;`
    pub fn package(&self) -> Vec<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::PACKAGE_NAME)
            .map(|pkg| {
                pkg.children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .filter(|t| t.kind() == SyntaxKind::IDENT)
                    .map(|t| t.text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn version(&self) -> Option<String> {
        let clause = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::VERSION_CLAUSE)?;
        let version: String = clause
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia() && t.text() != "version")
            .map(|t| t.text().to_string())
            .collect();
        (!version.is_empty()).then_some(version)
    }

    pub fn alias(&self) -> Option<Name> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::IMPORT_ALIAS)
            .and_then(|alias| alias.children().find_map(Name::cast))
    }
}

ast_node!(NamespaceDecl, NAMESPACE_DECL);

impl NamespaceDecl {
    pub fn uri(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::STRING_LITERAL).map(|t| unquote(t.text()))
    }

    first_child_method!(prefix, Name);
}

// ============================================================================
// Definition prefix: documentation, annotations, visibility
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// Accessors shared by every node that can carry a definition prefix
macro_rules! prefix_methods {
    () => {
        first_child_method!(documentation, Documentation);
        children_method!(annotations, AnnotationAttachment);
        token_to_enum_method!(visibility, Visibility, [
            PUBLIC_KW => Public,
            PRIVATE_KW => Private,
        ]);
    };
}

ast_node!(Documentation, DOCUMENTATION);

/// A `# + name - description` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    pub description: String,
}

impl Documentation {
    pub fn lines(&self) -> impl Iterator<Item = DocLine> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter_map(DocLine::cast)
    }

    /// Free-text description: every line before the first parameter line
    pub fn description(&self) -> String {
        self.lines()
            .map(|l| l.content().to_string())
            .take_while(|l| !l.starts_with('+'))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Parameter lines; `return` describes the return value
    pub fn params(&self) -> Vec<DocParam> {
        self.lines()
            .filter_map(|line| {
                let rest = line.content().strip_prefix('+')?.trim_start();
                let (name, description) = match rest.split_once(" - ") {
                    Some((name, description)) => (name.trim(), description.trim()),
                    None => (rest.trim(), ""),
                };
                Some(DocParam {
                    name: name.to_string(),
                    description: description.to_string(),
                })
            })
            .collect()
    }
}

ast_node!(AnnotationAttachment, ANNOTATION_ATTACHMENT);

impl AnnotationAttachment {
    first_child_method!(name_ref, NameRef);
    first_child_method!(value, RecordLiteral);
}

// ============================================================================
// Functions and parameters
// ============================================================================

ast_node!(FunctionDef, FUNCTION_DEF);

impl FunctionDef {
    prefix_methods!();
    has_token_method!(is_remote, REMOTE_KW, "remote function get()");
    has_token_method!(is_resource, RESOURCE_KW, "resource function hello(http:Caller c)");
    has_token_method!(is_extern, EXTERN_KW, "extern function now();");

    /// The function name; for `function Person.getName()` this is `getName`
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast).or_else(|| {
            self.attached_name()
                .and_then(|attached| attached.children().find_map(Name::cast))
        })
    }

    /// `Person` in `function Person.getName()`
    pub fn receiver(&self) -> Option<NameRef> {
        self.attached_name()
            .and_then(|attached| attached.children().find_map(NameRef::cast))
    }

    fn attached_name(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTACHED_NAME)
    }

    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
    first_child_method!(body, Block);
}

ast_node!(ReturnType, RETURN_TYPE);

impl ReturnType {
    children_method!(annotations, AnnotationAttachment);
    first_child_method!(ty, TypeDescriptor);
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_method!(params, Param);
    first_child_method!(rest_param, RestParam);
}

ast_node!(Param, PARAM);

impl Param {
    children_method!(annotations, AnnotationAttachment);
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(name, Name);
    first_child_method!(default_value, Expr);
    has_token_method!(is_public, PUBLIC_KW);
}

ast_node!(RestParam, REST_PARAM);

impl RestParam {
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(name, Name);
}

// ============================================================================
// Services, types, variables, constants, annotations
// ============================================================================

ast_node!(ServiceDef, SERVICE_DEF);

impl ServiceDef {
    prefix_methods!();
    first_child_method!(name, Name);
    children_method!(listeners, Expr);

    pub fn resources(&self) -> Vec<FunctionDef> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::SERVICE_BODY)
            .map(|body| body.children().filter_map(FunctionDef::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(TypeDef, TYPE_DEF);

impl TypeDef {
    prefix_methods!();
    first_child_method!(name, Name);
    first_child_method!(ty, TypeDescriptor);
}

ast_node!(GlobalVarDef, GLOBAL_VAR_DEF);

impl GlobalVarDef {
    prefix_methods!();
    has_token_method!(is_listener, LISTENER_KW, "listener http:Listener ep = new(9090);");
    has_token_method!(is_final, FINAL_KW);
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(name, Name);
    first_child_method!(initializer, Expr);
}

ast_node!(ConstDef, CONST_DEF);

impl ConstDef {
    prefix_methods!();
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(name, Name);
    first_child_method!(value, Expr);
}

ast_node!(AnnotationDef, ANNOTATION_DEF);

impl AnnotationDef {
    prefix_methods!();
    first_child_method!(name, Name);
    first_child_method!(ty, TypeRef);

    /// Attachment points listed in `annotation<service, resource>`
    pub fn attach_points(&self) -> Vec<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTACH_POINTS)
            .map(|points| {
                points
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .filter(|t| t.kind() == SyntaxKind::IDENT || t.kind().is_keyword())
                    .map(|t| t.text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

ast_node!(FieldDef, FIELD_DEF);

impl FieldDef {
    prefix_methods!();
    first_child_method!(ty, TypeDescriptor);
    first_child_method!(name, Name);
    first_child_method!(default_value, Expr);
    has_token_method!(is_optional, QUESTION, "string name?;");
}
