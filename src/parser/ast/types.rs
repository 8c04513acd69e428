use super::*;

ast_enum! {
    /// Any type descriptor
    TypeDescriptor {
        Builtin(BuiltinType) = BUILTIN_TYPE,
        Literal(LiteralType) = LITERAL_TYPE,
        Ref(TypeRef) = TYPE_REF,
        Parameterized(ParameterizedType) = PARAMETERIZED_TYPE,
        Array(ArrayType) = ARRAY_TYPE,
        Union(UnionType) = UNION_TYPE,
        Optional(OptionalType) = OPTIONAL_TYPE,
        Nil(NilType) = NIL_TYPE,
        Group(GroupType) = GROUP_TYPE,
        Tuple(TupleType) = TUPLE_TYPE,
        Function(FunctionType) = FUNCTION_TYPE,
        Record(RecordType) = RECORD_TYPE,
        Object(ObjectType) = OBJECT_TYPE,
    }
}

ast_node!(BuiltinType, BUILTIN_TYPE);

impl BuiltinType {
    /// The type keyword, e.g. `INT_KW`
    pub fn keyword(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_keyword())
    }
}

ast_node!(LiteralType, LITERAL_TYPE);
ast_node!(NilType, NIL_TYPE);

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    first_child_method!(name_ref, NameRef);
}

ast_node!(ParameterizedType, PARAMETERIZED_TYPE);

impl ParameterizedType {
    pub fn keyword(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_keyword())
    }

    /// `int` and `string` in `map<int>`, `error<string, Detail>`
    pub fn params(&self) -> Vec<TypeDescriptor> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::TYPE_PARAMS)
            .map(|params| params.children().filter_map(TypeDescriptor::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

/// Size of one array dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLength {
    /// `[]`
    Open,
    /// `[3]`
    Fixed(u64),
    /// `[!...]`
    Sealed,
}

impl ArrayType {
    first_child_method!(element, TypeDescriptor);

    pub fn dimensions(&self) -> Vec<ArrayLength> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::ARRAY_DIMENSION)
            .map(|dim| {
                if dim.children().any(|n| n.kind() == SyntaxKind::SEALED_MARKER) {
                    return ArrayLength::Sealed;
                }
                find_token(&dim, SyntaxKind::INTEGER_LITERAL)
                    .and_then(|t| t.text().parse().ok())
                    .map_or(ArrayLength::Open, ArrayLength::Fixed)
            })
            .collect()
    }
}

ast_node!(UnionType, UNION_TYPE);

impl UnionType {
    children_method!(members, TypeDescriptor);
}

ast_node!(OptionalType, OPTIONAL_TYPE);

impl OptionalType {
    first_child_method!(inner, TypeDescriptor);
}

ast_node!(GroupType, GROUP_TYPE);

impl GroupType {
    first_child_method!(inner, TypeDescriptor);
}

ast_node!(TupleType, TUPLE_TYPE);

impl TupleType {
    children_method!(members, TypeDescriptor);
}

ast_node!(FunctionType, FUNCTION_TYPE);

impl FunctionType {
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
}

ast_node!(RecordType, RECORD_TYPE);

impl RecordType {
    children_method!(fields, FieldDef);
    children_method!(inclusions, TypeInclusion);

    /// `record {| ... |}`
    pub fn is_closed(&self) -> bool {
        has_token(&self.0, SyntaxKind::L_BRACE_PIPE)
    }

    /// `!...;` forbids fields beyond the declared ones
    pub fn is_sealed(&self) -> bool {
        self.0
            .children()
            .any(|n| n.kind() == SyntaxKind::SEALED_MARKER)
    }

    /// Type of `T...;`
    pub fn rest(&self) -> Option<TypeDescriptor> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::REST_DESCRIPTOR)
            .and_then(|rest| rest.children().find_map(TypeDescriptor::cast))
    }
}

ast_node!(TypeInclusion, TYPE_INCLUSION);

impl TypeInclusion {
    first_child_method!(ty, TypeRef);
}

ast_node!(ObjectType, OBJECT_TYPE);

impl ObjectType {
    has_token_method!(is_abstract, ABSTRACT_KW);
    has_token_method!(is_client, CLIENT_KW);
    children_method!(fields, FieldDef);
    children_method!(methods, FunctionDef);
    children_method!(inclusions, TypeInclusion);
}
