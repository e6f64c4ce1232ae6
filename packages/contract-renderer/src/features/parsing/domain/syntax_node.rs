//! Syntax node representation
//!
//! Only the constructs the linker inspects get their own variant; everything else is carried
//! as `Other` with the grammar's kind name and is copied through verbatim when printed.

use crate::shared::models::{NodeId, Span};
use std::ops::Range;

/// Syntax node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Module,
    Block,

    // Statements
    ExpressionStatement,
    Assignment,
    AugmentedAssignment,
    FunctionDef,
    ClassDef,
    DecoratedDef,
    Decorator,
    Import,
    ImportFrom,
    FutureImport,
    GlobalStatement,
    NonlocalStatement,
    ForStatement,
    ExceptClause,

    // Import parts
    DottedName,
    AliasedImport,
    RelativeImport,
    WildcardImport,

    // Expressions
    Identifier,
    Attribute,
    Call,
    ArgumentList,
    KeywordArgument,
    List,
    Tuple,
    Set,
    Dictionary,
    Pair,
    ExpressionList,
    ListSplat,
    DictionarySplat,
    ParenthesizedExpression,
    Subscript,
    UnaryOperator,
    BinaryOperator,
    Lambda,
    NamedExpression,
    Comprehension,
    ForInClause,

    // Literals
    String,
    ConcatenatedString,
    Interpolation,
    Integer,
    Float,
    True,
    False,
    None,

    // Parameters and annotations
    Parameters,
    LambdaParameters,
    TypedParameter,
    DefaultParameter,
    TypedDefaultParameter,
    ListSplatPattern,
    DictionarySplatPattern,
    Type,

    // Binding patterns
    PatternList,
    TuplePattern,
    ListPattern,
    AsPattern,
    AsPatternTarget,

    Other(&'static str),
}

impl SyntaxKind {
    /// Map a tree-sitter-python kind name
    pub fn from_raw(kind: &'static str) -> Self {
        match kind {
            "module" => SyntaxKind::Module,
            "block" => SyntaxKind::Block,
            "expression_statement" => SyntaxKind::ExpressionStatement,
            "assignment" => SyntaxKind::Assignment,
            "augmented_assignment" => SyntaxKind::AugmentedAssignment,
            "function_definition" => SyntaxKind::FunctionDef,
            "class_definition" => SyntaxKind::ClassDef,
            "decorated_definition" => SyntaxKind::DecoratedDef,
            "decorator" => SyntaxKind::Decorator,
            "import_statement" => SyntaxKind::Import,
            "import_from_statement" => SyntaxKind::ImportFrom,
            "future_import_statement" => SyntaxKind::FutureImport,
            "global_statement" => SyntaxKind::GlobalStatement,
            "nonlocal_statement" => SyntaxKind::NonlocalStatement,
            "for_statement" => SyntaxKind::ForStatement,
            "except_clause" | "except_group_clause" => SyntaxKind::ExceptClause,
            "dotted_name" => SyntaxKind::DottedName,
            "aliased_import" => SyntaxKind::AliasedImport,
            "relative_import" => SyntaxKind::RelativeImport,
            "wildcard_import" => SyntaxKind::WildcardImport,
            "identifier" => SyntaxKind::Identifier,
            "attribute" => SyntaxKind::Attribute,
            "call" => SyntaxKind::Call,
            "argument_list" => SyntaxKind::ArgumentList,
            "keyword_argument" => SyntaxKind::KeywordArgument,
            "list" => SyntaxKind::List,
            "tuple" => SyntaxKind::Tuple,
            "set" => SyntaxKind::Set,
            "dictionary" => SyntaxKind::Dictionary,
            "pair" => SyntaxKind::Pair,
            "expression_list" => SyntaxKind::ExpressionList,
            "list_splat" => SyntaxKind::ListSplat,
            "dictionary_splat" => SyntaxKind::DictionarySplat,
            "parenthesized_expression" => SyntaxKind::ParenthesizedExpression,
            "subscript" => SyntaxKind::Subscript,
            "unary_operator" => SyntaxKind::UnaryOperator,
            "binary_operator" => SyntaxKind::BinaryOperator,
            "lambda" => SyntaxKind::Lambda,
            "named_expression" => SyntaxKind::NamedExpression,
            "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => SyntaxKind::Comprehension,
            "for_in_clause" => SyntaxKind::ForInClause,
            "string" => SyntaxKind::String,
            "concatenated_string" => SyntaxKind::ConcatenatedString,
            "interpolation" => SyntaxKind::Interpolation,
            "integer" => SyntaxKind::Integer,
            "float" => SyntaxKind::Float,
            "true" => SyntaxKind::True,
            "false" => SyntaxKind::False,
            "none" => SyntaxKind::None,
            "parameters" => SyntaxKind::Parameters,
            "lambda_parameters" => SyntaxKind::LambdaParameters,
            "typed_parameter" => SyntaxKind::TypedParameter,
            "default_parameter" => SyntaxKind::DefaultParameter,
            "typed_default_parameter" => SyntaxKind::TypedDefaultParameter,
            "list_splat_pattern" => SyntaxKind::ListSplatPattern,
            "dictionary_splat_pattern" => SyntaxKind::DictionarySplatPattern,
            "type" => SyntaxKind::Type,
            "pattern_list" => SyntaxKind::PatternList,
            "tuple_pattern" => SyntaxKind::TuplePattern,
            "list_pattern" => SyntaxKind::ListPattern,
            "as_pattern" => SyntaxKind::AsPattern,
            "as_pattern_target" => SyntaxKind::AsPatternTarget,
            other => SyntaxKind::Other(other),
        }
    }

    /// Function, class or decorated definition
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDef | SyntaxKind::ClassDef | SyntaxKind::DecoratedDef
        )
    }

    /// Constructs that open a new name scope
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDef
                | SyntaxKind::ClassDef
                | SyntaxKind::Lambda
                | SyntaxKind::Comprehension
        )
    }

    /// Atomic literal (string, number, bool, None)
    pub fn is_scalar_literal(&self) -> bool {
        matches!(
            self,
            SyntaxKind::String
                | SyntaxKind::ConcatenatedString
                | SyntaxKind::Integer
                | SyntaxKind::Float
                | SyntaxKind::True
                | SyntaxKind::False
                | SyntaxKind::None
        )
    }

    /// Human-readable name, used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            SyntaxKind::Identifier => "Name",
            SyntaxKind::Attribute => "Attribute",
            SyntaxKind::Subscript => "Subscript",
            SyntaxKind::PatternList | SyntaxKind::TuplePattern | SyntaxKind::Tuple => "Tuple",
            SyntaxKind::ListPattern | SyntaxKind::List => "List",
            SyntaxKind::ListSplatPattern | SyntaxKind::ListSplat => "Starred",
            SyntaxKind::AugmentedAssignment => "AugAssign",
            SyntaxKind::Other(raw) => raw,
            _ => "expression",
        }
    }
}

/// Arena node
///
/// Only named, non-extra children are linked. The text between children (punctuation,
/// keywords, comments) is recovered from the byte range when printing.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    /// Grammar field this node occupies in its parent (`name`, `left`, `body`, ...)
    pub field: Option<&'static str>,
    pub range: Range<usize>,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, range: Range<usize>, span: Span) -> Self {
        Self {
            kind,
            field: None,
            range,
            span,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Option<&'static str>) -> Self {
        self.field = field;
        self
    }

    pub fn with_parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = parent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(SyntaxKind::from_raw("function_definition"), SyntaxKind::FunctionDef);
        assert_eq!(SyntaxKind::from_raw("generator_expression"), SyntaxKind::Comprehension);
        assert_eq!(SyntaxKind::from_raw("while_statement"), SyntaxKind::Other("while_statement"));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(SyntaxKind::DecoratedDef.is_definition());
        assert!(SyntaxKind::Lambda.is_scope());
        assert!(SyntaxKind::None.is_scalar_literal());
        assert!(!SyntaxKind::List.is_scalar_literal());
        assert_eq!(SyntaxKind::PatternList.describe(), "Tuple");
    }
}
