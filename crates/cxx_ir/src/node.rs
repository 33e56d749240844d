//! Node kinds and field names for the concrete syntax tree.
//!
//! Public kinds are the stable consumer vocabulary. A handful of internal
//! kinds exist only because context-sensitive disambiguation needs distinct
//! derivations of what is semantically one construct; the grammar's alias
//! table renames them on emit and they never appear in finished trees.

use std::fmt;

/// Node kinds.
///
/// Variants in the `--- internal ---` block are disambiguation-only and are
/// renamed by the alias table before a tree is handed to consumers.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(u16)]
pub enum NodeKind {
    // Leaves
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    NamespaceIdentifier,
    NumberLiteral,
    CharLiteral,
    StringLiteral,
    RawStringLiteral,
    RawStringDelimiter,
    RawStringContent,
    True,
    False,
    Nullptr,
    This,
    PrimitiveType,
    /// Keyword or punctuation leaf.
    Token,

    // Top level
    TranslationUnit,
    NamespaceDefinition,
    NamespaceAliasDefinition,
    NestedNamespaceSpecifier,
    UsingDeclaration,
    AliasDeclaration,
    TypeDefinition,
    StaticAssertDeclaration,
    LinkageSpecification,
    TemplateDeclaration,
    TemplateInstantiation,
    ConceptDefinition,
    ModuleDeclaration,
    ModuleName,
    ImportDeclaration,
    ExportBlock,
    ExportSpecifier,

    // Declarations
    Declaration,
    FunctionDefinition,
    InitDeclarator,
    PointerDeclarator,
    ReferenceDeclarator,
    FunctionDeclarator,
    ArrayDeclarator,
    ParenthesizedDeclarator,
    StructuredBindingDeclarator,
    ParameterList,
    ParameterDeclaration,
    OptionalParameterDeclaration,
    VariadicParameterDeclaration,
    ParameterPackExpansion,
    StorageClassSpecifier,
    TypeQualifier,
    VirtualSpecifier,
    ExplicitFunctionSpecifier,
    RefQualifier,
    NoexceptSpecifier,
    AttributeSpecifier,
    Attribute,
    FieldDeclarationList,
    FieldDeclaration,
    BitfieldClause,
    FriendDeclaration,
    AccessSpecifier,
    BaseClassClause,
    FieldInitializerList,
    FieldInitializer,
    DefaultMethodClause,
    DeleteMethodClause,
    OperatorName,
    OperatorCast,

    // Types
    TypeDescriptor,
    SizedTypeSpecifier,
    StructSpecifier,
    UnionSpecifier,
    ClassSpecifier,
    EnumSpecifier,
    EnumeratorList,
    Enumerator,
    PlaceholderTypeSpecifier,
    Decltype,
    DependentType,
    TemplateType,
    TemplateFunction,
    TemplateMethod,
    TemplateArgumentList,
    TemplateParameterList,
    TypeParameterDeclaration,
    OptionalTypeParameterDeclaration,
    VariadicTypeParameterDeclaration,
    TemplateTemplateParameterDeclaration,
    QualifiedIdentifier,
    DependentName,
    AbstractPointerDeclarator,
    AbstractReferenceDeclarator,
    AbstractFunctionDeclarator,
    AbstractArrayDeclarator,

    // Concepts / requires
    RequiresClause,
    RequiresExpression,
    RequirementList,
    SimpleRequirement,
    TypeRequirement,
    CompoundRequirement,

    // Statements
    CompoundStatement,
    ExpressionStatement,
    IfStatement,
    ConditionClause,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForRangeLoop,
    SwitchStatement,
    CaseStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    CoReturnStatement,
    GotoStatement,
    LabeledStatement,
    TryStatement,
    CatchClause,
    AttributedStatement,

    // Expressions
    ParenthesizedExpression,
    BinaryExpression,
    UnaryExpression,
    UpdateExpression,
    AssignmentExpression,
    ConditionalExpression,
    CommaExpression,
    CastExpression,
    SizeofExpression,
    AlignofExpression,
    PointerExpression,
    SubscriptExpression,
    CallExpression,
    ArgumentList,
    FieldExpression,
    NewExpression,
    NewDeclarator,
    DeleteExpression,
    LambdaExpression,
    LambdaCaptureSpecifier,
    LambdaDefaultCapture,
    FoldExpression,
    InitializerList,
    ThrowExpression,
    CoAwaitExpression,
    CoYieldExpression,
    TypeidExpression,
    StaticCastExpression,
    DynamicCastExpression,
    ConstCastExpression,
    ReinterpretCastExpression,
    UserDefinedLiteral,

    // Error recovery
    /// Spans unexpected tokens consumed during resynchronization.
    ErrorNode,
    /// Zero-width marker for a required piece that was absent.
    Missing,

    // --- internal: renamed by the alias table, never public ---
    ConstructorOrDestructorDefinition,
    ConstructorOrDestructorDeclaration,
    OperatorCastDefinition,
    OperatorCastDeclaration,
    InlineMethodDefinition,
    QualifiedTypeIdentifier,
    QualifiedFieldIdentifier,
    QualifiedOperatorCastIdentifier,
    DependentTypeIdentifier,
    DependentFieldIdentifier,
    DependentIdentifier,
    ConditionDeclaration,
    ExpressionStatementAsRequirement,
}

impl NodeKind {
    /// Index for table lookups. Stable within one build.
    #[inline]
    pub const fn discriminant_index(self) -> u16 {
        self as u16
    }

    /// Internal kinds exist only for disambiguation and must be renamed
    /// by the alias table before reaching consumers.
    #[inline]
    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            NodeKind::ConstructorOrDestructorDefinition
                | NodeKind::ConstructorOrDestructorDeclaration
                | NodeKind::OperatorCastDefinition
                | NodeKind::OperatorCastDeclaration
                | NodeKind::InlineMethodDefinition
                | NodeKind::QualifiedTypeIdentifier
                | NodeKind::QualifiedFieldIdentifier
                | NodeKind::QualifiedOperatorCastIdentifier
                | NodeKind::DependentTypeIdentifier
                | NodeKind::DependentFieldIdentifier
                | NodeKind::DependentIdentifier
                | NodeKind::ConditionDeclaration
                | NodeKind::ExpressionStatementAsRequirement
        )
    }

    /// Error or missing marker.
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, NodeKind::ErrorNode | NodeKind::Missing)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Field names attached to children.
///
/// One stable vocabulary across all public kinds; a field is absent, never
/// differently named, when an alternative does not produce it.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum FieldName {
    Alternative,
    Argument,
    Arguments,
    Base,
    Body,
    Captures,
    Condition,
    Consequence,
    Constraint,
    Declarator,
    DefaultType,
    DefaultValue,
    Delimiter,
    Field,
    Function,
    Index,
    Initializer,
    Left,
    Length,
    Message,
    Name,
    Operator,
    Parameters,
    Pattern,
    Placement,
    Requirements,
    Right,
    Scope,
    Size,
    TemplateParameters,
    Type,
    Update,
    Value,
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_kinds_are_flagged() {
        assert!(NodeKind::ConstructorOrDestructorDefinition.is_internal());
        assert!(NodeKind::QualifiedTypeIdentifier.is_internal());
        assert!(!NodeKind::FunctionDefinition.is_internal());
        assert!(!NodeKind::QualifiedIdentifier.is_internal());
    }

    #[test]
    fn error_kinds_are_flagged() {
        assert!(NodeKind::ErrorNode.is_error());
        assert!(NodeKind::Missing.is_error());
        assert!(!NodeKind::Declaration.is_error());
    }
}
