use crate::commands::node::NodeIdx;
use crate::commands::token::Identity;
use crate::config::TypeNames;
use crate::member::{Element, Member, MemberId};
use crate::types::{TypeHierarchy, TypeRef};
use std::collections::BTreeMap;
use std::fmt;

/// What a bound member contributes to the node it is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    ArgumentType,
    Command,
    Requirement,
    Suggestions,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::ArgumentType => "argument type",
            Role::Command => "command",
            Role::Requirement => "requirement",
            Role::Suggestions => "suggestions",
        })
    }
}

/// The shape of a bound method, decided by its return type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `int`, executes and reports a result.
    Command,
    /// `void`, executes with the sender passed in.
    Execution,
    /// `boolean`, guards a node.
    Requirement,
    /// `CompletableFuture<Suggestions>`.
    Suggestions,
}

impl Signature {
    pub fn role(self) -> Role {
        match self {
            Signature::Command | Signature::Execution => Role::Command,
            Signature::Requirement => Role::Requirement,
            Signature::Suggestions => Role::Suggestions,
        }
    }
}

/// Where the value of a parameter comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// The node the member is bound to, inferred.
    Pointer(NodeIdx),
    /// A node named explicitly, found on the path to the bound node.
    Reference(NodeIdx),
}

impl Link {
    pub fn target(self) -> NodeIdx {
        match self {
            Link::Pointer(idx) | Link::Reference(idx) => idx,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodBinding {
    pub identity: Identity,
    pub member: MemberId,
    pub signature: Signature,
    /// Resolved `@Let` parameters, keyed by parameter index.
    pub parameters: BTreeMap<usize, Link>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldBinding {
    pub identity: Identity,
    pub member: MemberId,
    pub role: Role,
    /// For argument types, the type of value parsed, or `None` if the provider is raw.
    pub value: Option<TypeRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Method(MethodBinding),
    Field(FieldBinding),
}

impl Binding {
    pub fn new(identity: Identity, member: MemberId, kind: Classified) -> Self {
        match kind {
            Classified::Method(signature) => Binding::Method(MethodBinding {
                identity,
                member,
                signature,
                parameters: BTreeMap::new(),
            }),
            Classified::Field { role, value } => Binding::Field(FieldBinding {
                identity,
                member,
                role,
                value,
            }),
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Binding::Method(method) => &method.identity,
            Binding::Field(field) => &field.identity,
        }
    }

    pub fn member(&self) -> MemberId {
        match self {
            Binding::Method(method) => method.member,
            Binding::Field(field) => field.member,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Binding::Method(method) => method.signature.role(),
            Binding::Field(field) => field.role,
        }
    }

    /// Fields take no parameters.
    pub fn parameters(&self) -> Option<&BTreeMap<usize, Link>> {
        match self {
            Binding::Method(method) => Some(&method.parameters),
            Binding::Field(_) => None,
        }
    }
}

/// The outcome of classifying a member.
#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    Method(Signature),
    Field { role: Role, value: Option<TypeRef> },
}

/// Decides what a member can be bound as from its declared type. The error is the message to
/// report at the member.
pub fn classify(
    member: &Member,
    names: &TypeNames,
    types: &TypeHierarchy,
) -> Result<Classified, String> {
    match &member.element {
        Element::Type => Err(format!(
            "\"{}\" is a type, only fields and methods can be bound",
            member.name
        )),
        Element::Method { returns, .. } => classify_method(member, returns, names, types),
        Element::Field { ty } => classify_field(member, ty, names, types),
    }
}

fn classify_method(
    member: &Member,
    returns: &TypeRef,
    names: &TypeNames,
    types: &TypeHierarchy,
) -> Result<Classified, String> {
    let suggestions = TypeRef::generic(
        names.future.clone(),
        vec![TypeRef::new(names.suggestions.clone())],
    );
    let signature = match returns.name.as_str() {
        "int" => Signature::Command,
        "void" => Signature::Execution,
        "boolean" => Signature::Requirement,
        _ if types.is_subtype(returns, &suggestions) => Signature::Suggestions,
        _ => {
            return Err(format!(
                "Invalid return type \"{}\" for method \"{}\", a bound method should return int, \
                 void, boolean or {}",
                returns, member.name, suggestions
            ));
        }
    };
    Ok(Classified::Method(signature))
}

fn classify_field(
    member: &Member,
    ty: &TypeRef,
    names: &TypeNames,
    types: &TypeHierarchy,
) -> Result<Classified, String> {
    if let Some(view) = types.as_super(ty, &names.argument_type) {
        let value = view.arguments.first().filter(|value| !value.is_wildcard()).cloned();
        return Ok(Classified::Field {
            role: Role::ArgumentType,
            value,
        });
    }

    let roles = [
        (&names.command, Role::Command),
        (&names.predicate, Role::Requirement),
        (&names.suggestion_provider, Role::Suggestions),
    ];
    roles
        .into_iter()
        .find(|(name, _)| types.as_super(ty, name).is_some())
        .map(|(_, role)| Classified::Field { role, value: None })
        .ok_or_else(|| {
            format!(
                "Invalid type \"{}\" for field \"{}\", a bound field should be a {}, {}, {} or {}",
                ty,
                member.name,
                names.argument_type,
                names.command,
                names.predicate,
                names.suggestion_provider
            )
        })
}
