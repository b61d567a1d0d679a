//! A minimal model of the host's static types.
//!
//! Members are described with type expressions such as `ArgumentType<Integer>`. The compiler
//! only needs two questions answered about them: "what does this type look like as one of its
//! supertypes" and "is this type a subtype of that one". Both are answered from the types the
//! host declares up front in a [`TypeHierarchy`].

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const WILDCARD: &str = "?";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid type expression: \"{input}\"")]
pub struct TypeParseError {
    pub input: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    pub name: String,
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn parse(input: &str) -> Result<TypeRef, TypeParseError> {
        all_consuming(delimited(multispace0, type_ref, multispace0))
            .parse(input)
            .map(|(_, ty)| ty)
            .map_err(|_| TypeParseError {
                input: input.to_string(),
            })
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD
    }

    pub fn erasure(&self) -> TypeRef {
        TypeRef::new(self.name.clone())
    }

    fn substitute(&self, parameters: &[String], arguments: &[TypeRef]) -> TypeRef {
        if self.arguments.is_empty() {
            if let Some(position) = parameters.iter().position(|p| *p == self.name) {
                if let Some(argument) = arguments.get(position) {
                    return argument.clone();
                }
            }
        }
        TypeRef {
            name: self.name.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|argument| argument.substitute(parameters, arguments))
                .collect(),
        }
    }
}

fn type_name(input: &str) -> IResult<&str, &str> {
    alt((
        tag(WILDCARD),
        take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']')),
    ))
    .parse(input)
}

fn type_ref(input: &str) -> IResult<&str, TypeRef> {
    let (input, name) = preceded(multispace0, type_name).parse(input)?;
    let (input, arguments) = opt(delimited(
        preceded(multispace0, char('<')),
        separated_list1(preceded(multispace0, char(',')), type_ref),
        preceded(multispace0, char('>')),
    ))
    .parse(input)?;
    Ok((
        input,
        TypeRef {
            name: name.to_string(),
            arguments: arguments.unwrap_or_default(),
        },
    ))
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A type the host declared: its name, type parameters and direct supertypes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    pub fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn extends(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }
}

fn boxed(name: &str) -> Option<&'static str> {
    Some(match name {
        "int" => "Integer",
        "long" => "Long",
        "short" => "Short",
        "byte" => "Byte",
        "char" => "Character",
        "boolean" => "Boolean",
        "float" => "Float",
        "double" => "Double",
        _ => return None,
    })
}

#[derive(Clone, Debug)]
pub struct TypeHierarchy {
    object: String,
    types: FxHashMap<String, TypeDecl>,
}

impl TypeHierarchy {
    /// `object` names the universal supertype.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            types: FxHashMap::default(),
        }
    }

    pub fn declare(&mut self, decl: TypeDecl) {
        self.types.insert(decl.name.clone(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    pub fn is_object(&self, ty: &TypeRef) -> bool {
        ty.name == self.object
    }

    /// A generic type written without its type arguments.
    pub fn is_raw(&self, ty: &TypeRef) -> bool {
        ty.arguments.is_empty()
            && self
                .types
                .get(&ty.name)
                .is_some_and(|decl| !decl.parameters.is_empty())
    }

    /// Views `ty` as its supertype named `name`, with type arguments carried through.
    ///
    /// Raw types only see erased supertypes.
    pub fn as_super(&self, ty: &TypeRef, name: &str) -> Option<TypeRef> {
        let mut visited = FxHashSet::default();
        self.find_super(ty, name, &mut visited)
    }

    fn find_super(
        &self,
        ty: &TypeRef,
        name: &str,
        visited: &mut FxHashSet<String>,
    ) -> Option<TypeRef> {
        if ty.name == name {
            return Some(ty.clone());
        }
        if !visited.insert(ty.name.clone()) {
            return None;
        }

        let decl = self.types.get(&ty.name)?;
        let raw = ty.arguments.is_empty() && !decl.parameters.is_empty();
        decl.supertypes.iter().find_map(|supertype| {
            let supertype = if raw {
                supertype.erasure()
            } else {
                supertype.substitute(&decl.parameters, &ty.arguments)
            };
            self.find_super(&supertype, name, visited)
        })
    }

    pub fn is_subtype(&self, sub: &TypeRef, sup: &TypeRef) -> bool {
        if self.is_object(sup) {
            return true;
        }
        let sub = self.boxed(sub);
        let sup = self.boxed(sup);
        if sub == sup {
            return true;
        }

        match self.as_super(&sub, &sup.name) {
            Some(view) if view.arguments.is_empty() || sup.arguments.is_empty() => true,
            Some(view) => {
                view.arguments.len() == sup.arguments.len()
                    && view
                        .arguments
                        .iter()
                        .zip(&sup.arguments)
                        .all(|(actual, expected)| expected.is_wildcard() || actual == expected)
            }
            None => false,
        }
    }

    fn boxed(&self, ty: &TypeRef) -> TypeRef {
        match boxed(&ty.name) {
            Some(name) => TypeRef::new(name),
            None => ty.clone(),
        }
    }
}
