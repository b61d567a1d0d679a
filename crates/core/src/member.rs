//! Read-only descriptions of the annotated source members a batch is compiled from.
//!
//! Discovering members is the host's job. The compiler only reads these records.

use crate::diagnostic::Location;
use crate::types::TypeRef;
use bitflags::bitflags;
use itertools::Itertools;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub usize);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1 << 0;
        const FINAL = 1 << 1;
        const STATIC = 1 << 2;
    }
}

/// How a member attaches itself to the command tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bind {
    /// A full path from the top-level namespace, e.g. `give <player> <amount>`.
    Path(String),
    /// A suffix matched anywhere in the tree, e.g. `<amount>`.
    Pattern(String),
}

impl Bind {
    pub fn source(&self) -> &str {
        match self {
            Bind::Path(source) | Bind::Pattern(source) => source,
        }
    }
}

/// Marks a parameter as extracted from a command node.
///
/// Without a value the parameter is drawn from the node the member is bound to. With one, it
/// names an argument on the path to that node, written either `name` or `<name>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Let {
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub let_: Option<Let>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            let_: None,
        }
    }

    pub fn with_let(mut self, value: Option<&str>) -> Self {
        self.let_ = Some(Let {
            value: value.map(str::to_string),
        });
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.let_ {
            Some(Let { value: Some(value) }) => write!(f, "@Let(\"{}\") ", value)?,
            Some(Let { value: None }) => write!(f, "@Let ")?,
            None => {}
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Type,
    Field {
        ty: TypeRef,
    },
    Method {
        returns: TypeRef,
        parameters: Vec<Parameter>,
        throws: Vec<TypeRef>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub owner: Option<String>,
    pub location: Location,
    pub modifiers: Modifiers,
    /// Pattern lines this member declares.
    pub commands: Vec<String>,
    pub bind: Option<Bind>,
    pub element: Element,
}

impl Member {
    pub fn new(name: impl Into<String>, element: Element) -> Self {
        let name = name.into();
        Self {
            location: Location::new(name.clone()),
            name,
            owner: None,
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
            commands: Vec::new(),
            bind: None,
            element,
        }
    }

    pub fn new_type(name: impl Into<String>) -> Self {
        Self::new(name, Element::Type)
    }

    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, Element::Field { ty })
    }

    pub fn method(name: impl Into<String>, returns: TypeRef, parameters: Vec<Parameter>) -> Self {
        Self::new(
            name,
            Element::Method {
                returns,
                parameters,
                throws: Vec::new(),
            },
        )
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        self.location = Location {
            element: format!("{}#{}", owner, self.name),
            ..self.location
        };
        self.owner = Some(owner);
        self
    }

    pub fn located(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn command(mut self, line: impl Into<String>) -> Self {
        self.commands.push(line.into());
        self
    }

    pub fn bind(mut self, bind: Bind) -> Self {
        self.bind = Some(bind);
        self
    }

    pub fn throws(mut self, exception: TypeRef) -> Self {
        if let Element::Method { throws, .. } = &mut self.element {
            throws.push(exception);
        }
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        match &self.element {
            Element::Method { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// The member as it would be declared, e.g. `int execute(CommandContext<S> context)`.
    pub fn signature(&self) -> String {
        match &self.element {
            Element::Type => self.name.clone(),
            Element::Field { ty } => format!("{} {}", ty, self.name),
            Element::Method {
                returns,
                parameters,
                throws,
            } => {
                let mut signature = format!(
                    "{} {}({})",
                    returns,
                    self.name,
                    parameters.iter().join(", ")
                );
                if !throws.is_empty() {
                    signature.push_str(" throws ");
                    signature.push_str(&throws.iter().join(", "));
                }
                signature
            }
        }
    }
}
