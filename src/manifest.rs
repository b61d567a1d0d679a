//! The TOML manifest `cmdtree check` reads declarations from.
//!
//! ```toml
//! [[types]]
//! name = "IntegerArgumentType"
//! supertypes = ["ArgumentType<Integer>"]
//!
//! [[members]]
//! name = "Give"
//! kind = "type"
//! commands = ["give|g <player> <amount>"]
//!
//! [[members]]
//! owner = "Give"
//! name = "execute"
//! kind = "method"
//! returns = "int"
//! throws = ["CommandSyntaxException"]
//! bind = { path = "give <player> <amount>" }
//! parameters = [
//!     { name = "context", type = "CommandContext<CommandSender>" },
//!     { name = "amount", type = "int", let = true },
//! ]
//! ```

use anyhow::{Context, Result, bail};
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostic::Location;
use cmdtree_core::member::{Bind, Element, Member, Modifiers, Parameter};
use cmdtree_core::types::{TypeDecl, TypeHierarchy, TypeRef};
use serde::Deserialize;
use std::ops::Range;
use toml::Spanned;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    types: Vec<TypeDecl>,
    #[serde(default)]
    members: Vec<Spanned<MemberRecord>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ElementKind {
    Type,
    Field,
    Method,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Modifier {
    Public,
    Final,
    Static,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BindRecord {
    Path(String),
    Pattern(String),
}

/// `let = true` draws from the bound node, `let = "name"` from the named argument.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LetRecord {
    Infer(bool),
    Named(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterRecord {
    name: String,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(rename = "let")]
    let_: Option<LetRecord>,
}

fn default_modifiers() -> Vec<Modifier> {
    vec![Modifier::Public, Modifier::Final]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberRecord {
    name: String,
    owner: Option<String>,
    kind: ElementKind,
    #[serde(default)]
    commands: Vec<String>,
    bind: Option<BindRecord>,
    #[serde(default = "default_modifiers")]
    modifiers: Vec<Modifier>,
    #[serde(rename = "type")]
    ty: Option<TypeRef>,
    returns: Option<TypeRef>,
    #[serde(default)]
    parameters: Vec<ParameterRecord>,
    #[serde(default)]
    throws: Vec<TypeRef>,
}

impl Manifest {
    pub fn parse(source: &str) -> Result<Manifest> {
        Ok(toml::from_str(source)?)
    }

    /// The declared types, on top of the universal object type named by `config`.
    pub fn hierarchy(&self, config: &CompilerConfig) -> TypeHierarchy {
        let mut types = TypeHierarchy::new(config.types.object.clone());
        for decl in &self.types {
            types.declare(decl.clone());
        }
        types
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        self.members
            .iter()
            .map(|record| {
                let span = record.span();
                let record = record.get_ref();
                record
                    .to_member(span)
                    .with_context(|| format!("invalid member \"{}\"", record.name))
            })
            .collect()
    }
}

impl MemberRecord {
    fn to_member(&self, span: Range<usize>) -> Result<Member> {
        let element = match self.kind {
            ElementKind::Type => Element::Type,
            ElementKind::Field => {
                let Some(ty) = self.ty.clone() else {
                    bail!("a field needs a \"type\"");
                };
                Element::Field { ty }
            }
            ElementKind::Method => {
                let Some(returns) = self.returns.clone() else {
                    bail!("a method needs a \"returns\" type");
                };
                Element::Method {
                    returns,
                    parameters: self.parameters.iter().map(ParameterRecord::to_parameter).collect(),
                    throws: self.throws.clone(),
                }
            }
        };
        if self.kind != ElementKind::Method && (!self.parameters.is_empty() || !self.throws.is_empty())
        {
            bail!("only methods have \"parameters\" and \"throws\"");
        }

        let modifiers = self
            .modifiers
            .iter()
            .fold(Modifiers::empty(), |modifiers, modifier| {
                modifiers
                    | match modifier {
                        Modifier::Public => Modifiers::PUBLIC,
                        Modifier::Final => Modifiers::FINAL,
                        Modifier::Static => Modifiers::STATIC,
                    }
            });

        let mut member = Member::new(self.name.clone(), element).modifiers(modifiers);
        if let Some(owner) = &self.owner {
            member = member.owned_by(owner.clone());
        }
        let qualified = member.location.element.clone();
        member = member.located(Location::new(qualified).with_span(span));
        for line in &self.commands {
            member = member.command(line.clone());
        }
        if let Some(bind) = &self.bind {
            member = member.bind(match bind {
                BindRecord::Path(path) => Bind::Path(path.clone()),
                BindRecord::Pattern(pattern) => Bind::Pattern(pattern.clone()),
            });
        }
        Ok(member)
    }
}

impl ParameterRecord {
    fn to_parameter(&self) -> Parameter {
        let parameter = Parameter::new(self.name.clone(), self.ty.clone());
        match &self.let_ {
            None | Some(LetRecord::Infer(false)) => parameter,
            Some(LetRecord::Infer(true)) => parameter.with_let(None),
            Some(LetRecord::Named(name)) => parameter.with_let(Some(name.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GIVE: &str = r#"
[[types]]
name = "IntegerArgumentType"
supertypes = ["ArgumentType<Integer>"]

[[members]]
name = "Give"
kind = "type"
commands = ["give <amount>"]

[[members]]
owner = "Give"
name = "execute"
kind = "method"
modifiers = ["public"]
returns = "int"
throws = ["CommandSyntaxException"]
bind = { path = "give <amount>" }
parameters = [
    { name = "context", type = "CommandContext<CommandSender>" },
    { name = "amount", type = "int", let = true },
    { name = "other", type = "Integer", let = "<amount>" },
]
"#;

    #[test]
    fn members_are_read_in_order() {
        let manifest = Manifest::parse(GIVE).unwrap();
        let members = manifest.members().unwrap();
        assert_eq!(members.len(), 2);

        let give = &members[0];
        assert_eq!(give.element, Element::Type);
        assert_eq!(give.commands, ["give <amount>"]);
        assert_eq!(give.modifiers, Modifiers::PUBLIC | Modifiers::FINAL);

        let execute = &members[1];
        assert_eq!(execute.location.element, "Give#execute");
        assert_eq!(execute.modifiers, Modifiers::PUBLIC);
        assert_eq!(execute.bind, Some(Bind::Path("give <amount>".to_string())));
        assert_eq!(
            execute.signature(),
            "int execute(CommandContext<CommandSender> context, @Let int amount, \
             @Let(\"<amount>\") Integer other) throws CommandSyntaxException"
        );

        assert!(execute.location.span.is_some());
    }

    #[test]
    fn hierarchy_uses_configured_object() {
        let manifest = Manifest::parse(GIVE).unwrap();
        let types = manifest.hierarchy(&CompilerConfig::default());
        let integer = TypeRef::parse("IntegerArgumentType").unwrap();
        assert!(types.as_super(&integer, "ArgumentType").is_some());
        assert!(types.is_object(&TypeRef::new("Object")));
    }

    #[test]
    fn incomplete_members_are_rejected() {
        let manifest = Manifest::parse(
            r#"
            [[members]]
            name = "amount"
            kind = "field"
            "#,
        )
        .unwrap();
        assert!(manifest.members().is_err());
        assert!(Manifest::parse("[[members]]\nname = \"a\"\nkind = \"enum\"\n").is_err());
    }
}
