use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml_edit::{value, Array, DocumentMut, Table};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] toml_edit::TomlError),
    #[error(transparent)]
    Invalid(#[from] toml::de::Error),
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, table: &mut Table);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, table: &mut Table) {
                    table.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, table: &mut Table) {
        table
            .entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

macro_rules! gen_config {
    (
        $(#[$meta:meta])*
        pub struct $config:ident {
            $( $(#[$field_meta:meta])* $name:ident: $type:ty = $default:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $config {
            $(
                $(#[$field_meta])*
                pub $name: $type,
            )*
        }

        impl Default for $config {
            fn default() -> Self {
                Self {
                    $( $name: $default, )*
                }
            }
        }

        impl $config {
            /// Fills every key missing from `table` with its default.
            fn fix_table(self, table: &mut Table) {
                $(
                    <$type as ConfigSerializeDefault>::fix_config(self.$name, stringify!($name), table);
                )*
            }
        }

        impl ConfigSerializeDefault for $config {
            fn fix_config(self, name: &str, table: &mut Table) {
                let item = table.entry(name).or_insert_with(toml_edit::table);
                if let Some(section) = item.as_table_mut() {
                    self.fix_table(section);
                }
            }
        }
    };
}

gen_config! {
    /// Names of the host types the compiler needs to recognize.
    pub struct TypeNames {
        object: String = "Object".to_string(),
        context: String = "CommandContext".to_string(),
        sender: String = "CommandSender".to_string(),
        suggestions_builder: String = "SuggestionsBuilder".to_string(),
        suggestions: String = "Suggestions".to_string(),
        future: String = "CompletableFuture".to_string(),
        syntax_exception: String = "CommandSyntaxException".to_string(),
        argument_type: String = "ArgumentType".to_string(),
        command: String = "Command".to_string(),
        predicate: String = "Predicate".to_string(),
        suggestion_provider: String = "SuggestionProvider".to_string(),
        /// Exceptions (and their subtypes) a method may always declare.
        unchecked_exceptions: Vec<String> = vec!["RuntimeException".to_string(), "Error".to_string()],
    }
}

gen_config! {
    pub struct CompilerConfig {
        /// Reject argument-first pattern lines while parsing instead of leaving them to the
        /// argument position lint.
        strict_command_start: bool = false,
        /// Share the tokens of identical pattern lines.
        lex_cache: bool = true,
        /// Joins path segments in diagnostic messages.
        separator: String = " ".to_string(),
        types: TypeNames = TypeNames::default(),
    }
}

impl CompilerConfig {
    /// Loads `path`, treating a missing file as an empty one.
    pub fn load(path: impl AsRef<Path>) -> Result<CompilerConfig, ConfigError> {
        let source = read_or_empty(path.as_ref())?;
        CompilerConfig::from_toml(&source)
    }

    pub fn from_toml(source: &str) -> Result<CompilerConfig, ConfigError> {
        let patched = patch(source)?;
        Ok(toml::from_str(&patched.to_string())?)
    }

    /// Writes every missing key with its default into `path`, keeping whatever the file
    /// already sets. Returns whether the file changed.
    pub fn write_defaults(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
        let path = path.as_ref();
        let source = read_or_empty(path)?;
        let patched = patch(&source)?.to_string();
        if patched == source {
            return Ok(false);
        }
        fs::write(path, patched).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}

fn read_or_empty(path: &Path) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(source),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn patch(source: &str) -> Result<DocumentMut, ConfigError> {
    let mut doc = source.parse::<DocumentMut>()?;
    CompilerConfig::default().fix_table(doc.as_table_mut());
    Ok(doc)
}
