#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod diagnostic;
pub mod lints;
pub mod member;
pub mod types;

use commands::{binder, parser, resolver, CompileError, Environment};
use config::CompilerConfig;
use diagnostic::{Logger, Tally};
use lints::{make_default_lint_manager, LintManager};
use member::Member;
use std::time::Instant;
use tracing::{debug, trace};
use types::TypeHierarchy;

/// What every phase of a batch reads besides the environment.
pub struct Context<'a> {
    pub config: &'a CompilerConfig,
    pub types: &'a TypeHierarchy,
}

/// Compiles batches of member declarations into command trees.
pub struct Compiler {
    config: CompilerConfig,
    types: TypeHierarchy,
    lints: LintManager<'static>,
}

impl Compiler {
    pub fn new(config: CompilerConfig, types: TypeHierarchy) -> Self {
        Self {
            config,
            types,
            lints: make_default_lint_manager(),
        }
    }

    pub fn with_lints(mut self, lints: LintManager<'static>) -> Self {
        self.lints = lints;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Runs one batch over `members`, reporting every diagnostic to `logger`.
    ///
    /// The environment is handed back only if no error was reported. Warnings never block it.
    pub fn compile<'m>(
        &self,
        members: &'m [Member],
        logger: &mut dyn Logger,
    ) -> Result<Environment<'m>, CompileError> {
        let context = Context {
            config: &self.config,
            types: &self.types,
        };
        let mut logger = Tally::new(logger);
        let mut env = Environment::new(members, self.config.lex_cache);

        debug!("Compiling {} member(s)", members.len());
        let start = Instant::now();

        for id in env.member_ids() {
            parser::parse(&mut env, &context, &mut logger, id);
        }
        trace!("Parsed in {:?}, node_count: {}", start.elapsed(), env.tree.node_count());

        for id in env.member_ids() {
            binder::bind_member(&mut env, &context, &mut logger, id);
        }
        trace!("Bound {} member(s) in {:?}", env.scopes.len(), start.elapsed());

        for id in env.member_ids() {
            resolver::resolve(&mut env, &context, &mut logger, id);
        }
        trace!("Resolved in {:?}", start.elapsed());

        self.lints.run_lints(&env, &context, &mut logger);

        debug!(
            "Compile completed in {:?} with {} error(s) and {} warning(s)",
            start.elapsed(),
            logger.errors,
            logger.warnings
        );
        if logger.errors > 0 {
            return Err(CompileError::Failed {
                errors: logger.errors,
                warnings: logger.warnings,
            });
        }
        Ok(env)
    }
}
