mod abstract_types;
mod directives;
mod executor;
mod introspection;
mod mutations;
mod scalars;
mod variables;
