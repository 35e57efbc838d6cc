//! Tool registry and schema-described callables.
//!
//! Tools are registered once at startup with an explicit parameter
//! declaration and description. Agents only ever see the subset of tools
//! their configuration lists.

mod args;
pub mod builtin;
mod registry;
mod schema;

pub use args::ToolArgs;
pub use registry::{FnTool, ToolDescriptor, ToolFunction, ToolKind, ToolRegistry};
pub use schema::{ParamDecl, ParamType, Parameter, ParameterSchema};
