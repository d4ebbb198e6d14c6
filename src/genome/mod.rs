//! Genome model: the role-keyed behavior-tree description that the coach mutates.
//!
//! A genome file is a single JSON object per team:
//!
//! ```json
//! {
//!   "name": "Jets", "code": "WPG",
//!   "colors": { "main": "#4070ff", "secondary": "#ffffff" },
//!   "c":  [{ "cat": "struct", "type": "Selector", "children": [ ... ] }],
//!   "lw": [ ... ], "rw": [ ... ], "ld": [ ... ], "rd": [ ... ]
//! }
//! ```
//!
//! `struct` nodes (`Selector`/`Sequence`) hold children, `cond` and `act` nodes are
//! leaves naming a registered primitive. Action nodes may carry `offsetx`, `offsety`
//! and `depth`.

pub mod node;
pub mod team;

pub use node::{GenomeNode, NodeCategory, NodePath, NumericParam, ParamValue, SELECTOR, SEQUENCE};
pub use team::{RoleTree, TeamColors, TeamGenome};
