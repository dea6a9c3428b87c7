pub mod derivation;
pub mod derivation_log;
pub mod error;
pub mod evaluate;
pub mod node;
pub mod prose;
pub mod session;
pub mod tree;
pub mod valuation;

pub use derivation_log::{DerivationLog, LogRow, Rule};
pub use error::{Error, Result};
pub use node::{Connective, Node, NodeData, NodeId};
pub use session::{Session, ValuationResult};
pub use tree::Tree;
pub use valuation::{Extension, Valuation};
