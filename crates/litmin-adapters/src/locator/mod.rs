//! Template literal locators.

mod syntax_tree;

pub use syntax_tree::TreeSitterLocator;
