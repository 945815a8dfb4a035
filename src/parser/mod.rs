pub mod bounds;
pub mod declaration;
pub mod entity;
pub mod expression;
pub mod scanner;
pub mod syntax;

pub use bounds::{evaluate_bounds, split_type, BoundExpression, TypeBounds};
pub use declaration::{parse_declaration, ParsedDeclaration};
pub use entity::{locate, locate_blocks, locate_entity, EntityLayout};
pub use expression::{evaluate, ExpressionEvaluator, GenericLookup};
pub use scanner::DeclarationBlockScanner;
