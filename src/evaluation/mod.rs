mod evaluation_context;
mod universe_evaluator;

pub use evaluation_context::EvaluationContext;
pub use universe_evaluator::{
    EvaluatorSelector, ExternalEvaluatorProvider, StockUniverseEvaluator, UniverseEvaluator,
};
