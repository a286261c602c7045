//! Prebuilt analysis pipelines

use crate::{
    check_castled, count_material, count_moves, evaluate_board, evaluate_mobility, furthest_rank,
    king_position, measure_development, position_summary, EngineHandle, Pipeline,
};

/// The full position-analysis pipeline: engine evaluation first, then every
/// positional extractor, closed by the flat summary record.
pub fn position_analysis(engine: EngineHandle) -> Pipeline {
    Pipeline::new(engine)
        .then(evaluate_board)
        .then(count_material)
        .then(measure_development)
        .then(evaluate_mobility)
        .then(check_castled)
        .then(count_moves)
        .then(furthest_rank)
        .then(king_position)
        .then(position_summary)
}

/// Same extractors without the engine-evaluation step; the summary's `eval`
/// stays absent. This variant feeds the regression model, which must not see
/// the engine's answer among its inputs.
pub fn position_analysis_without_eval(engine: EngineHandle) -> Pipeline {
    Pipeline::new(engine)
        .then(count_material)
        .then(measure_development)
        .then(evaluate_mobility)
        .then(check_castled)
        .then(count_moves)
        .then(furthest_rank)
        .then(king_position)
        .then(position_summary)
}
